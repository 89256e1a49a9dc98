use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use goast::{dump, parse_file, RenderOptions};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let defaults = RenderOptions::default();
    let matches = Command::new("goast")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dump the syntax tree of a Go source file")
        .arg(
            Arg::new("input")
                .help("Go source file to dump")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("separator")
                .long("separator")
                .help("Line printed between top-level declarations [default: --------]")
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("no-object-decls")
                .long("no-object-decls")
                .help("Do not expand the declaration site of bound identifiers")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let input_file = matches
        .get_one::<String>("input")
        .context("missing input file")?;
    let options = RenderOptions {
        separator: matches
            .get_one::<String>("separator")
            .cloned()
            .unwrap_or(defaults.separator),
        follow_object_decls: !matches.get_flag("no-object-decls"),
    };

    let ast =
        parse_file(input_file).with_context(|| format!("failed to dump {}", input_file))?;
    debug!(file = %input_file, package = ?ast.package, "parsed");

    print!("{}", dump(&ast, options));

    Ok(())
}
