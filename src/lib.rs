//! # goast
//!
//! Diagnostic dumper for Go syntax trees. A Go file is parsed into a closed
//! set of node kinds, identifiers are bound to the declarations they refer
//! to, and the tree is printed as indented text for people to read.
//!
//! ```no_run
//! let ast = goast::parse_file("main.go")?;
//! print!("{}", goast::dump(&ast, goast::RenderOptions::default()));
//! # Ok::<(), goast::GoastError>(())
//! ```

pub mod error;
pub mod parser;
pub mod renderer;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

pub use error::{GoastError, Result};
pub use parser::*;
pub use renderer::*;

/// Read and parse one Go source file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Ast> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| GoastError::SourceOpen {
        path: path.to_path_buf(),
        source,
    })?;
    GoParser::new()?.parse_str(&source)
}

/// Render every top-level declaration of `ast`.
pub fn dump(ast: &Ast, options: RenderOptions) -> String {
    TreeRenderer::new(ast).with_options(options).render_file()
}
