use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoastError {
    #[error("cannot open {}: {source}", path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed Go source. Line and column are 1-based.
    #[error("{line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("failed to load Go grammar: {0}")]
    Grammar(String),
}

pub type Result<T> = std::result::Result<T, GoastError>;
