use crate::extract::ExtractError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row could not be turned into a visitor record. `line` is the
    /// 1-based line number in the source file.
    #[error("Row at line {line}")]
    Extract {
        line: u64,
        #[source]
        source: ExtractError,
    },

    #[error("{0}")]
    Other(String),
}
