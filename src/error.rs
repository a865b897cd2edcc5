//! Error type shared by the client, the style rules and the Piper formatter.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The service answered with a non-success status.
    #[error("request failed with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("missing configuration: environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("token cannot be used in an Authorization header")]
    InvalidToken,

    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),

    /// A style rule carries a pattern that does not compile.
    #[error("invalid style rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("column not found: {0}")]
    MissingColumn(String),

    /// A column that must be numeric holds values that do not parse as numbers.
    #[error("column {column} has {count} non-numeric value(s)")]
    NonNumeric { column: String, count: usize },

    #[error("column already exists: {0}")]
    DuplicateColumn(String),

    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status carried by [`Error::Http`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
