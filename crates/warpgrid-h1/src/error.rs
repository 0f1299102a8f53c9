//! Error types for request parsing and parser configuration.

use thiserror::Error;

/// Result type alias for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that abort an in-progress parse.
///
/// Every variant is terminal: once a feed call returns one of these, the
/// parser that produced it must be discarded. Running out of input is never
/// an error; the feed call simply reports how many bytes it consumed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line")]
    MalformedRequestLine,

    #[error("method not implemented: {0}")]
    NotImplemented(String),

    #[error("length required: request method carries a body but no Content-Length was sent")]
    LengthRequired,

    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    #[error("request line exceeds {limit} bytes")]
    RequestLineTooLong { limit: usize },

    #[error("header line exceeds {limit} bytes")]
    HeaderLineTooLong { limit: usize },

    #[error("more than {limit} header lines")]
    TooManyHeaders { limit: usize },

    #[error("malformed header line")]
    MalformedHeader,

    #[error("body storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or validating a [`ParserConfig`](crate::ParserConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
