//! Error types for HygroIO

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// HygroIO error types
///
/// Record-level decode failures are not errors; they are reported as
/// [`DecodeProblem`](crate::protocol::DecodeProblem) values by the parser.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed, written or validated
    #[error("Configuration error: {0}")]
    Config(String),

    /// No port given on the command line, in the config, or in saved settings
    #[error("No serial port selected")]
    NoPortSelected,

    /// Bad command line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reader thread panicked
    #[error("Reader thread panicked")]
    ThreadPanic,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
