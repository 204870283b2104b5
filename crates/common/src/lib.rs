/// Common types and utilities for the app client generator

/// Error type for generator operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic error with message
    #[error("{0}")]
    Generic(String),

    /// App spec could not be parsed or upcast
    #[error("Failed to parse app spec: {0}")]
    Parse(String),

    /// Invalid input supplied by the caller
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid generator configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template registration or rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a new generic error
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Error::Template(msg.into())
    }

    /// Create a new IO error
    pub fn io<S: Into<String>>(msg: S) -> Self {
        Error::Io(msg.into())
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Error::Serialization(msg.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON serialization error: {}", err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
