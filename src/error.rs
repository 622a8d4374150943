use thiserror::Error;

/// Main error type for Concept Map
#[derive(Error, Debug)]
pub enum ConceptMapError {
    /// HTTP client errors (building the client, transport failures)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed service responses (bad JSON, missing fields)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Intent name the skill does not handle
    #[error("Invalid intent: {0}")]
    InvalidIntent(String),
}

impl From<serde_json::Error> for ConceptMapError {
    fn from(err: serde_json::Error) -> Self {
        ConceptMapError::Parse(err.to_string())
    }
}

/// Convenient Result type using ConceptMapError
pub type Result<T> = std::result::Result<T, ConceptMapError>;
