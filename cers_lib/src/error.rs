//! Error types for the library layer.

/// Errors produced by the library layer, wrapping portal client errors and
/// adding cache, file, parsing and input validation failures.
#[derive(thiserror::Error, Debug)]
pub enum CersError {
    /// An error from the underlying portal client.
    #[error("API error: {0}")]
    Api(#[from] cers_api::Error),
    /// A cache file could not be written or is unusable.
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A configuration file (e.g. the manual cache table) is invalid.
    #[error("Config error: {0}")]
    Config(String),
    /// Report content could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),
    /// User-provided input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
