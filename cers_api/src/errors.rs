//! Error types for the portal client.

/// Errors that can occur when talking to the CERS portal.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unreadable response).
    #[error("Request failed")]
    RequestFailed,
    /// The portal returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The portal answered, but the body was not the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}
