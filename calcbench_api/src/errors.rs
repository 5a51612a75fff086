//! Error types for the API client.

/// Errors that can occur when talking to the service.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unexpected response).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The logon endpoint rejected the supplied email/password.
    #[error("Incorrect credentials, use the email and password you use to log in")]
    InvalidCredentials,
    /// The response body was not the JSON shape the endpoint promises.
    #[error("Failed to parse response: {0}")]
    Parse(#[source] serde_json::Error),
}
