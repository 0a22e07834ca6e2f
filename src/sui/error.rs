use thiserror::Error;

/// Message fragments the backend uses when a record is absent.
const ABSENCE_PHRASES: [&str; 4] = ["not found", "deleted", "does not exist", "ObjectNotFound"];

/// Failure talking to the ledger backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with an application-level error status.
    #[error("backend error {code}: {message}")]
    Status { code: String, message: String },

    /// The request never produced a usable HTTP response.
    #[error("backend transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected message shape.
    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A field the gateway depends on was missing from an otherwise valid reply.
    #[error("backend response is missing {0}")]
    MissingField(&'static str),
}

impl BackendError {
    /// Case-sensitive substring test against the fixed absence phrases.
    pub fn indicates_absence(&self) -> bool {
        let message = self.to_string();
        ABSENCE_PHRASES.iter().any(|phrase| message.contains(phrase))
    }
}
