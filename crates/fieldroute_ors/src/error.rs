use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl OrsError {
    /// True for transport and upstream-status failures, false for responses
    /// that arrived but do not match the documented shape.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, OrsError::Request(_) | OrsError::Api { .. })
    }
}
