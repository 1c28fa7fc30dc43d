#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rate limited")]
    RateLimited,

    #[error("request failed with status {status}")]
    Status { status: u16 },

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("{0}")]
    Other(String),
}

impl LlmError {
    /// Whether the failure came from the transport or a temporarily overloaded
    /// service, as opposed to a malformed or empty answer.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::RateLimited => true,
            Self::Status { status } => *status >= 500,
            Self::Json(_)
            | Self::EmptyResponse { .. }
            | Self::Other(_) => false,
        }
    }
}
