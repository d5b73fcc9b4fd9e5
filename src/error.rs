use reqwest::StatusCode;

/// Failure of a single request against the pastor-messages resource.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No bearer token in the session; detected before any request is sent.
    #[error("not logged in")]
    AuthMissing,

    /// The request could not complete, or the response body could not be decoded.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the `{message}` field of the error body, if any.
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },
}

impl ClientError {
    /// Text shown to the user when an operation fails with this error.
    ///
    /// Server-provided text wins; a server failure without text falls back to
    /// `fallback`. Network failures show the underlying error.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Server {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            ClientError::Server { .. } | ClientError::AuthMissing => fallback.to_string(),
            ClientError::Network(e) => e.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Server { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}
