use thiserror::Error;

/// Failure of a call against the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-OK response. `message` is the server's `error` field when present,
    /// otherwise `Request failed (<status>)`.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn server(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed ({})", status));
        ApiError::Server { status, message }
    }
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("message is empty")]
    EmptyDraft,

    #[error("no conversation is open")]
    NoActiveThread,

    #[error("a message is already being sent")]
    SendInFlight,

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session store: {0}")]
    Io(#[from] std::io::Error),

    #[error("session store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_uses_server_message() {
        let err = ApiError::server(400, Some("receiver_id required".to_string()));
        assert_eq!(err.to_string(), "receiver_id required");
    }

    #[test]
    fn test_server_error_falls_back_to_status() {
        assert_eq!(ApiError::server(502, None).to_string(), "Request failed (502)");
        assert_eq!(
            ApiError::server(500, Some(" ".to_string())).to_string(),
            "Request failed (500)"
        );
    }
}
