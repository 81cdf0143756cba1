use thiserror::Error;

/// Message shown when the backend could not be reached or did not explain
/// the failure.
pub const CONNECTIVITY_MESSAGE: &str = "Connection error. Check your internet connection.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// HTTP 401. The interceptor has already erased the stored credential.
    #[error("authentication rejected{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unauthorized { message: Option<String> },

    #[error("API error ({status}){}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Api { status: u16, message: Option<String> },

    /// A 2xx response whose envelope reported `success: false` or had no data.
    #[error("request rejected: {message}")]
    Rejected { message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }

    /// Message from the backend's structured error body, if it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message } | ApiError::Api { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            ApiError::Rejected { message } => Some(message.as_str()),
            ApiError::Network(_) | ApiError::Timeout | ApiError::Decode(_) | ApiError::Config(_) => {
                None
            }
        }
    }

    /// Single human-readable line for the login form and similar surfaces.
    pub fn user_message(&self) -> String {
        self.backend_message()
            .map(str::to_string)
            .unwrap_or_else(|| CONNECTIVITY_MESSAGE.to_string())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}
