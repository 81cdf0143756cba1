//! Response envelope shared by every backend endpoint.

use serde::{Deserialize, Serialize};

use dian_auth::{BearerToken, Identity};

/// `{ "success": bool, "message": string, "data": T }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiResponse<T> {
    /// Unwrap `data` from a successful envelope, or the envelope's message.
    pub fn into_data(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err(self.message.unwrap_or_default()),
        }
    }
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// `data` of a successful `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginGrant {
    #[serde(rename = "user")]
    pub identity: Identity,
    #[serde(alias = "token")]
    pub access_token: BearerToken,
}
