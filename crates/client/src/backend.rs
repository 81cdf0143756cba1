//! Authentication endpoints consumed by the session store.

use reqwest::Method;

use dian_auth::{BearerToken, Identity, LoginCredentials, PasswordChange};

use crate::api::ApiClient;
use crate::envelope::{ApiResponse, LoginGrant};
use crate::error::ApiError;

pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const CURRENT_USER_PATH: &str = "/users/currentUser";
pub const CHANGE_PASSWORD_PATH: &str = "/users/change-password";

/// The backend operations the session layer depends on.
///
/// Futures are not required to be `Send`: the console runs on a
/// single-threaded event loop (browser or current-thread runtime).
#[allow(async_fn_in_trait)]
pub trait AuthBackend {
    /// Exchange credentials for an identity and a bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, ApiError>;

    /// Resolve the identity behind `token`.
    async fn current_user(&self, token: &BearerToken) -> Result<Identity, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError>;
}

impl AuthBackend for ApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, ApiError> {
        let response: ApiResponse<LoginGrant> = self.post(LOGIN_PATH, Some(credentials)).await?;
        response.into_data().map_err(|message| ApiError::Rejected {
            message: non_blank_or(message, "Login failed"),
        })
    }

    async fn current_user(&self, token: &BearerToken) -> Result<Identity, ApiError> {
        let response: ApiResponse<Identity> = self
            .request::<(), _>(Method::GET, CURRENT_USER_PATH, None, Some(token))
            .await?;
        response.into_data().map_err(|message| ApiError::Rejected {
            message: non_blank_or(message, "No current user"),
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        // Some deployments answer logout with an empty body.
        match self.post::<(), serde_json::Value>(LOGOUT_PATH, None).await {
            Ok(_) | Err(ApiError::Decode(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let response: ApiResponse<serde_json::Value> =
            self.put(CHANGE_PASSWORD_PATH, &change.body()).await?;
        if response.success {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                message: non_blank_or(response.message.unwrap_or_default(), "Password change failed"),
            })
        }
    }
}

fn non_blank_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
