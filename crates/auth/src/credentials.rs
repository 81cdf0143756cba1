use serde::{Deserialize, Serialize};

use dian_core::{DomainError, DomainResult};

/// Opaque bearer credential issued by the login endpoint.
///
/// Persisted verbatim; `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Username/password pair sent to `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reject obviously incomplete input before it reaches the backend.
    pub fn validate(&self) -> DomainResult<()> {
        if self.username.trim().is_empty() {
            return Err(DomainError::validation("username is required"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("password is required"));
        }
        Ok(())
    }
}

impl core::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Password change request for the current user.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Wire body of `PUT /users/change-password`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeBody<'a> {
    pub old_password: &'a str,
    pub password: &'a str,
}

impl PasswordChange {
    pub fn new(
        current_password: impl Into<String>,
        new_password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.current_password.is_empty() {
            return Err(DomainError::validation("current password is required"));
        }
        if self.new_password.trim().is_empty() {
            return Err(DomainError::validation("new password is required"));
        }
        if self.new_password != self.confirm_password {
            return Err(DomainError::validation("password confirmation does not match"));
        }
        if self.new_password == self.current_password {
            return Err(DomainError::validation(
                "new password must differ from the current password",
            ));
        }
        Ok(())
    }

    pub fn body(&self) -> PasswordChangeBody<'_> {
        PasswordChangeBody {
            old_password: &self.current_password,
            password: &self.new_password,
        }
    }
}

impl core::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordChange(<redacted>)")
    }
}
