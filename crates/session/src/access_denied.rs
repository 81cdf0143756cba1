//! Read-only state rendered when a role guard is configured to explain a
//! denial instead of redirecting.

use serde::Serialize;

use dian_auth::{AccessExplanation, DenialKind, Role};

use crate::config::DEFAULT_HOME_PATH;
use crate::navigator::Navigator;

pub const DEFAULT_DENIED_MESSAGE: &str =
    "No tienes permisos suficientes para acceder a esta sección.";
pub const MISSING_COMPANY_MESSAGE: &str =
    "Esta sección requiere una empresa asociada a tu usuario.";
pub const CONTACT_ADMIN_HINT: &str =
    "Si crees que deberías tener acceso a esta sección, contacta a un administrador.";
pub const UNDEFINED_ROLE_LABEL: &str = "No definido";

/// Per-usage presentation of the access-denied view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDeniedOptions {
    /// Overrides the message chosen from the denial reason.
    pub message: Option<String>,
    pub show_back: bool,
    pub show_home: bool,
    pub home_path: String,
}

impl Default for AccessDeniedOptions {
    fn default() -> Self {
        Self {
            message: None,
            show_back: true,
            show_home: true,
            home_path: DEFAULT_HOME_PATH.to_string(),
        }
    }
}

impl AccessDeniedOptions {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
        self.home_path = path.into();
        self
    }

    pub fn without_back(mut self) -> Self {
        self.show_back = false;
        self
    }

    pub fn without_home(mut self) -> Self {
        self.show_home = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDenied {
    pub current_role: Option<Role>,
    pub allowed_roles: Vec<Role>,
    pub message: String,
    pub show_back: bool,
    pub show_home: bool,
    pub home_path: String,
    pub reason: DenialKind,
}

impl AccessDenied {
    /// Build the view from a denied explanation. Returns `None` when access
    /// was granted.
    pub fn from_explanation(
        explanation: &AccessExplanation,
        options: &AccessDeniedOptions,
    ) -> Option<Self> {
        let reason = explanation.denial?;
        let message = options.message.clone().unwrap_or_else(|| {
            match reason {
                DenialKind::MissingCompanyDocument => MISSING_COMPANY_MESSAGE,
                DenialKind::Unauthenticated | DenialKind::RoleNotAllowed => {
                    DEFAULT_DENIED_MESSAGE
                }
            }
            .to_string()
        });

        Some(Self {
            current_role: explanation.current_role,
            allowed_roles: explanation.allowed_roles.clone(),
            message,
            show_back: options.show_back,
            show_home: options.show_home,
            home_path: options.home_path.clone(),
            reason,
        })
    }

    pub fn current_role_label(&self) -> &'static str {
        self.current_role
            .map(|role| role.display_name())
            .unwrap_or(UNDEFINED_ROLE_LABEL)
    }

    pub fn allowed_role_labels(&self) -> Vec<&'static str> {
        self.allowed_roles.iter().map(|r| r.display_name()).collect()
    }

    pub fn has_actions(&self) -> bool {
        self.show_back || self.show_home
    }

    pub fn go_back(&self, nav: &dyn Navigator) {
        if self.show_back {
            nav.back();
        }
    }

    pub fn go_home(&self, nav: &dyn Navigator) {
        if self.show_home {
            nav.push(&self.home_path);
        }
    }
}
