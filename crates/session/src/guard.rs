//! Route, guest and role guards.
//!
//! Guards hold no state of their own. A decision is a pure function of the
//! current [`SessionState`]; [`Guard::enforce`] additionally performs the
//! replace-navigation a `Redirect` asks for.
//!
//! While `is_loading` is set every guard answers [`GuardDecision::Checking`]
//! and navigates nowhere.

use dian_auth::{PermissionResolver, Role, Section};

use crate::access_denied::{AccessDenied, AccessDeniedOptions};
use crate::config::{DEFAULT_HOME_PATH, DEFAULT_LOGIN_PATH};
use crate::navigation::landing_path;
use crate::navigator::Navigator;
use crate::store::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not restored yet; render a loading indicator.
    Checking,
    /// Leave via replace-navigation.
    Redirect { to: String },
    /// Render the wrapped view.
    Allow,
    /// Render the access-denied view in place.
    Deny(AccessDenied),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            GuardDecision::Redirect { to } => Some(to),
            _ => None,
        }
    }

    fn redirect(to: impl Into<String>) -> Self {
        GuardDecision::Redirect { to: to.into() }
    }
}

pub trait Guard {
    fn evaluate(&self, state: &SessionState) -> GuardDecision;

    /// Evaluate and perform the redirect, if any. Already being on the
    /// target path is not navigated again.
    fn enforce(&self, state: &SessionState, nav: &dyn Navigator) -> GuardDecision {
        let decision = self.evaluate(state);
        if let GuardDecision::Redirect { to } = &decision {
            if nav.current().as_deref() != Some(to.as_str()) {
                tracing::debug!(to = %to, "guard redirect");
                nav.replace(to);
            }
        }
        decision
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Route Guard
// ─────────────────────────────────────────────────────────────────────────────

/// Requires an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    login_path: String,
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH)
    }
}

impl Guard for RouteGuard {
    fn evaluate(&self, state: &SessionState) -> GuardDecision {
        if state.is_loading() {
            GuardDecision::Checking
        } else if !state.is_authenticated() {
            GuardDecision::redirect(&self.login_path)
        } else {
            GuardDecision::Allow
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Guest Guard
// ─────────────────────────────────────────────────────────────────────────────

/// Guards the login view: an authenticated identity is sent to its landing
/// path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuestGuard;

impl Guard for GuestGuard {
    fn evaluate(&self, state: &SessionState) -> GuardDecision {
        if state.is_loading() {
            return GuardDecision::Checking;
        }
        match state.identity() {
            Some(identity) => GuardDecision::redirect(landing_path(Some(identity))),
            None => GuardDecision::Allow,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Role Guard
// ─────────────────────────────────────────────────────────────────────────────

/// What a role guard does with an authenticated but forbidden identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Forbidden {
    Redirect { to: String },
    AccessDenied(AccessDeniedOptions),
}

impl Default for Forbidden {
    fn default() -> Self {
        Forbidden::Redirect {
            to: DEFAULT_HOME_PATH.to_string(),
        }
    }
}

/// Route guard plus a section check.
///
/// Only constructible from a [`Section`], so the allowed roles always come
/// from the same table the sidebar is composed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGuard {
    section: Section,
    route: RouteGuard,
    on_forbidden: Forbidden,
}

impl RoleGuard {
    pub fn for_section(section: Section) -> Self {
        Self {
            section,
            route: RouteGuard::default(),
            on_forbidden: Forbidden::default(),
        }
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.route = RouteGuard::new(login_path);
        self
    }

    pub fn redirect_to(mut self, fallback: impl Into<String>) -> Self {
        self.on_forbidden = Forbidden::Redirect {
            to: fallback.into(),
        };
        self
    }

    pub fn show_access_denied(mut self, options: AccessDeniedOptions) -> Self {
        self.on_forbidden = Forbidden::AccessDenied(options);
        self
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn allowed_roles(&self) -> &'static [Role] {
        self.section.allowed_roles()
    }

    pub fn on_forbidden(&self) -> &Forbidden {
        &self.on_forbidden
    }
}

impl Guard for RoleGuard {
    fn evaluate(&self, state: &SessionState) -> GuardDecision {
        let decision = self.route.evaluate(state);
        if !decision.is_allowed() {
            return decision;
        }

        let explanation = PermissionResolver::new(state.identity()).explain(self.section);
        if explanation.granted {
            return GuardDecision::Allow;
        }
        tracing::debug!(section = %self.section, reason = %explanation.reason, "access denied");

        match &self.on_forbidden {
            Forbidden::Redirect { to } => GuardDecision::redirect(to),
            Forbidden::AccessDenied(options) => {
                match AccessDenied::from_explanation(&explanation, options) {
                    Some(view) => GuardDecision::Deny(view),
                    None => GuardDecision::Allow,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::{MemoryNavigator, Navigation};
    use dian_auth::{DenialKind, Identity};
    use dian_core::UserId;

    fn identity(role: Role) -> Identity {
        Identity::new(UserId::new("u-5").unwrap(), "rosa", "Rosa", "rosa@example.com", role)
    }

    fn signed_in(role: Role) -> SessionState {
        SessionState::authenticated(identity(role))
    }

    #[test]
    fn checking_never_navigates() {
        let nav = MemoryNavigator::starting_at("/users");
        let state = SessionState::initial();

        assert_eq!(RouteGuard::default().enforce(&state, &nav), GuardDecision::Checking);
        assert_eq!(GuestGuard.enforce(&state, &nav), GuardDecision::Checking);
        assert_eq!(
            RoleGuard::for_section(Section::Users).enforce(&state, &nav),
            GuardDecision::Checking
        );
        assert!(nav.navigations().is_empty());
    }

    #[test]
    fn anonymous_is_replaced_to_login() {
        let nav = MemoryNavigator::starting_at("/companies");
        let decision = RoleGuard::for_section(Section::Companies)
            .enforce(&SessionState::anonymous(), &nav);

        assert_eq!(decision.redirect_target(), Some("/login"));
        assert_eq!(nav.navigations(), vec![Navigation::Replace("/login".into())]);
        assert_eq!(nav.history(), vec!["/login"]);
    }

    #[test]
    fn custom_login_path_is_used() {
        let guard = RouteGuard::new("/ingresar");
        assert_eq!(
            guard.evaluate(&SessionState::anonymous()).redirect_target(),
            Some("/ingresar")
        );
    }

    #[test]
    fn user_is_redirected_away_from_companies() {
        let nav = MemoryNavigator::starting_at("/companies");
        let decision = RoleGuard::for_section(Section::Companies).enforce(&signed_in(Role::User), &nav);

        assert_eq!(decision, GuardDecision::Redirect { to: "/profile".into() });
        assert_eq!(nav.navigations(), vec![Navigation::Replace("/profile".into())]);
    }

    #[test]
    fn admin_is_allowed_into_companies() {
        let nav = MemoryNavigator::starting_at("/companies");
        let decision = RoleGuard::for_section(Section::Companies).enforce(&signed_in(Role::Admin), &nav);

        assert_eq!(decision, GuardDecision::Allow);
        assert!(nav.navigations().is_empty());
    }

    #[test]
    fn access_denied_variant_renders_in_place() {
        let nav = MemoryNavigator::starting_at("/users");
        let guard = RoleGuard::for_section(Section::Users)
            .show_access_denied(AccessDeniedOptions::default());

        let GuardDecision::Deny(view) = guard.enforce(&signed_in(Role::Dealer), &nav) else {
            panic!("expected an access-denied view");
        };
        assert_eq!(view.current_role, Some(Role::Dealer));
        assert_eq!(view.allowed_roles, vec![Role::Admin]);
        assert_eq!(view.reason, DenialKind::RoleNotAllowed);
        assert!(nav.navigations().is_empty());
    }

    #[test]
    fn radian_needs_a_company_document() {
        let guard = RoleGuard::for_section(Section::Radianes).redirect_to("/documents");

        let without = signed_in(Role::Dealer);
        assert_eq!(guard.evaluate(&without).redirect_target(), Some("/documents"));

        let with = SessionState::authenticated(identity(Role::User).with_company_document("9001"));
        assert!(guard.evaluate(&with).is_allowed());
    }

    #[test]
    fn redirect_to_current_path_does_not_renavigate() {
        let nav = MemoryNavigator::starting_at("/profile");
        let guard = RoleGuard::for_section(Section::Versions);
        guard.enforce(&signed_in(Role::User), &nav);
        assert!(nav.navigations().is_empty());
    }

    #[test]
    fn guest_guard_sends_signed_in_users_to_their_landing_path() {
        let nav = MemoryNavigator::starting_at("/login");

        assert!(GuestGuard.enforce(&SessionState::anonymous(), &nav).is_allowed());
        assert_eq!(
            GuestGuard.enforce(&signed_in(Role::Dealer), &nav).redirect_target(),
            Some("/companies")
        );
        assert_eq!(
            GuestGuard.evaluate(&signed_in(Role::User)).redirect_target(),
            Some("/profile")
        );
    }

    #[test]
    fn guard_uses_the_section_table() {
        for section in Section::ALL {
            assert_eq!(RoleGuard::for_section(section).allowed_roles(), section.allowed_roles());
        }
    }
}
