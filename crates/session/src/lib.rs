//! `dian-session`: session lifecycle, guards and sidebar composition.
//!
//! The [`SessionStore`] is the only writer of [`SessionState`]. Guards and
//! the navigation composer read snapshots of it and decide through
//! `dian_auth::PermissionResolver`.

pub mod access_denied;
pub mod config;
pub mod guard;
pub mod navigation;
pub mod navigator;
pub mod store;

pub use access_denied::{AccessDenied, AccessDeniedOptions};
pub use config::{ConsoleConfig, DEFAULT_HOME_PATH, DEFAULT_LOGIN_PATH};
pub use guard::{Forbidden, Guard, GuardDecision, GuestGuard, RoleGuard, RouteGuard};
pub use navigation::{NAV_ENTRIES, NavEntry, compose, entry_for, is_active, landing_path};
pub use navigator::{MemoryNavigator, Navigation, Navigator};
pub use store::{LoginError, PasswordChangeError, SessionState, SessionStore};
