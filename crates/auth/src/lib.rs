//! `dian-auth`: pure role/section authorization model for the console.
//!
//! This crate is intentionally decoupled from HTTP, storage and rendering.

pub mod authorize;
pub mod credentials;
pub mod identity;
pub mod permissions;
pub mod roles;

pub use authorize::{
    AccessExplanation, CapabilitySet, DenialKind, PermissionResolver, SectionDefinition,
    SectionRegistry,
};
pub use credentials::{BearerToken, LoginCredentials, PasswordChange, PasswordChangeBody};
pub use identity::{Identity, LinkedCompany, ResponsibleParty};
pub use permissions::{Requirement, Section};
pub use roles::{Role, RoleBadge};
