//! `dian-core`: shared building blocks for the DIAN console.
//!
//! This crate contains **pure domain** primitives (no transport, no storage).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{CompanyId, UserId};
