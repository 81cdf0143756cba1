//! `dian-client`: thin REST plumbing for the DIAN console.
//!
//! **Responsibility:** talk to the back office API on behalf of the session
//! layer. This crate provides:
//! - `ApiClient` with a single, global authentication interceptor
//! - The `AuthBackend` contract the session store is written against
//! - Durable credential storage (token + cached identity)

pub mod api;
pub mod backend;
pub mod envelope;
pub mod error;
pub mod interceptor;
pub mod storage;

pub use api::{ApiClient, ClientConfig, DEFAULT_BASE_URL};
pub use backend::AuthBackend;
pub use envelope::{ApiResponse, ErrorBody, LoginGrant};
pub use error::{ApiError, CONNECTIVITY_MESSAGE};
pub use interceptor::{AuthInterceptor, AuthRejection, RejectionListener};
pub use storage::{CredentialStorage, CredentialStore, MemoryStorage, StorageError, StorageKeys};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
