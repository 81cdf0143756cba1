//! Session store: the single writer of "who is logged in".
//!
//! Lifecycle:
//! 1. constructed in the `Checking` shape (`is_loading = true`, no identity)
//! 2. [`SessionStore::restore`] runs once at startup
//! 3. steady state, mutated only by `login` / `logout` / `clear_error` and by
//!    the rejection subscriber registered through
//!    [`SessionStore::bind_interceptor`]
//!
//! Readers take snapshots or subscribe to the `watch` channel; they never
//! mutate.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use dian_auth::{Identity, LoginCredentials, PasswordChange, PermissionResolver};
use dian_client::{ApiError, AuthBackend, AuthInterceptor, CredentialStore, StorageError};
use dian_core::DomainError;

use crate::navigator::Navigator;

/// Process-wide authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    identity: Option<Identity>,
    is_loading: bool,
    error: Option<String>,
}

impl SessionState {
    /// State before `restore` has completed.
    pub fn initial() -> Self {
        Self {
            identity: None,
            is_loading: true,
            error: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            identity: None,
            is_loading: false,
            error: None,
        }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            is_loading: false,
            error: None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Derived from the identity; never stored separately.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn permissions(&self) -> PermissionResolver<'_> {
        PermissionResolver::new(self.identity.as_ref())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{0}")]
    Invalid(String),

    #[error("{message}")]
    Backend {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("{message}")]
    Storage {
        message: String,
        #[source]
        source: StorageError,
    },
}

impl LoginError {
    /// The line shown on the login form (same as `error` in the state).
    pub fn message(&self) -> &str {
        match self {
            LoginError::Invalid(message) => message,
            LoginError::Backend { message, .. } | LoginError::Storage { message, .. } => message,
        }
    }
}

#[derive(Debug, Error)]
pub enum PasswordChangeError {
    #[error("{0}")]
    Invalid(String),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("{message}")]
    Backend {
        message: String,
        #[source]
        source: ApiError,
    },
}

const STORAGE_FAILURE_MESSAGE: &str = "The session could not be saved on this device.";

pub struct SessionStore<B> {
    backend: B,
    credentials: CredentialStore,
    state: Arc<watch::Sender<SessionState>>,
    cache_user: bool,
}

impl<B: AuthBackend> SessionStore<B> {
    pub fn new(backend: B, credentials: CredentialStore) -> Self {
        let (state, _) = watch::channel(SessionState::initial());
        Self {
            backend,
            credentials,
            state: Arc::new(state),
            cache_user: true,
        }
    }

    /// Whether `login` also caches the identity blob (default: yes).
    pub fn with_user_cache(mut self, enabled: bool) -> Self {
        self.cache_user = enabled;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Restore a persisted session. Never fails; every failure path ends
    /// logged out with the credential erased and no error surfaced.
    pub async fn restore(&self) {
        self.state.send_modify(|s| s.is_loading = true);

        let token = match self.credentials.token() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored credential; starting logged out");
                None
            }
        };

        let Some(token) = token else {
            tracing::debug!("no stored credential; starting logged out");
            self.state.send_modify(|s| {
                s.identity = None;
                s.is_loading = false;
            });
            return;
        };

        match self.backend.current_user(&token).await {
            Ok(identity) => {
                tracing::info!(user = %identity.username, role = %identity.role, "session restored");
                self.state.send_modify(|s| {
                    s.identity = Some(identity);
                    s.is_loading = false;
                });
            }
            Err(err) => {
                tracing::info!(error = %err, "stored credential not accepted; discarding it");
                self.erase_credentials();
                self.state.send_modify(|s| {
                    s.identity = None;
                    s.is_loading = false;
                });
            }
        }
    }

    /// Log in. On failure the message is stored in the state and returned.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(), LoginError> {
        if let Err(err) = credentials.validate() {
            let message = validation_message(err);
            self.state.send_modify(|s| s.error = Some(message.clone()));
            return Err(LoginError::Invalid(message));
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let grant = match self.backend.login(credentials).await {
            Ok(grant) => grant,
            Err(source) => {
                let message = source.user_message();
                tracing::info!(user = %credentials.username, error = %source, "login failed");
                self.fail_login(&message);
                return Err(LoginError::Backend { message, source });
            }
        };

        if let Err(source) = self.credentials.store_token(&grant.access_token) {
            tracing::error!(error = %source, "failed to persist credential after login");
            let message = STORAGE_FAILURE_MESSAGE.to_string();
            self.fail_login(&message);
            return Err(LoginError::Storage { message, source });
        }

        if self.cache_user {
            if let Err(err) = self.credentials.cache_identity(&grant.identity) {
                tracing::warn!(error = %err, "failed to cache identity blob");
            }
        }

        tracing::info!(user = %grant.identity.username, role = %grant.identity.role, "logged in");
        self.state.send_modify(|s| {
            s.identity = Some(grant.identity);
            s.error = None;
            s.is_loading = false;
        });
        Ok(())
    }

    /// Log out. Always succeeds locally, whatever the backend says.
    pub async fn logout(&self) {
        self.state.send_modify(|s| s.is_loading = true);

        if let Err(err) = self.backend.logout().await {
            tracing::warn!(error = %err, "logout request failed; clearing local session anyway");
        }

        self.erase_credentials();
        self.state.send_modify(|s| {
            s.identity = None;
            s.error = None;
            s.is_loading = false;
        });
        tracing::info!("logged out");
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Change the current user's password. Session state is left untouched.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), PasswordChangeError> {
        change
            .validate()
            .map_err(|err| PasswordChangeError::Invalid(validation_message(err)))?;

        if !self.state.borrow().is_authenticated() {
            return Err(PasswordChangeError::NotAuthenticated);
        }

        self.backend.change_password(change).await.map_err(|source| {
            tracing::info!(error = %source, "password change rejected");
            PasswordChangeError::Backend {
                message: source.user_message(),
                source,
            }
        })
    }

    /// Subscribe this store to the interceptor's rejection signal.
    ///
    /// On a rejection the identity and error are cleared and the whole app is
    /// replace-navigated to `login_path`, unless it is already there (a
    /// rejected login must keep its form and message).
    pub fn bind_interceptor(
        &self,
        interceptor: &AuthInterceptor,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) {
        let state = Arc::clone(&self.state);
        let login_path = login_path.into();

        interceptor.on_rejection(move |rejection| {
            tracing::info!(path = %rejection.path, "session cleared after authentication rejection");
            state.send_modify(|s| {
                s.identity = None;
                s.error = None;
                s.is_loading = false;
            });
            if navigator.current().as_deref() != Some(login_path.as_str()) {
                navigator.replace(&login_path);
            }
        });
        tracing::debug!("session store bound to auth interceptor");
    }

    fn fail_login(&self, message: &str) {
        self.state.send_modify(|s| {
            s.error = Some(message.to_string());
            s.is_loading = false;
        });
    }

    fn erase_credentials(&self) {
        if let Err(err) = self.credentials.clear() {
            tracing::warn!(error = %err, "failed to erase stored credential");
        }
    }
}

fn validation_message(err: DomainError) -> String {
    match err {
        DomainError::Validation(message) => message,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use dian_auth::{BearerToken, Role};
    use dian_client::LoginGrant;
    use dian_core::UserId;

    fn identity(role: Role) -> Identity {
        Identity::new(UserId::new("u-1").unwrap(), "ana", "Ana", "ana@example.com", role)
    }

    #[derive(Default)]
    struct StubBackend {
        grant: RefCell<Option<Result<(Identity, String), ApiError>>>,
        password_result: RefCell<Option<ApiError>>,
        logout_calls: Cell<usize>,
        password_calls: Cell<usize>,
    }

    impl AuthBackend for StubBackend {
        async fn login(&self, _: &LoginCredentials) -> Result<LoginGrant, ApiError> {
            match self.grant.borrow_mut().take() {
                Some(Ok((identity, token))) => Ok(LoginGrant {
                    identity,
                    access_token: BearerToken::new(token),
                }),
                Some(Err(err)) => Err(err),
                None => Err(ApiError::Network("no stub".into())),
            }
        }

        async fn current_user(&self, _: &BearerToken) -> Result<Identity, ApiError> {
            Err(ApiError::Unauthorized { message: None })
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.logout_calls.set(self.logout_calls.get() + 1);
            Err(ApiError::Timeout)
        }

        async fn change_password(&self, _: &PasswordChange) -> Result<(), ApiError> {
            self.password_calls.set(self.password_calls.get() + 1);
            match self.password_result.borrow_mut().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn initial_state_is_checking() {
        let state = SessionState::default();
        assert!(state.is_loading());
        assert!(!state.is_authenticated());
        assert!(state.error().is_none());
    }

    #[test]
    fn authentication_is_derived_from_identity() {
        assert!(SessionState::authenticated(identity(Role::User)).is_authenticated());
        assert!(!SessionState::anonymous().is_authenticated());
    }

    #[tokio::test]
    async fn invalid_credentials_never_reach_the_backend() {
        let backend = StubBackend::default();
        *backend.grant.borrow_mut() = Some(Ok((identity(Role::Admin), "tok".into())));
        let store = SessionStore::new(backend, CredentialStore::in_memory());
        let err = store.login(&LoginCredentials::new("", "pw")).await.unwrap_err();

        assert!(matches!(err, LoginError::Invalid(_)));
        assert_eq!(store.snapshot().error(), Some("username is required"));
        assert!(store.backend().grant.borrow().is_some());
        assert!(!store.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn clear_error_only_touches_the_error() {
        let backend = StubBackend::default();
        *backend.grant.borrow_mut() = Some(Err(ApiError::Api {
            status: 401,
            message: Some("bad password".into()),
        }));
        let store = SessionStore::new(backend, CredentialStore::in_memory());
        store.restore().await;

        let mut rx = store.subscribe();
        let _ = store.login(&LoginCredentials::new("ana", "x")).await;
        assert_eq!(store.snapshot().error(), Some("bad password"));
        rx.mark_unchanged();

        store.clear_error();
        assert!(rx.has_changed().unwrap());
        let state = store.snapshot();
        assert!(state.error().is_none());
        assert!(!state.is_loading());

        // Clearing an already-empty error does not wake subscribers.
        rx.mark_unchanged();
        store.clear_error();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn identity_cache_can_be_disabled() {
        let backend = StubBackend::default();
        *backend.grant.borrow_mut() = Some(Ok((identity(Role::Dealer), "tok".into())));
        let credentials = CredentialStore::in_memory();
        let store = SessionStore::new(backend, credentials.clone()).with_user_cache(false);

        store.login(&LoginCredentials::new("ana", "pw")).await.unwrap();
        assert_eq!(credentials.token().unwrap().unwrap().as_str(), "tok");
        assert!(credentials.cached_identity().unwrap().is_none());
    }

    #[tokio::test]
    async fn change_password_requires_a_session() {
        let store = SessionStore::new(StubBackend::default(), CredentialStore::in_memory());
        store.restore().await;

        let err = store
            .change_password(&PasswordChange::new("old", "new", "new"))
            .await
            .unwrap_err();
        assert!(matches!(err, PasswordChangeError::NotAuthenticated));
        assert_eq!(store.backend().password_calls.get(), 0);
    }

    #[tokio::test]
    async fn change_password_reports_backend_message_and_keeps_session() {
        let backend = StubBackend::default();
        *backend.grant.borrow_mut() = Some(Ok((identity(Role::User), "tok".into())));
        *backend.password_result.borrow_mut() = Some(ApiError::Rejected {
            message: "Current password is wrong".into(),
        });
        let store = SessionStore::new(backend, CredentialStore::in_memory());
        store.login(&LoginCredentials::new("ana", "pw")).await.unwrap();
        let before = store.snapshot();

        let err = store
            .change_password(&PasswordChange::new("old", "new", "new"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Current password is wrong");
        assert_eq!(store.snapshot(), before);

        let err = store
            .change_password(&PasswordChange::new("old", "new", "typo"))
            .await
            .unwrap_err();
        assert!(matches!(err, PasswordChangeError::Invalid(_)));
        assert_eq!(store.backend().password_calls.get(), 1);
    }
}
