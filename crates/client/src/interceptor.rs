//! Global authentication interceptor.
//!
//! Every request issued through [`crate::ApiClient`] passes through one
//! `AuthInterceptor`:
//! - outgoing: the persisted bearer token (if any) is attached
//! - incoming: a 401 erases the persisted credential and notifies every
//!   registered [`RejectionListener`], whichever component issued the request
//!
//! This is the one writer of the credential storage besides the session
//! store. Listeners are how the rest of the system reacts (clear the session,
//! navigate to the login view) without the HTTP layer reaching into them.

use std::sync::{Arc, RwLock};

use dian_auth::BearerToken;

use crate::storage::CredentialStore;

/// Details of an authentication-rejection response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRejection {
    pub status: u16,
    pub path: String,
    pub message: Option<String>,
}

pub type RejectionListener = Arc<dyn Fn(&AuthRejection) + Send + Sync>;

pub struct AuthInterceptor {
    credentials: CredentialStore,
    listeners: RwLock<Vec<RejectionListener>>,
}

impl AuthInterceptor {
    pub fn new(credentials: CredentialStore) -> Self {
        Self {
            credentials,
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Register a subscriber for authentication rejections.
    pub fn on_rejection<F>(&self, listener: F)
    where
        F: Fn(&AuthRejection) + Send + Sync + 'static,
    {
        match self.listeners.write() {
            Ok(mut listeners) => listeners.push(Arc::new(listener)),
            Err(_) => tracing::error!("rejection listener registry poisoned; listener dropped"),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().map(|l| l.len()).unwrap_or(0)
    }

    /// Attach a bearer credential. An explicit token wins over the stored one.
    pub fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        explicit: Option<&BearerToken>,
    ) -> reqwest::RequestBuilder {
        if let Some(token) = explicit {
            return request.bearer_auth(token.as_str());
        }

        match self.credentials.token() {
            Ok(Some(token)) => request.bearer_auth(token.as_str()),
            Ok(None) => request,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored token; sending request unauthenticated");
                request
            }
        }
    }

    /// Handle an authentication-rejection response.
    ///
    /// The credential is erased before any listener runs, so listeners observe
    /// the logged-out storage state.
    pub fn reject(&self, rejection: AuthRejection) {
        tracing::info!(
            status = rejection.status,
            path = %rejection.path,
            "authentication rejected; clearing stored credential"
        );

        if let Err(err) = self.credentials.clear() {
            tracing::warn!(error = %err, "failed to erase stored credential after rejection");
        }

        // Snapshot so listeners may register further listeners without deadlocking.
        let listeners: Vec<RejectionListener> = match self.listeners.read() {
            Ok(listeners) => listeners.clone(),
            Err(_) => {
                tracing::error!("rejection listener registry poisoned");
                return;
            }
        };

        for listener in listeners {
            listener(&rejection);
        }
    }
}

impl core::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthInterceptor")
            .field("credentials", &self.credentials)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bearer_of(request: reqwest::RequestBuilder) -> Option<String> {
        let request = request.build().unwrap();
        request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn attaches_stored_token() {
        let credentials = CredentialStore::in_memory();
        credentials.store_token(&BearerToken::new("stored")).unwrap();
        let interceptor = AuthInterceptor::new(credentials);

        let request = reqwest::Client::new().get("http://localhost/api/companies");
        assert_eq!(
            bearer_of(interceptor.authorize(request, None)).as_deref(),
            Some("Bearer stored")
        );
    }

    #[test]
    fn explicit_token_wins_and_is_not_duplicated() {
        let credentials = CredentialStore::in_memory();
        credentials.store_token(&BearerToken::new("stored")).unwrap();
        let interceptor = AuthInterceptor::new(credentials);

        let explicit = BearerToken::new("explicit");
        let request = interceptor
            .authorize(reqwest::Client::new().get("http://localhost/x"), Some(&explicit))
            .build()
            .unwrap();

        let values: Vec<_> = request
            .headers()
            .get_all(reqwest::header::AUTHORIZATION)
            .iter()
            .collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "Bearer explicit");
    }

    #[test]
    fn no_token_no_header() {
        let interceptor = AuthInterceptor::new(CredentialStore::in_memory());
        let request = reqwest::Client::new().get("http://localhost/x");
        assert!(bearer_of(interceptor.authorize(request, None)).is_none());
    }

    #[test]
    fn rejection_erases_before_notifying() {
        let credentials = CredentialStore::in_memory();
        credentials.store_token(&BearerToken::new("stale")).unwrap();
        let interceptor = AuthInterceptor::new(credentials.clone());

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let observed = credentials.clone();
        interceptor.on_rejection(move |rejection| {
            assert_eq!(rejection.status, 401);
            assert!(observed.token().unwrap().is_none());
            seen.fetch_add(1, Ordering::SeqCst);
        });

        interceptor.reject(AuthRejection {
            status: 401,
            path: "/documents".to_string(),
            message: None,
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(credentials.token().unwrap().is_none());
    }
}
