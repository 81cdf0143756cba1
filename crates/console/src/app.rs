//! Leptos application with routing.

use std::rc::Rc;
use std::sync::Arc;

use leptos::*;
use leptos_router::*;

use dian_auth::Section;
use dian_client::{ApiClient, ApiError, CredentialStore};
use dian_session::{ConsoleConfig, SessionState, SessionStore};

use crate::browser::{BrowserNavigator, WebStorage};
use crate::pages::{Landing, LoginPage, NotFound, ProfileRoute, SectionRoute};

pub type Store = SessionStore<ApiClient>;

/// Handle shared with every component through context.
#[derive(Clone)]
pub struct Session {
    pub store: Rc<Store>,
    /// Mirror of the store's `watch` channel for reactive reads.
    pub state: RwSignal<SessionState>,
    pub config: Rc<ConsoleConfig>,
}

impl Session {
    /// Wire storage, client, interceptor and store, then start `restore`.
    fn start(config: ConsoleConfig) -> Result<Self, ApiError> {
        let credentials = CredentialStore::with_keys(Arc::new(WebStorage), config.storage_keys());
        let client = ApiClient::new(config.client_config(), credentials.clone())?;
        let store = SessionStore::new(client, credentials).with_user_cache(config.cache_user);
        store.bind_interceptor(
            store.backend().interceptor(),
            Arc::new(BrowserNavigator),
            config.login_path.clone(),
        );

        let state = create_rw_signal(store.snapshot());
        let store = Rc::new(store);

        let mut rx = store.subscribe();
        spawn_local(async move {
            while rx.changed().await.is_ok() {
                let next = rx.borrow_and_update().clone();
                state.set(next);
            }
        });

        let restoring = Rc::clone(&store);
        spawn_local(async move {
            restoring.restore().await;
        });

        Ok(Self {
            store,
            state,
            config: Rc::new(config),
        })
    }
}

pub fn use_session() -> Session {
    expect_context::<Session>()
}

/// Main application component.
#[component]
pub fn App(config: ConsoleConfig) -> impl IntoView {
    let session = match Session::start(config) {
        Ok(session) => session,
        Err(err) => {
            tracing::error!(error = %err, "could not start the session");
            return view! { <p class="fatal">"No fue posible iniciar la aplicación."</p> }
                .into_view();
        }
    };
    provide_context(session);

    view! {
        <Router>
            <Routes>
                <Route path="/login" view=LoginPage/>
                <Route path="/" view=Landing/>
                <Route path="/companies" view=|| view! { <SectionRoute section=Section::Companies/> }/>
                <Route path="/documents" view=|| view! { <SectionRoute section=Section::Documents/> }/>
                <Route path="/radianes" view=|| view! { <SectionRoute section=Section::Radianes/> }/>
                <Route path="/users" view=|| view! { <SectionRoute section=Section::Users explain=true/> }/>
                <Route path="/versions" view=|| view! { <SectionRoute section=Section::Versions explain=true/> }/>
                <Route path="/profile" view=ProfileRoute/>
                <Route path="/*any" view=NotFound/>
            </Routes>
        </Router>
    }
    .into_view()
}
