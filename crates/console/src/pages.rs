//! Routed pages.

use std::rc::Rc;

use leptos::*;
use leptos_router::*;

use dian_auth::{LoginCredentials, PasswordChange, Section};
use dian_session::{
    AccessDeniedOptions, GuestGuard, RoleGuard, RouteGuard, entry_for, landing_path,
};

use crate::app::use_session;
use crate::components::{Guarded, Layout, guard, replace_history};

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <Guarded guard=guard(GuestGuard)>
            <LoginForm/>
        </Guarded>
    }
}

#[component]
fn LoginForm() -> impl IntoView {
    let session = use_session();
    let username = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let submitting = create_rw_signal(false);
    let state = session.state;

    let clear_store = Rc::clone(&session.store);
    let clear_error = move || {
        if state.get_untracked().error().is_some() {
            clear_store.clear_error();
        }
    };
    let clear_on_password = clear_error.clone();

    let store = Rc::clone(&session.store);
    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        submitting.set(true);
        let store = Rc::clone(&store);
        let credentials = LoginCredentials::new(username.get_untracked(), password.get_untracked());
        spawn_local(async move {
            // The outcome is published through the session state.
            let _ = store.login(&credentials).await;
            submitting.set(false);
        });
    };

    view! {
        <div class="login">
            <h1>"Iniciar Sesión"</h1>
            <form on:submit=submit>
                <label for="username">"Usuario"</label>
                <input
                    id="username"
                    type="text"
                    autocomplete="username"
                    prop:value=move || username.get()
                    on:input=move |ev| {
                        username.set(event_target_value(&ev));
                        clear_error();
                    }
                />
                <label for="password">"Contraseña"</label>
                <input
                    id="password"
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| {
                        password.set(event_target_value(&ev));
                        clear_on_password();
                    }
                />
                {move || state.get().error().map(|message| view! { <p class="error">{message.to_string()}</p> })}
                <button type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Ingresando..." } else { "Ingresar" }}
                </button>
            </form>
        </div>
    }
}

/// `/` forwards an authenticated identity to its first visible section.
#[component]
pub fn Landing() -> impl IntoView {
    let session = use_session();
    let login_path = session.config.login_path.clone();
    let state = session.state;

    view! {
        <Guarded guard=guard(RouteGuard::new(login_path))>
            {move || {
                let to = landing_path(state.get().identity());
                view! { <Redirect path=to options=replace_history()/> }
            }}
        </Guarded>
    }
}

/// A role-guarded section.
///
/// `explain` renders the access-denied view instead of redirecting to the
/// home path.
#[component]
pub fn SectionRoute(section: Section, #[prop(optional)] explain: bool) -> impl IntoView {
    let session = use_session();
    let config = Rc::clone(&session.config);

    let role_guard = RoleGuard::for_section(section).with_login_path(config.login_path.clone());
    let role_guard = if explain {
        role_guard.show_access_denied(
            AccessDeniedOptions::default().with_home_path(config.home_path.clone()),
        )
    } else {
        role_guard.redirect_to(config.home_path.clone())
    };

    view! {
        <Guarded guard=guard(role_guard)>
            <Layout>
                <SectionPage section=section/>
            </Layout>
        </Guarded>
    }
}

#[component]
fn SectionPage(section: Section) -> impl IntoView {
    let entry = entry_for(section);
    view! {
        <section class="page">
            <h1>{entry.label}</h1>
            <p class="description">{entry.description}</p>
        </section>
    }
}

#[component]
pub fn ProfileRoute() -> impl IntoView {
    let session = use_session();
    let role_guard = RoleGuard::for_section(Section::Profile)
        .with_login_path(session.config.login_path.clone());

    view! {
        <Guarded guard=guard(role_guard)>
            <Layout>
                <ProfilePage/>
                <ChangePasswordForm/>
            </Layout>
        </Guarded>
    }
}

#[component]
fn ProfilePage() -> impl IntoView {
    let state = use_session().state;

    move || {
        state.get().identity().cloned().map(|identity| {
            let role = identity.role;
            let company = identity
                .company
                .as_ref()
                .map(|company| company.name.clone())
                .unwrap_or_else(|| "Sin empresa asociada".to_string());
            view! {
                <section class="page profile">
                    <h1>"Mi Perfil"</h1>
                    <dl>
                        <dt>"Nombre"</dt><dd>{identity.name}</dd>
                        <dt>"Usuario"</dt><dd>{identity.username}</dd>
                        <dt>"Correo"</dt><dd>{identity.email}</dd>
                        <dt>"Empresa"</dt><dd>{company}</dd>
                        <dt>"Rol"</dt>
                        <dd>
                            <span class=format!("badge {}", role.badge().classes())>{role.display_name()}</span>
                            <p class="role-description">{role.description()}</p>
                        </dd>
                    </dl>
                </section>
            }
        })
    }
}

#[component]
fn ChangePasswordForm() -> impl IntoView {
    let session = use_session();
    let current = create_rw_signal(String::new());
    let new_password = create_rw_signal(String::new());
    let confirm = create_rw_signal(String::new());
    let outcome = create_rw_signal(None::<Result<(), String>>);
    let submitting = create_rw_signal(false);

    let store = Rc::clone(&session.store);
    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        submitting.set(true);
        let store = Rc::clone(&store);
        let change = PasswordChange::new(
            current.get_untracked(),
            new_password.get_untracked(),
            confirm.get_untracked(),
        );
        spawn_local(async move {
            let result = store.change_password(&change).await.map_err(|err| err.to_string());
            if result.is_ok() {
                current.set(String::new());
                new_password.set(String::new());
                confirm.set(String::new());
            }
            outcome.set(Some(result));
            submitting.set(false);
        });
    };

    let field = move |id: &'static str, label: &'static str, value: RwSignal<String>| {
        view! {
            <label for=id>{label}</label>
            <input
                id=id
                type="password"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <section class="page change-password">
            <h2>"Cambiar Contraseña"</h2>
            <form on:submit=submit>
                {field("current-password", "Contraseña actual", current)}
                {field("new-password", "Nueva contraseña", new_password)}
                {field("confirm-password", "Confirmar contraseña", confirm)}
                {move || match outcome.get() {
                    Some(Ok(())) => Some(view! { <p class="success">"Contraseña actualizada."</p> }),
                    Some(Err(message)) => Some(view! { <p class="error">{message}</p> }),
                    None => None,
                }}
                <button type="submit" disabled=move || submitting.get()>"Guardar"</button>
            </form>
        </section>
    }
}

#[component]
pub fn NotFound() -> impl IntoView {
    let login_path = use_session().config.login_path.clone();
    view! { <Redirect path=login_path options=replace_history()/> }
}
