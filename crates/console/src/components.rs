//! Shared building blocks: guard wrapper, layout, sidebar, access-denied view.

use std::rc::Rc;

use leptos::*;
use leptos_router::*;

use dian_session::access_denied::CONTACT_ADMIN_HINT;
use dian_session::{AccessDenied, Guard, GuardDecision, NavEntry, compose, is_active};

use crate::app::use_session;
use crate::browser::BrowserNavigator;

pub fn guard(guard: impl Guard + 'static) -> Rc<dyn Guard> {
    Rc::new(guard)
}

pub fn replace_history() -> NavigateOptions {
    NavigateOptions {
        replace: true,
        ..Default::default()
    }
}

/// Render `children` only when `guard` allows it.
#[component]
pub fn Guarded(guard: Rc<dyn Guard>, children: ChildrenFn) -> impl IntoView {
    let session = use_session();

    move || match guard.evaluate(&session.state.get()) {
        GuardDecision::Checking => view! { <Checking/> }.into_view(),
        GuardDecision::Redirect { to } => view! { <Redirect path=to options=replace_history()/> }.into_view(),
        GuardDecision::Allow => children().into_view(),
        GuardDecision::Deny(denied) => view! { <AccessDeniedView denied=denied/> }.into_view(),
    }
}

#[component]
pub fn Checking() -> impl IntoView {
    view! {
        <div class="checking">
            <div class="spinner"></div>
            <p>"Verificando permisos..."</p>
        </div>
    }
}

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="layout">
            <Sidebar/>
            <main class="content">{children()}</main>
        </div>
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let session = use_session();
    let location = use_location();

    let entries = move || {
        let state = session.state.get();
        compose(state.identity())
            .into_iter()
            .copied()
            .collect::<Vec<NavEntry>>()
    };

    let who = move || {
        session.state.get().identity().map(|identity| {
            let role = identity.role;
            view! {
                <div class="user">
                    <p class="name">{identity.name.clone()}</p>
                    <p class="email">{identity.email.clone()}</p>
                    <span class=format!("badge {}", role.badge().classes())>{role.display_name()}</span>
                </div>
            }
        })
    };

    let store = Rc::clone(&session.store);
    let logout = move |_| {
        let store = Rc::clone(&store);
        spawn_local(async move {
            store.logout().await;
        });
    };

    view! {
        <aside class="sidebar">
            {who}
            <nav>
                <ul>
                    <For
                        each=entries
                        key=|entry| entry.path
                        children=move |entry: NavEntry| {
                            let class = move || {
                                if is_active(&entry, &location.pathname.get()) {
                                    "nav-item active"
                                } else {
                                    "nav-item"
                                }
                            };
                            view! {
                                <li>
                                    <a href=entry.path class=class title=entry.description>
                                        <p class="label">{entry.label}</p>
                                        <p class="description">{entry.description}</p>
                                    </a>
                                </li>
                            }
                        }
                    />
                </ul>
            </nav>
            <button class="logout" on:click=logout>"Cerrar Sesión"</button>
        </aside>
    }
}

/// Read-only explanation of a denial with back/home affordances.
#[component]
pub fn AccessDeniedView(denied: AccessDenied) -> impl IntoView {
    let denied = Rc::new(denied);
    let current_badge = denied
        .current_role
        .map(|role| role.badge().classes())
        .unwrap_or("bg-gray-100 text-gray-800");

    let back = denied.show_back.then(|| {
        let denied = Rc::clone(&denied);
        view! { <button on:click=move |_| denied.go_back(&BrowserNavigator)>"Volver"</button> }
    });
    let home = denied.show_home.then(|| {
        let denied = Rc::clone(&denied);
        view! { <button class="primary" on:click=move |_| denied.go_home(&BrowserNavigator)>"Mi Perfil"</button> }
    });

    view! {
        <div class="access-denied">
            <h2>"Acceso Denegado"</h2>
            <p>{denied.message.clone()}</p>
            <div class="roles">
                <p><strong>"Tu rol actual:"</strong></p>
                <span class=format!("badge {current_badge}")>{denied.current_role_label()}</span>
            </div>
            <div class="roles">
                <p><strong>"Roles permitidos:"</strong></p>
                {denied
                    .allowed_role_labels()
                    .into_iter()
                    .map(|label| view! { <span class="badge bg-blue-100 text-blue-800">{label}</span> })
                    .collect_view()}
            </div>
            <div class="actions">{back}{home}</div>
            <p class="hint">{CONTACT_ADMIN_HINT}</p>
        </div>
    }
}
