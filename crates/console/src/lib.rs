//! `dian-console`
//!
//! **Responsibility:** browser shell of the DIAN console.
//!
//! This crate provides:
//! - Build-time configuration (`settings`)
//! - `localStorage` credential storage and full-page navigation (wasm32)
//! - The Leptos app: login, guarded sections, sidebar, access-denied view
//!
//! All session and authorization decisions live in `dian-session`; this
//! crate only renders them.

pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
pub mod components;
#[cfg(target_arch = "wasm32")]
pub mod pages;

#[cfg(target_arch = "wasm32")]
use app::App;
#[cfg(target_arch = "wasm32")]
use leptos::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// WASM entry point, called when the module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = match settings::load() {
        Ok(config) => {
            dian_observability::init(&settings::log_settings(&config));
            config
        }
        Err(err) => {
            dian_observability::init(&dian_observability::LogSettings::default());
            tracing::error!(error = %err, "invalid build configuration; using defaults");
            dian_session::ConsoleConfig::default()
        }
    };

    mount_to_body(move || view! { <App config=config/> });
}
