//! Sidebar composition.
//!
//! Entries are filtered through [`PermissionResolver::has_access_to`], the
//! same check the role guards use, so a link is shown iff following it would
//! be allowed.

use serde::Serialize;

use dian_auth::{Identity, PermissionResolver, Section};

use crate::config::DEFAULT_HOME_PATH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub section: Section,
    pub label: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// Candidate entries in display order.
pub const NAV_ENTRIES: [NavEntry; 6] = [
    NavEntry {
        section: Section::Companies,
        label: "Empresas",
        path: "/companies",
        description: "Gestión de empresas",
    },
    NavEntry {
        section: Section::Documents,
        label: "Documentos",
        path: "/documents",
        description: "Documentos electrónicos",
    },
    NavEntry {
        section: Section::Radianes,
        label: "RADIAN",
        path: "/radianes",
        description: "Documentos recibidos",
    },
    NavEntry {
        section: Section::Users,
        label: "Usuarios",
        path: "/users",
        description: "Gestión de usuarios",
    },
    NavEntry {
        section: Section::Versions,
        label: "Versiones",
        path: "/versions",
        description: "Versiones del software",
    },
    NavEntry {
        section: Section::Profile,
        label: "Mi Perfil",
        path: "/profile",
        description: "Datos de tu cuenta",
    },
];

pub fn entry_for(section: Section) -> &'static NavEntry {
    match section {
        Section::Companies => &NAV_ENTRIES[0],
        Section::Documents => &NAV_ENTRIES[1],
        Section::Radianes => &NAV_ENTRIES[2],
        Section::Users => &NAV_ENTRIES[3],
        Section::Versions => &NAV_ENTRIES[4],
        Section::Profile => &NAV_ENTRIES[5],
    }
}

/// Entries visible to `identity`, in declared order. Empty when logged out.
pub fn compose(identity: Option<&Identity>) -> Vec<&'static NavEntry> {
    let resolver = PermissionResolver::new(identity);
    NAV_ENTRIES
        .iter()
        .filter(|entry| resolver.has_access_to(entry.section))
        .collect()
}

/// Where an identity lands after login: its first visible entry.
pub fn landing_path(identity: Option<&Identity>) -> &'static str {
    compose(identity)
        .first()
        .map(|entry| entry.path)
        .unwrap_or(DEFAULT_HOME_PATH)
}

/// Exact match or a nested route (`/companies/create` under `/companies`).
pub fn is_active(entry: &NavEntry, current_path: &str) -> bool {
    match current_path.strip_prefix(entry.path) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
