use serde::{Deserialize, Serialize};

use crate::Role;

/// A reachable area of the console.
///
/// Sections are the unit of capability: the route guards and the sidebar both
/// resolve access through [`Section::allowed_roles`] and
/// [`Section::requirement`], never through role lists of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Company management (companies, resolutions, certificates).
    Companies,
    /// Issued electronic documents.
    Documents,
    /// Received documents inbox (accept/reject workflow).
    Radianes,
    /// User administration.
    Users,
    /// Software version management.
    Versions,
    /// The current user's own profile.
    Profile,
}

/// Data-dependent condition a section adds on top of its role list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// The identity must carry a non-blank `company_document`.
    CompanyDocument,
}

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Dealer, Role::User];
const ADMIN_DEALER: &[Role] = &[Role::Admin, Role::Dealer];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Companies,
        Section::Documents,
        Section::Radianes,
        Section::Users,
        Section::Versions,
        Section::Profile,
    ];

    /// The permission table.
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Section::Companies => ADMIN_DEALER,
            Section::Documents => ADMIN_DEALER,
            Section::Radianes => ALL_ROLES,
            Section::Users => ADMIN_ONLY,
            Section::Versions => ADMIN_ONLY,
            Section::Profile => ALL_ROLES,
        }
    }

    pub fn requirement(&self) -> Option<Requirement> {
        match self {
            Section::Radianes => Some(Requirement::CompanyDocument),
            Section::Companies
            | Section::Documents
            | Section::Users
            | Section::Versions
            | Section::Profile => None,
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Companies => "companies",
            Section::Documents => "documents",
            Section::Radianes => "radianes",
            Section::Users => "users",
            Section::Versions => "versions",
            Section::Profile => "profile",
        }
    }
}

impl core::fmt::Display for Section {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_and_versions_are_admin_only() {
        for section in [Section::Users, Section::Versions] {
            assert!(section.allows(Role::Admin));
            assert!(!section.allows(Role::Dealer));
            assert!(!section.allows(Role::User));
        }
    }

    #[test]
    fn every_role_reaches_profile() {
        for role in Role::ALL {
            assert!(Section::Profile.allows(role));
        }
    }

    #[test]
    fn only_radianes_has_a_data_requirement() {
        for section in Section::ALL {
            let expected = (section == Section::Radianes).then_some(Requirement::CompanyDocument);
            assert_eq!(section.requirement(), expected);
        }
    }
}
