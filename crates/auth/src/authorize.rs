use serde::Serialize;

use crate::{Identity, Requirement, Role, Section};

/// Resolves what the current identity may reach.
///
/// - No IO
/// - No panics
/// - Role membership comes from [`Section::allowed_roles`] only
///
/// With no identity every check resolves to `false`.
#[derive(Debug, Clone, Copy)]
pub struct PermissionResolver<'a> {
    identity: Option<&'a Identity>,
}

/// Per-section access flags for one identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapabilitySet {
    pub companies: bool,
    pub documents: bool,
    pub radianes: bool,
    pub users: bool,
    pub versions: bool,
    pub profile: bool,
}

impl CapabilitySet {
    pub fn contains(&self, section: Section) -> bool {
        match section {
            Section::Companies => self.companies,
            Section::Documents => self.documents,
            Section::Radianes => self.radianes,
            Section::Users => self.users,
            Section::Versions => self.versions,
            Section::Profile => self.profile,
        }
    }

    /// Sections present in the set, in declaration order.
    pub fn sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.contains(*s))
            .collect()
    }
}

impl<'a> PermissionResolver<'a> {
    pub fn new(identity: Option<&'a Identity>) -> Self {
        Self { identity }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.map(|i| i.role)
    }

    /// Ad hoc membership check for call sites outside the section table.
    pub fn has_role(&self, required: &[Role]) -> bool {
        self.role().is_some_and(|role| required.contains(&role))
    }

    /// `role ∈ allowed_roles(section)` and the section's data requirement.
    pub fn has_access_to(&self, section: Section) -> bool {
        let Some(identity) = self.identity else {
            return false;
        };
        section.allows(identity.role) && requirement_met(identity, section.requirement())
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn is_dealer(&self) -> bool {
        self.role() == Some(Role::Dealer)
    }

    pub fn is_user(&self) -> bool {
        self.role() == Some(Role::User)
    }

    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet {
            companies: self.has_access_to(Section::Companies),
            documents: self.has_access_to(Section::Documents),
            radianes: self.has_access_to(Section::Radianes),
            users: self.has_access_to(Section::Users),
            versions: self.has_access_to(Section::Versions),
            profile: self.has_access_to(Section::Profile),
        }
    }

    /// Explain why access to `section` is granted or denied.
    pub fn explain(&self, section: Section) -> AccessExplanation {
        let allowed_roles = section.allowed_roles().to_vec();

        let Some(identity) = self.identity else {
            return AccessExplanation {
                section,
                granted: false,
                reason: "no authenticated identity".to_string(),
                current_role: None,
                allowed_roles,
                denial: Some(DenialKind::Unauthenticated),
            };
        };

        let role = identity.role;
        if !section.allows(role) {
            return AccessExplanation {
                section,
                granted: false,
                reason: format!(
                    "role {} is not allowed in '{}' (allowed: {})",
                    role,
                    section,
                    join_roles(&allowed_roles)
                ),
                current_role: Some(role),
                allowed_roles,
                denial: Some(DenialKind::RoleNotAllowed),
            };
        }

        if !requirement_met(identity, section.requirement()) {
            return AccessExplanation {
                section,
                granted: false,
                reason: format!("'{}' requires a linked company document", section),
                current_role: Some(role),
                allowed_roles,
                denial: Some(DenialKind::MissingCompanyDocument),
            };
        }

        AccessExplanation {
            section,
            granted: true,
            reason: format!("role {} is allowed in '{}'", role, section),
            current_role: Some(role),
            allowed_roles,
            denial: None,
        }
    }
}

fn requirement_met(identity: &Identity, requirement: Option<Requirement>) -> bool {
    match requirement {
        None => true,
        Some(Requirement::CompanyDocument) => identity.has_company_document(),
    }
}

fn join_roles(roles: &[Role]) -> String {
    roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation (audit trail / access-denied view)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an access decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessExplanation {
    pub section: Section,
    pub granted: bool,
    /// Human-readable reason for the decision.
    pub reason: String,
    pub current_role: Option<Role>,
    pub allowed_roles: Vec<Role>,
    pub denial: Option<DenialKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    RoleNotAllowed,
    MissingCompanyDocument,
}

/// Section definition (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct SectionDefinition {
    pub section: Section,
    pub allowed_roles: Vec<Role>,
    pub requirement: Option<Requirement>,
}

/// Read-only view of the whole permission table.
#[derive(Debug, Clone, Serialize)]
pub struct SectionRegistry {
    pub sections: Vec<SectionDefinition>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        let sections = Section::ALL
            .into_iter()
            .map(|section| SectionDefinition {
                section,
                allowed_roles: section.allowed_roles().to_vec(),
                requirement: section.requirement(),
            })
            .collect();
        Self { sections }
    }

    /// Sections a role may reach by role alone (data requirements ignored).
    pub fn sections_for(&self, role: Role) -> Vec<Section> {
        self.sections
            .iter()
            .filter(|d| d.allowed_roles.contains(&role))
            .map(|d| d.section)
            .collect()
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
