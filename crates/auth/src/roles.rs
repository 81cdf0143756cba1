use core::str::FromStr;

use serde::{Deserialize, Serialize};

use dian_core::DomainError;

/// Role of a console user.
///
/// The set is closed: every role-dependent branch in the workspace matches on
/// this enum exhaustively, so adding a variant forces each call site to be
/// revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Dealer,
    User,
}

/// Colour family used when a role is rendered as a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleBadge {
    Red,
    Yellow,
    Green,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Dealer, Role::User];

    /// Wire representation (`"ADMIN"`, `"DEALER"`, `"USER"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Dealer => "DEALER",
            Role::User => "USER",
        }
    }

    /// Human-facing name shown in badges and the access-denied view.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Dealer => "Distribuidor",
            Role::User => "Usuario",
        }
    }

    pub fn badge(&self) -> RoleBadge {
        match self {
            Role::Admin => RoleBadge::Red,
            Role::Dealer => RoleBadge::Yellow,
            Role::User => RoleBadge::Green,
        }
    }

    /// One-line summary shown next to the role picker in user forms.
    pub fn description(&self) -> &'static str {
        match self {
            Role::Admin => "Full access to the system",
            Role::Dealer => "Access for dealers",
            Role::User => "Basic user access",
        }
    }
}

impl RoleBadge {
    /// CSS classes for the badge.
    pub fn classes(&self) -> &'static str {
        match self {
            RoleBadge::Red => "bg-red-100 text-red-800",
            RoleBadge::Yellow => "bg-yellow-100 text-yellow-800",
            RoleBadge::Green => "bg-green-100 text-green-800",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ADMIN" => Ok(Role::Admin),
            "DEALER" => Ok(Role::Dealer),
            "USER" => Ok(Role::User),
            other => Err(DomainError::unknown_variant("role", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_is_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Dealer).unwrap(), "\"DEALER\"");
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_str::<Role>("\"SUPERUSER\"").is_err());
        let err = "admin".parse::<Role>().unwrap_err();
        assert_eq!(err, DomainError::unknown_variant("role", "admin"));
    }

    #[test]
    fn from_str_matches_as_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(Role::Admin.display_name(), "Administrador");
        assert_eq!(Role::Dealer.display_name(), "Distribuidor");
        assert_eq!(Role::User.display_name(), "Usuario");
        assert_eq!(Role::Dealer.badge(), RoleBadge::Yellow);
    }
}
