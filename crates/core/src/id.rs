//! Strongly-typed identifiers used across the console.
//!
//! The backend owns identifier allocation, so these are thin wrappers around
//! whatever the API hands out: user ids are opaque strings, company ids are
//! numeric.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a console user (the authenticated actor).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a company registered for electronic invoicing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(i64);

impl UserId {
    /// Wrap a backend-issued id. Blank ids are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::invalid_id("UserId: empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl CompanyId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for CompanyId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for CompanyId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::invalid_id(format!("CompanyId: {}", e)))?;
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_user_id_is_rejected() {
        assert!(UserId::new("   ").is_err());
        assert_eq!(UserId::new("u-1").unwrap().as_str(), "u-1");
    }

    #[test]
    fn user_id_is_transparent_on_the_wire() {
        let id: UserId = serde_json::from_str("\"42a\"").unwrap();
        assert_eq!(id.to_string(), "42a");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42a\"");
    }

    #[test]
    fn company_id_parses_numbers_only() {
        assert_eq!("17".parse::<CompanyId>().unwrap().get(), 17);
        let err = "abc".parse::<CompanyId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }
}
