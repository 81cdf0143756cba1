//! The authenticated actor as reported by the backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use dian_core::{CompanyId, UserId};

use crate::Role;

/// Company an identity is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedCompany {
    pub id: CompanyId,
    pub identification_number: String,
    pub name: String,
}

/// Person responsible for the linked company.
///
/// Only the received-documents workflow reads these; the session layer
/// carries them through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsibleParty {
    #[serde(default, rename = "document_person_responsible")]
    pub document: Option<String>,
    #[serde(default, rename = "first_name_person_responsible")]
    pub first_name: Option<String>,
    #[serde(default, rename = "last_name_person_responsible")]
    pub last_name: Option<String>,
    #[serde(default, rename = "job_title_person_responsible")]
    pub job_title: Option<String>,
    #[serde(default, rename = "organization_department_person_responsible")]
    pub department: Option<String>,
}

/// Identity of an authenticated console user.
///
/// Stored exactly as the backend returns it; the only shape requirement is
/// that `role` is one of the closed [`Role`] variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, rename = "createdAt", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "updatedAt", deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub company: Option<LinkedCompany>,
    #[serde(default)]
    pub company_document: Option<String>,
    #[serde(flatten)]
    pub responsible: ResponsibleParty,
}

impl Identity {
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            name: name.into(),
            email: email.into(),
            role,
            created_at: None,
            updated_at: None,
            company: None,
            company_document: None,
            responsible: ResponsibleParty::default(),
        }
    }

    pub fn with_company_document(mut self, document: impl Into<String>) -> Self {
        self.company_document = Some(document.into());
        self
    }

    pub fn with_company(mut self, company: LinkedCompany) -> Self {
        self.company = Some(company);
        self
    }

    /// True iff a non-blank `company_document` is present.
    pub fn has_company_document(&self) -> bool {
        self.company_document
            .as_deref()
            .is_some_and(|doc| !doc.trim().is_empty())
    }
}

/// Timestamps are informational: RFC 3339 or `YYYY-MM-DD HH:MM:SS` (taken as
/// UTC) are kept, anything else decodes to `None` instead of failing the
/// whole identity.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(text) = raw.as_ref().and_then(|v| v.as_str()).map(str::trim) else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    Ok(["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_payload() {
        let json = serde_json::json!({
            "id": "7f3c",
            "username": "dealer1",
            "name": "Dealer One",
            "email": "dealer@example.com",
            "role": "DEALER",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-02T10:00:00Z",
            "company": { "id": 12, "identification_number": "900123456", "name": "ACME SAS" },
            "company_document": "900123456",
            "first_name_person_responsible": "Ana",
            "job_title_person_responsible": "Contadora"
        });

        let identity: Identity = serde_json::from_value(json).unwrap();
        assert_eq!(identity.role, Role::Dealer);
        assert_eq!(identity.company.as_ref().unwrap().id, CompanyId::new(12));
        assert!(identity.has_company_document());
        assert_eq!(identity.responsible.first_name.as_deref(), Some("Ana"));
        assert_eq!(identity.responsible.job_title.as_deref(), Some("Contadora"));
        assert!(identity.responsible.document.is_none());
    }

    #[test]
    fn optional_fields_may_be_missing() {
        let json = serde_json::json!({
            "id": "1",
            "username": "u",
            "name": "U",
            "email": "u@example.com",
            "role": "USER"
        });

        let identity: Identity = serde_json::from_value(json).unwrap();
        assert!(identity.company.is_none());
        assert!(identity.created_at.is_none());
        assert!(!identity.has_company_document());
    }

    #[test]
    fn odd_timestamps_do_not_reject_the_identity() {
        let json = serde_json::json!({
            "id": "1",
            "username": "u",
            "name": "U",
            "email": "u@example.com",
            "role": "ADMIN",
            "createdAt": "2024-03-01 10:00:00",
            "updatedAt": "last tuesday"
        });

        let identity: Identity = serde_json::from_value(json).unwrap();
        assert_eq!(
            identity.created_at.unwrap().to_rfc3339(),
            "2024-03-01T10:00:00+00:00"
        );
        assert!(identity.updated_at.is_none());
    }

    #[test]
    fn non_string_timestamps_decode_to_none() {
        let json = serde_json::json!({
            "id": "1",
            "username": "u",
            "name": "U",
            "email": "u@example.com",
            "role": "USER",
            "createdAt": null,
            "updatedAt": 1709287200
        });

        let identity: Identity = serde_json::from_value(json).unwrap();
        assert!(identity.created_at.is_none());
        assert!(identity.updated_at.is_none());
    }

    #[test]
    fn blank_company_document_does_not_count() {
        let id = UserId::new("1").unwrap();
        let identity = Identity::new(id, "u", "U", "u@example.com", Role::User)
            .with_company_document("   ");
        assert!(!identity.has_company_document());
    }
}
