//! Organization (tenant) and caller identity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Internal ID of the default organization, created on first migration.
///
/// Exactly one row carries this ID; requests that name no organization and
/// whose caller belongs to none fall back to it.
pub const DEFAULT_ORG_ID: Uuid = Uuid::nil();

/// Display name substituted when an organization row has none.
pub const DEFAULT_DISPLAY_NAME: &str = "Default Organization";

/// A tenant. Every API object belongs to exactly one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Internal ID assigned by this system on first observation.
    pub id: Uuid,
    /// Identifier in the configured identity provider. Unique; empty for the
    /// default organization.
    pub external_id: String,
    pub display_name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(external_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            external_id: external_id.into(),
            display_name: display_name.into(),
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Listing form handed to the Publisher and to API callers. `name` is the
/// string form of the organization's internal UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub name: String,
    pub display_name: String,
}

/// One organization a caller belongs to, as mapped from the identity
/// provider: the IdP-side external ID together with the internal ID it
/// resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalOrganization {
    pub id: Uuid,
    pub external_id: String,
}

/// Per-request caller record. Synthesized by the identity-mapping layer,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub uid: String,
    pub groups: Vec<String>,
    pub organizations: Vec<ExternalOrganization>,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn with_organizations(mut self, organizations: Vec<ExternalOrganization>) -> Self {
        self.organizations = organizations;
        self
    }

    /// True if the caller's mapped organizations include the given external ID.
    pub fn belongs_to_external(&self, external_id: &str) -> bool {
        self.organizations
            .iter()
            .any(|org| org.external_id == external_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_org_id_is_nil() {
        assert!(DEFAULT_ORG_ID.is_nil());
    }

    #[test]
    fn test_new_organization_is_not_default() {
        let org = Organization::new("ext-1", "Acme");
        assert!(!org.is_default);
        assert!(!org.id.is_nil());
        assert_eq!(org.external_id, "ext-1");
    }

    #[test]
    fn test_identity_membership() {
        let identity = Identity::new("alice").with_organizations(vec![ExternalOrganization {
            id: Uuid::new_v4(),
            external_id: "ext-a".into(),
        }]);

        assert!(identity.belongs_to_external("ext-a"));
        assert!(!identity.belongs_to_external("ext-b"));
    }
}
