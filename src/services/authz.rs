//! Per-request organization permission check.

use std::sync::Arc;

use tracing::debug;

use crate::domain::context::RequestContext;
use crate::domain::errors::{DomainError, DomainResult};
use crate::services::org_resolver::OrgResolver;

/// Grants access when the caller's mapped organizations include the external
/// id of the organization named by the request context.
pub struct OrgMembershipAuthz {
    resolver: Arc<OrgResolver>,
}

impl OrgMembershipAuthz {
    pub fn new(resolver: Arc<OrgResolver>) -> Self {
        Self { resolver }
    }

    /// Returns `Ok(false)` for an explicit denial (unknown org, caller not a
    /// member); errors are reserved for infrastructure faults and missing
    /// context values.
    pub async fn check_permission(
        &self,
        ctx: &RequestContext,
        resource: &str,
        op: &str,
    ) -> DomainResult<bool> {
        // Callers must be able to discover which orgs they belong to without
        // already naming one.
        if resource == "organizations" && op == "list" {
            return Ok(true);
        }

        let org_id = ctx.org_id().ok_or(DomainError::MissingOrganizationId)?;

        let external_id = match self.resolver.get_external_id(org_id).await {
            Ok(external_id) => external_id,
            Err(DomainError::OrganizationNotFound(_)) => return Ok(false),
            Err(err) => return Err(err),
        };

        let identity = ctx.identity().ok_or(DomainError::MissingIdentity)?;
        let allowed = identity.belongs_to_external(&external_id);
        debug!(
            org_id = %org_id,
            resource,
            op,
            allowed,
            "organization membership check"
        );
        Ok(allowed)
    }
}
