//! Port the Publisher uses to discover registered tenants.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::organization::OrganizationSummary;

#[async_trait]
pub trait OrganizationService: Send + Sync {
    /// Lists all tenants. Each summary's `name` is the string form of the
    /// organization's internal UUID.
    async fn list_organizations(&self) -> DomainResult<Vec<OrganizationSummary>>;
}
