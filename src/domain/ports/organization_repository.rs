//! Port for organization persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::organization::Organization;

/// Storage for the organizations table. Implementations must keep
/// `external_id` unique so that concurrent lazy provisionings for the same
/// external id collapse to one row.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Fetch by internal id. Missing rows are
    /// `DomainError::OrganizationNotFound`.
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Organization>;

    /// Fetch by external id. Missing rows are `Ok(None)`; callers provision
    /// lazily on that path.
    async fn get_by_external_id(&self, external_id: &str) -> DomainResult<Option<Organization>>;

    /// All organizations, newest first.
    async fn list(&self) -> DomainResult<Vec<Organization>>;

    /// Insert unless a row with the same external id already exists, then
    /// return the surviving row.
    async fn create_if_absent(&self, org: &Organization) -> DomainResult<Organization>;

    /// Display name is the only mutable organization attribute.
    async fn update_display_name(&self, id: Uuid, display_name: &str) -> DomainResult<()>;
}
