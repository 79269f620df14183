//! Port for the identity provider's organization view.

use async_trait::async_trait;

use crate::domain::context::RequestContext;
use crate::domain::errors::DomainResult;

/// Fetches external organization IDs a caller has access to. Implementations
/// read JWT claims, call the IdP API, etc. Answers are never cached by the
/// core; membership can change at any time.
#[async_trait]
pub trait ExternalOrgProvider: Send + Sync {
    /// External org IDs the calling user belongs to.
    async fn get_user_orgs(&self, ctx: &RequestContext) -> DomainResult<Vec<String>>;

    /// Whether the calling user has access to a specific external org.
    async fn has_access(&self, ctx: &RequestContext, external_org_id: &str) -> DomainResult<bool>;
}
