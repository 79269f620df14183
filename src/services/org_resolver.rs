//! Organization resolution with positive-only TTL caching.
//!
//! Caches full organization records under both the internal and the external
//! id. Not-found outcomes are never cached, so newly created organizations
//! become visible within one cache-miss latency. Membership answers from the
//! external provider are never cached either.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use crate::domain::context::RequestContext;
use crate::domain::errors::DomainResult;
use crate::domain::models::organization::Organization;
use crate::domain::ports::{ExternalOrgProvider, OrganizationRepository};

/// Maximum number of cached organization records per cache.
const ORG_CACHE_MAX_CAPACITY: u64 = 10_000;

pub struct OrgResolver {
    store: Arc<dyn OrganizationRepository>,
    external_provider: Arc<dyn ExternalOrgProvider>,
    by_internal_id: Cache<Uuid, Arc<Organization>>,
    by_external_id: Cache<String, Arc<Organization>>,
}

impl OrgResolver {
    /// A TTL of zero builds the caches without expiration.
    pub fn new(
        store: Arc<dyn OrganizationRepository>,
        external_provider: Arc<dyn ExternalOrgProvider>,
        ttl: Duration,
    ) -> Self {
        let mut internal = Cache::builder().max_capacity(ORG_CACHE_MAX_CAPACITY);
        let mut external = Cache::builder().max_capacity(ORG_CACHE_MAX_CAPACITY);
        if !ttl.is_zero() {
            internal = internal.time_to_live(ttl);
            external = external.time_to_live(ttl);
        }

        Self {
            store,
            external_provider,
            by_internal_id: internal.build(),
            by_external_id: external.build(),
        }
    }

    /// Confirms the organization exists, caching the positive lookup.
    pub async fn ensure_exists(&self, org_id: Uuid) -> DomainResult<()> {
        self.get_by_id(org_id).await.map(|_| ())
    }

    pub async fn get_external_id(&self, org_id: Uuid) -> DomainResult<String> {
        let org = self.get_by_id(org_id).await?;
        Ok(org.external_id.clone())
    }

    /// Resolves the record, then asks the external provider whether the
    /// caller may access that external org. The provider's answer is
    /// consulted fresh on every call.
    pub async fn validate_access(&self, ctx: &RequestContext, org_id: Uuid) -> DomainResult<bool> {
        let org = self.get_by_id(org_id).await?;
        self.external_provider
            .has_access(ctx, &org.external_id)
            .await
    }

    /// Cached lookup by external id, for identity mapping.
    pub async fn get_by_external_id(
        &self,
        external_id: &str,
    ) -> DomainResult<Option<Arc<Organization>>> {
        if let Some(cached) = self.by_external_id.get(external_id).await {
            return Ok(Some(cached));
        }

        match self.store.get_by_external_id(external_id).await? {
            Some(org) => {
                let org = Arc::new(org);
                self.cache_org(&org).await;
                Ok(Some(org))
            }
            None => Ok(None),
        }
    }

    async fn get_by_id(&self, org_id: Uuid) -> DomainResult<Arc<Organization>> {
        if let Some(cached) = self.by_internal_id.get(&org_id).await {
            return Ok(cached);
        }

        // Cache miss. Errors (including not-found) propagate uncached.
        let org = Arc::new(self.store.get_by_id(org_id).await?);
        self.cache_org(&org).await;
        Ok(org)
    }

    async fn cache_org(&self, org: &Arc<Organization>) {
        self.by_internal_id.insert(org.id, org.clone()).await;
        self.by_external_id
            .insert(org.external_id.clone(), org.clone())
            .await;
    }
}
