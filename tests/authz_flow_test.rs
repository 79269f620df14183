//! Integration tests for the request-gating pipeline: organization
//! resolution, membership authorization, and org selection, over the real
//! SQLite repository.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use flightdeck::adapters::sqlite::{create_migrated_test_pool, SqliteOrganizationRepository};
use flightdeck::domain::context::RequestContext;
use flightdeck::domain::errors::{DomainError, DomainResult};
use flightdeck::domain::models::certificate::{
    encode_utf8_string, CertificateExtension, PeerCertificate, ORG_ID_EXTENSION_OID,
};
use flightdeck::domain::models::organization::{
    ExternalOrganization, Identity, Organization, DEFAULT_ORG_ID,
};
use flightdeck::domain::ports::{ExternalOrgProvider, OrganizationRepository};
use flightdeck::services::{
    resolve_request_org, OrgIdExtractor, OrgMembershipAuthz, OrgResolver, OrganizationDirectory,
};

/// Grants access to a fixed set of external org ids.
struct AllowListProvider {
    allowed: Vec<String>,
}

#[async_trait]
impl ExternalOrgProvider for AllowListProvider {
    async fn get_user_orgs(&self, _ctx: &RequestContext) -> DomainResult<Vec<String>> {
        Ok(self.allowed.clone())
    }

    async fn has_access(&self, _ctx: &RequestContext, external_org_id: &str) -> DomainResult<bool> {
        Ok(self.allowed.iter().any(|id| id == external_org_id))
    }
}

async fn repo() -> Arc<SqliteOrganizationRepository> {
    let pool = create_migrated_test_pool().await.expect("test pool");
    Arc::new(SqliteOrganizationRepository::new(pool))
}

fn resolver_over(
    repo: Arc<SqliteOrganizationRepository>,
    allowed: Vec<String>,
) -> Arc<OrgResolver> {
    Arc::new(OrgResolver::new(
        repo,
        Arc::new(AllowListProvider { allowed }),
        Duration::from_secs(60),
    ))
}

fn identity_in(external_ids: &[&str]) -> Identity {
    Identity::new("alice").with_organizations(
        external_ids
            .iter()
            .map(|id| ExternalOrganization {
                id: Uuid::new_v4(),
                external_id: (*id).to_string(),
            })
            .collect(),
    )
}

#[tokio::test]
async fn test_membership_mismatch_is_denied_without_error() {
    let repo = repo().await;
    let org = Organization::new("e2", "Org E2");
    repo.create_if_absent(&org).await.unwrap();

    let authz = OrgMembershipAuthz::new(resolver_over(repo, vec![]));
    let ctx = RequestContext::new()
        .with_org_id(org.id)
        .with_identity(identity_in(&["e1"]));

    let allowed = authz.check_permission(&ctx, "devices", "get").await.unwrap();
    assert!(!allowed);
}

#[tokio::test]
async fn test_member_is_allowed_end_to_end() {
    let repo = repo().await;
    let org = Organization::new("e1", "Org E1");
    repo.create_if_absent(&org).await.unwrap();

    let authz = OrgMembershipAuthz::new(resolver_over(repo, vec!["e1".into()]));
    let ctx = RequestContext::new()
        .with_org_id(org.id)
        .with_identity(identity_in(&["e1"]));

    assert!(authz.check_permission(&ctx, "fleets", "list").await.unwrap());
}

#[tokio::test]
async fn test_org_created_after_miss_is_visible_immediately() {
    let repo = repo().await;
    let resolver = resolver_over(repo.clone(), vec![]);

    let org = Organization::new("late", "Late Org");

    // Miss before creation; the not-found must not be cached.
    let err = resolver.ensure_exists(org.id).await.unwrap_err();
    assert!(matches!(err, DomainError::OrganizationNotFound(_)));

    repo.create_if_absent(&org).await.unwrap();

    resolver.ensure_exists(org.id).await.unwrap();
    assert_eq!(resolver.get_external_id(org.id).await.unwrap(), "late");
}

#[tokio::test]
async fn test_lazy_provisioning_then_authorization() {
    let repo = repo().await;
    let directory = OrganizationDirectory::new(repo.clone());

    // First observation of a new external id provisions the org.
    let org = directory.resolve_external("idp-42", "Team 42").await.unwrap();

    let authz = OrgMembershipAuthz::new(resolver_over(repo, vec!["idp-42".into()]));
    let ctx = RequestContext::new()
        .with_org_id(org.id)
        .with_identity(identity_in(&["idp-42"]));

    assert!(authz.check_permission(&ctx, "devices", "list").await.unwrap());
}

#[tokio::test]
async fn test_validate_access_against_provider() {
    let repo = repo().await;
    let org = Organization::new("e9", "Org E9");
    repo.create_if_absent(&org).await.unwrap();

    let resolver = resolver_over(repo, vec!["e9".into()]);
    let ctx = RequestContext::new();

    assert!(resolver.validate_access(&ctx, org.id).await.unwrap());
    assert!(!resolver
        .validate_access(&ctx, DEFAULT_ORG_ID)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_certificate_extraction_feeds_selection() {
    let org_id = Uuid::new_v4();
    let cert = PeerCertificate::new(vec![CertificateExtension {
        oid: ORG_ID_EXTENSION_OID.to_string(),
        value: encode_utf8_string(&org_id.to_string()),
    }]);
    let ctx = RequestContext::new()
        .with_peer_certificate(cert)
        .with_identity(identity_in(&["e1", "e2"]));

    // The certificate names an org, so the multi-org identity is not
    // consulted and no ambiguity arises.
    let resolved = resolve_request_org(OrgIdExtractor::ClientCertificate, &ctx, None).unwrap();
    assert_eq!(resolved, org_id);
}

#[tokio::test]
async fn test_unqualified_request_selection_precedence() {
    // Exactly one org: use it.
    let single = identity_in(&["only"]);
    let ctx = RequestContext::new().with_identity(single.clone());
    let resolved = resolve_request_org(OrgIdExtractor::Query, &ctx, None).unwrap();
    assert_eq!(resolved, single.organizations[0].id);

    // No orgs: default.
    let ctx = RequestContext::new().with_identity(identity_in(&[]));
    assert_eq!(
        resolve_request_org(OrgIdExtractor::Query, &ctx, None).unwrap(),
        DEFAULT_ORG_ID
    );

    // Multiple orgs: ambiguous.
    let ctx = RequestContext::new().with_identity(identity_in(&["a", "b"]));
    let err = resolve_request_org(OrgIdExtractor::Query, &ctx, None).unwrap_err();
    assert!(matches!(err, DomainError::AmbiguousOrganization));
}
