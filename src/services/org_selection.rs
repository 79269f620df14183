//! Organization extraction and selection for incoming requests.
//!
//! A request names its organization either through the `org_id` query
//! parameter or through the client certificate's org-id extension; the
//! transport configures which extractor applies. When neither names one,
//! selection falls back to the caller's mapped organizations.

use uuid::Uuid;

use crate::domain::context::RequestContext;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::organization::{Identity, DEFAULT_ORG_ID};

/// Query parameter carrying the organization id.
pub const ORG_ID_QUERY_KEY: &str = "org_id";

/// Which request surface the org id is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgIdExtractor {
    /// The `org_id` query parameter (user-facing API).
    Query,
    /// The client certificate's org-id extension (agent-facing API).
    ClientCertificate,
}

impl OrgIdExtractor {
    /// Extracts an explicitly named org id from the request, if present.
    ///
    /// `query_param` is the raw `org_id` value when the request carried one.
    /// An unparseable value is an error rather than an absence; falling back
    /// silently would route the request to the wrong tenant.
    pub fn extract(
        &self,
        ctx: &RequestContext,
        query_param: Option<&str>,
    ) -> DomainResult<Option<Uuid>> {
        match self {
            Self::Query => match query_param {
                None | Some("") => Ok(None),
                Some(raw) => Uuid::parse_str(raw)
                    .map(Some)
                    .map_err(|_| DomainError::InvalidUuid(raw.to_string())),
            },
            Self::ClientCertificate => match ctx.peer_certificate() {
                None => Ok(None),
                Some(cert) => cert.org_id(),
            },
        }
    }
}

/// Applies the selection precedence: an explicitly named org wins; otherwise
/// a caller with exactly one org uses it, a caller with none falls back to
/// the default org, and anything else is ambiguous.
pub fn select_org_id(explicit: Option<Uuid>, identity: &Identity) -> DomainResult<Uuid> {
    if let Some(org_id) = explicit {
        return Ok(org_id);
    }

    match identity.organizations.as_slice() {
        [only] => Ok(only.id),
        [] => Ok(DEFAULT_ORG_ID),
        _ => Err(DomainError::AmbiguousOrganization),
    }
}

/// Full resolution for one request: extract, then select.
pub fn resolve_request_org(
    extractor: OrgIdExtractor,
    ctx: &RequestContext,
    query_param: Option<&str>,
) -> DomainResult<Uuid> {
    let explicit = extractor.extract(ctx, query_param)?;
    if explicit.is_some() {
        return select_org_id(explicit, &Identity::default());
    }

    let identity = ctx.identity().ok_or(DomainError::MissingIdentity)?;
    select_org_id(None, identity)
}
