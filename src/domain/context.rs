//! Per-request / per-task context.
//!
//! The context is the only carrier of org id, identity, request id, and
//! event actor through the pipeline. Request middleware populates it for API
//! calls; the Consumer populates it before dispatching a periodic task.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::models::certificate::PeerCertificate;
use crate::domain::models::organization::Identity;
use crate::domain::models::periodic::PeriodicTaskKind;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    org_id: Option<Uuid>,
    identity: Option<Arc<Identity>>,
    request_id: Option<String>,
    event_actor: Option<String>,
    peer_certificate: Option<Arc<PeerCertificate>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for one periodic task execution: org id, a fresh request id,
    /// and a `task:<kind>` actor.
    pub fn for_periodic_task(kind: PeriodicTaskKind, org_id: Uuid) -> Self {
        Self::new()
            .with_org_id(org_id)
            .with_request_id(Uuid::new_v4().to_string())
            .with_event_actor(format!("task:{kind}"))
    }

    pub fn with_org_id(mut self, org_id: Uuid) -> Self {
        self.org_id = Some(org_id);
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.event_actor
            .get_or_insert_with(|| format!("user:{}", identity.username));
        self.identity = Some(Arc::new(identity));
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_event_actor(mut self, actor: impl Into<String>) -> Self {
        self.event_actor = Some(actor.into());
        self
    }

    pub fn with_peer_certificate(mut self, certificate: PeerCertificate) -> Self {
        self.peer_certificate = Some(Arc::new(certificate));
        self
    }

    pub fn org_id(&self) -> Option<Uuid> {
        self.org_id
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_deref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn event_actor(&self) -> Option<&str> {
        self.event_actor.as_deref()
    }

    pub fn peer_certificate(&self) -> Option<&PeerCertificate> {
        self.peer_certificate.as_deref()
    }
}
