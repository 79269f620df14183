//! Ports for the reconciler bodies behind each periodic task kind.
//!
//! The reconcilers are external collaborators: long-running control-loop
//! bodies that read desired state and emit conditions or events. They
//! surface their own failures through those channels and are safe to invoke
//! twice for the same (kind, org) pair.

use async_trait::async_trait;

use crate::domain::context::RequestContext;

/// Probes the health of every repository registered in the org.
#[async_trait]
pub trait RepositoryTester: Send + Sync {
    async fn test_repositories(&self, ctx: &RequestContext);
}

/// Polls resource-sync definitions against their git sources.
#[async_trait]
pub trait ResourceSyncPoller: Send + Sync {
    async fn poll(&self, ctx: &RequestContext);
}

/// Marks devices disconnected when their heartbeat lapses.
#[async_trait]
pub trait DeviceDisconnectedPoller: Send + Sync {
    async fn poll(&self, ctx: &RequestContext);
}

/// Selects the next batch of devices for an active rollout.
#[async_trait]
pub trait RolloutDeviceSelector: Send + Sync {
    async fn reconcile(&self, ctx: &RequestContext);
}

/// Enforces per-fleet disruption budgets during rollouts.
#[async_trait]
pub trait DisruptionBudgetReconciler: Send + Sync {
    async fn reconcile(&self, ctx: &RequestContext);
}

/// Deletes events past the retention window.
#[async_trait]
pub trait EventCleanupSweeper: Send + Sync {
    async fn cleanup_events(&self, ctx: &RequestContext);
}
