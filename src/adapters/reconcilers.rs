//! Log-only reconciler placeholders.
//!
//! Standalone mode wires these behind the executors until the real
//! reconciler services are deployed alongside; each invocation logs the
//! tenant it would have reconciled.

use async_trait::async_trait;
use tracing::info;

use crate::domain::context::RequestContext;
use crate::domain::ports::reconcilers::{
    DeviceDisconnectedPoller, DisruptionBudgetReconciler, EventCleanupSweeper, RepositoryTester,
    ResourceSyncPoller, RolloutDeviceSelector,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingReconciler;

fn log_invocation(what: &str, ctx: &RequestContext) {
    info!(org_id = %ctx.org_id().unwrap_or_default(), "{what} invoked");
}

#[async_trait]
impl RepositoryTester for LoggingReconciler {
    async fn test_repositories(&self, ctx: &RequestContext) {
        log_invocation("repository test", ctx);
    }
}

#[async_trait]
impl ResourceSyncPoller for LoggingReconciler {
    async fn poll(&self, ctx: &RequestContext) {
        log_invocation("resource-sync poll", ctx);
    }
}

#[async_trait]
impl DeviceDisconnectedPoller for LoggingReconciler {
    async fn poll(&self, ctx: &RequestContext) {
        log_invocation("device-disconnected poll", ctx);
    }
}

#[async_trait]
impl RolloutDeviceSelector for LoggingReconciler {
    async fn reconcile(&self, ctx: &RequestContext) {
        log_invocation("rollout device selection", ctx);
    }
}

#[async_trait]
impl DisruptionBudgetReconciler for LoggingReconciler {
    async fn reconcile(&self, ctx: &RequestContext) {
        log_invocation("disruption-budget reconciliation", ctx);
    }
}

#[async_trait]
impl EventCleanupSweeper for LoggingReconciler {
    async fn cleanup_events(&self, ctx: &RequestContext) {
        log_invocation("event cleanup", ctx);
    }
}

/// Reconciler bundle for standalone mode.
pub fn logging_reconcilers() -> crate::services::executors::Reconcilers {
    use std::sync::Arc;

    let shared = Arc::new(LoggingReconciler);
    crate::services::executors::Reconcilers {
        repository_tester: shared.clone(),
        resource_sync: shared.clone(),
        device_disconnected: shared.clone(),
        rollout_device_selection: shared.clone(),
        disruption_budget: shared.clone(),
        event_cleanup: shared,
    }
}
