//! Executors: thin adapters between consumed task references and the
//! reconciler bodies.
//!
//! An executor decorates the tracing span with a `pkg=<kind>` tag and calls
//! the single method on its reconciler. Executors never return errors;
//! reconcilers surface failure through the event system or condition rows.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info_span, Instrument, Span};

use crate::domain::context::RequestContext;
use crate::domain::models::periodic::PeriodicTaskKind;
use crate::domain::ports::reconcilers::{
    DeviceDisconnectedPoller, DisruptionBudgetReconciler, EventCleanupSweeper, RepositoryTester,
    ResourceSyncPoller, RolloutDeviceSelector,
};

#[async_trait]
pub trait PeriodicTaskExecutor: Send + Sync {
    async fn execute(&self, ctx: RequestContext);
}

/// Executor lookup table, keyed by task kind.
pub type ExecutorMap = HashMap<PeriodicTaskKind, Arc<dyn PeriodicTaskExecutor>>;

/// The six reconciler collaborators, bundled for wiring.
#[derive(Clone)]
pub struct Reconcilers {
    pub repository_tester: Arc<dyn RepositoryTester>,
    pub resource_sync: Arc<dyn ResourceSyncPoller>,
    pub device_disconnected: Arc<dyn DeviceDisconnectedPoller>,
    pub rollout_device_selection: Arc<dyn RolloutDeviceSelector>,
    pub disruption_budget: Arc<dyn DisruptionBudgetReconciler>,
    pub event_cleanup: Arc<dyn EventCleanupSweeper>,
}

/// Builds the executor table covering every task kind.
pub fn executor_map(reconcilers: Reconcilers) -> ExecutorMap {
    let mut executors: ExecutorMap = HashMap::new();
    executors.insert(
        PeriodicTaskKind::RepositoryTester,
        Arc::new(RepositoryTesterExecutor {
            tester: reconcilers.repository_tester,
        }),
    );
    executors.insert(
        PeriodicTaskKind::ResourceSync,
        Arc::new(ResourceSyncExecutor {
            poller: reconcilers.resource_sync,
        }),
    );
    executors.insert(
        PeriodicTaskKind::DeviceDisconnected,
        Arc::new(DeviceDisconnectedExecutor {
            poller: reconcilers.device_disconnected,
        }),
    );
    executors.insert(
        PeriodicTaskKind::RolloutDeviceSelection,
        Arc::new(RolloutDeviceSelectionExecutor {
            selector: reconcilers.rollout_device_selection,
        }),
    );
    executors.insert(
        PeriodicTaskKind::DisruptionBudget,
        Arc::new(DisruptionBudgetExecutor {
            reconciler: reconcilers.disruption_budget,
        }),
    );
    executors.insert(
        PeriodicTaskKind::EventCleanup,
        Arc::new(EventCleanupExecutor {
            sweeper: reconcilers.event_cleanup,
        }),
    );
    executors
}

fn task_span(kind: PeriodicTaskKind, ctx: &RequestContext) -> Span {
    info_span!(
        "periodic_task",
        pkg = kind.as_str(),
        org_id = %ctx.org_id().unwrap_or_default(),
        request_id = ctx.request_id().unwrap_or(""),
    )
}

pub struct RepositoryTesterExecutor {
    tester: Arc<dyn RepositoryTester>,
}

#[async_trait]
impl PeriodicTaskExecutor for RepositoryTesterExecutor {
    async fn execute(&self, ctx: RequestContext) {
        let span = task_span(PeriodicTaskKind::RepositoryTester, &ctx);
        self.tester.test_repositories(&ctx).instrument(span).await;
    }
}

pub struct ResourceSyncExecutor {
    poller: Arc<dyn ResourceSyncPoller>,
}

#[async_trait]
impl PeriodicTaskExecutor for ResourceSyncExecutor {
    async fn execute(&self, ctx: RequestContext) {
        let span = task_span(PeriodicTaskKind::ResourceSync, &ctx);
        self.poller.poll(&ctx).instrument(span).await;
    }
}

pub struct DeviceDisconnectedExecutor {
    poller: Arc<dyn DeviceDisconnectedPoller>,
}

#[async_trait]
impl PeriodicTaskExecutor for DeviceDisconnectedExecutor {
    async fn execute(&self, ctx: RequestContext) {
        let span = task_span(PeriodicTaskKind::DeviceDisconnected, &ctx);
        self.poller.poll(&ctx).instrument(span).await;
    }
}

pub struct RolloutDeviceSelectionExecutor {
    selector: Arc<dyn RolloutDeviceSelector>,
}

#[async_trait]
impl PeriodicTaskExecutor for RolloutDeviceSelectionExecutor {
    async fn execute(&self, ctx: RequestContext) {
        let span = task_span(PeriodicTaskKind::RolloutDeviceSelection, &ctx);
        self.selector.reconcile(&ctx).instrument(span).await;
    }
}

pub struct DisruptionBudgetExecutor {
    reconciler: Arc<dyn DisruptionBudgetReconciler>,
}

#[async_trait]
impl PeriodicTaskExecutor for DisruptionBudgetExecutor {
    async fn execute(&self, ctx: RequestContext) {
        let span = task_span(PeriodicTaskKind::DisruptionBudget, &ctx);
        self.reconciler.reconcile(&ctx).instrument(span).await;
    }
}

pub struct EventCleanupExecutor {
    sweeper: Arc<dyn EventCleanupSweeper>,
}

#[async_trait]
impl PeriodicTaskExecutor for EventCleanupExecutor {
    async fn execute(&self, ctx: RequestContext) {
        let span = task_span(PeriodicTaskKind::EventCleanup, &ctx);
        self.sweeper.cleanup_events(&ctx).instrument(span).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    struct CountingReconciler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RepositoryTester for CountingReconciler {
        async fn test_repositories(&self, _ctx: &RequestContext) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ResourceSyncPoller for CountingReconciler {
        async fn poll(&self, _ctx: &RequestContext) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl DeviceDisconnectedPoller for CountingReconciler {
        async fn poll(&self, _ctx: &RequestContext) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl RolloutDeviceSelector for CountingReconciler {
        async fn reconcile(&self, _ctx: &RequestContext) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl DisruptionBudgetReconciler for CountingReconciler {
        async fn reconcile(&self, _ctx: &RequestContext) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl EventCleanupSweeper for CountingReconciler {
        async fn cleanup_events(&self, _ctx: &RequestContext) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_reconcilers() -> (Reconcilers, Arc<CountingReconciler>) {
        let shared = Arc::new(CountingReconciler::default());
        (
            Reconcilers {
                repository_tester: shared.clone(),
                resource_sync: shared.clone(),
                device_disconnected: shared.clone(),
                rollout_device_selection: shared.clone(),
                disruption_budget: shared.clone(),
                event_cleanup: shared.clone(),
            },
            shared,
        )
    }

    #[test]
    fn test_map_covers_every_kind() {
        let (reconcilers, _) = counting_reconcilers();
        let executors = executor_map(reconcilers);
        for kind in PeriodicTaskKind::ALL {
            assert!(executors.contains_key(&kind), "missing executor for {kind}");
        }
    }

    #[tokio::test]
    async fn test_each_executor_invokes_its_reconciler() {
        let (reconcilers, counter) = counting_reconcilers();
        let executors = executor_map(reconcilers);

        for kind in PeriodicTaskKind::ALL {
            let ctx = RequestContext::for_periodic_task(kind, Uuid::new_v4());
            executors[&kind].execute(ctx).await;
        }

        assert_eq!(counter.calls.load(Ordering::SeqCst), PeriodicTaskKind::ALL.len());
    }
}
