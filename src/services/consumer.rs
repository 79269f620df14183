//! Periodic task consumer.
//!
//! Pulls task references off the queue and dispatches each to the executor
//! registered for its kind. The queue layer chooses the handler parallelism;
//! the consumer holds no per-message state.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::context::RequestContext;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::periodic::PeriodicTaskKind;
use crate::domain::ports::{MessageHandler, QueueProvider, PERIODIC_TASK_QUEUE};
use crate::services::executors::ExecutorMap;

/// Wire form of a task reference. The kind stays a string here so an
/// unrecognized kind is distinguishable from a malformed payload: the former
/// is logged and acked, the latter goes back to the queue layer.
#[derive(Debug, Deserialize)]
struct WireTaskReference {
    kind: String,
    org_id: Uuid,
}

pub struct TaskReferenceHandler {
    executors: ExecutorMap,
}

#[async_trait]
impl MessageHandler for TaskReferenceHandler {
    async fn handle(&self, payload: &[u8]) -> DomainResult<()> {
        let reference: WireTaskReference = serde_json::from_slice(payload).map_err(|err| {
            warn!(%err, "failed to unmarshal consume payload");
            DomainError::Serialization(err.to_string())
        })?;

        let Ok(kind) = reference.kind.parse::<PeriodicTaskKind>() else {
            // Redelivering can't make an unknown kind known.
            warn!(kind = %reference.kind, org_id = %reference.org_id, "unknown periodic task kind");
            return Ok(());
        };

        let Some(executor) = self.executors.get(&kind) else {
            warn!(%kind, org_id = %reference.org_id, "no executor registered for task kind");
            return Ok(());
        };

        info!(%kind, org_id = %reference.org_id, "received periodic task");

        let ctx = RequestContext::for_periodic_task(kind, reference.org_id);
        executor.execute(ctx).await;
        Ok(())
    }
}

pub struct PeriodicTaskConsumer {
    queue_provider: Arc<dyn QueueProvider>,
    executors: ExecutorMap,
}

impl PeriodicTaskConsumer {
    pub fn new(queue_provider: Arc<dyn QueueProvider>, executors: ExecutorMap) -> Self {
        Self {
            queue_provider,
            executors,
        }
    }

    /// Installs the handler and blocks until `cancel` fires or the queue
    /// errors out.
    pub async fn start(self, cancel: CancellationToken) -> DomainResult<()> {
        let consumer = self.queue_provider.new_consumer(PERIODIC_TASK_QUEUE)?;
        let handler = Arc::new(TaskReferenceHandler {
            executors: self.executors,
        });
        consumer.consume(cancel, handler).await
    }
}
