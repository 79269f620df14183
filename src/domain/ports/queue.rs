//! Ports for the message queue carrying periodic task references.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::DomainResult;

/// Name of the queue the orchestrator publishes to and consumes from.
pub const PERIODIC_TASK_QUEUE: &str = "periodic-task";

#[async_trait]
pub trait QueuePublisher: Send + Sync {
    async fn publish(&self, payload: Vec<u8>) -> DomainResult<()>;
}

/// Per-message callback installed by the Consumer. Returning an error hands
/// the message back to the queue layer, whose redelivery or dead-letter
/// policy applies.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, payload: &[u8]) -> DomainResult<()>;
}

#[async_trait]
pub trait QueueConsumer: Send + Sync {
    /// Delivers messages to `handler` until `cancel` fires or the queue
    /// fails. The queue layer chooses the handler parallelism.
    async fn consume(
        &self,
        cancel: CancellationToken,
        handler: Arc<dyn MessageHandler>,
    ) -> DomainResult<()>;
}

/// Factory for queue endpoints, one pair per named queue.
pub trait QueueProvider: Send + Sync {
    fn new_publisher(&self, queue: &str) -> DomainResult<Arc<dyn QueuePublisher>>;
    fn new_consumer(&self, queue: &str) -> DomainResult<Arc<dyn QueueConsumer>>;
}
