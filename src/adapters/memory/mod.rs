//! In-process queue and KV adapters.
//!
//! Back the standalone binary (publisher and consumer in one process) and
//! the test suite. Delivery is at-most-once and single-consumer; a handler
//! error is logged and the message dropped, which stands in for the broker's
//! redelivery policy.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{
    KvStore, MessageHandler, QueueConsumer, QueueProvider, QueuePublisher,
};

struct QueueChannel {
    sender: mpsc::UnboundedSender<Vec<u8>>,
    receiver: Option<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl QueueChannel {
    fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Some(receiver),
        }
    }
}

/// Hands out connected publisher/consumer pairs per queue name.
#[derive(Default)]
pub struct InMemoryQueueProvider {
    queues: Mutex<HashMap<String, QueueChannel>>,
}

impl InMemoryQueueProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueueProvider for InMemoryQueueProvider {
    fn new_publisher(&self, queue: &str) -> DomainResult<Arc<dyn QueuePublisher>> {
        let mut queues = self.queues.lock().unwrap();
        let channel = queues
            .entry(queue.to_string())
            .or_insert_with(QueueChannel::new);
        Ok(Arc::new(InMemoryPublisher {
            sender: channel.sender.clone(),
        }))
    }

    fn new_consumer(&self, queue: &str) -> DomainResult<Arc<dyn QueueConsumer>> {
        let mut queues = self.queues.lock().unwrap();
        let channel = queues
            .entry(queue.to_string())
            .or_insert_with(QueueChannel::new);
        let receiver = channel
            .receiver
            .take()
            .ok_or_else(|| DomainError::Queue(format!("queue {queue} already has a consumer")))?;
        Ok(Arc::new(InMemoryConsumer {
            receiver: Mutex::new(Some(receiver)),
        }))
    }
}

pub struct InMemoryPublisher {
    sender: mpsc::UnboundedSender<Vec<u8>>,
}

#[async_trait]
impl QueuePublisher for InMemoryPublisher {
    async fn publish(&self, payload: Vec<u8>) -> DomainResult<()> {
        self.sender
            .send(payload)
            .map_err(|_| DomainError::Queue("queue closed".into()))
    }
}

pub struct InMemoryConsumer {
    receiver: Mutex<Option<mpsc::UnboundedReceiver<Vec<u8>>>>,
}

#[async_trait]
impl QueueConsumer for InMemoryConsumer {
    async fn consume(
        &self,
        cancel: CancellationToken,
        handler: Arc<dyn MessageHandler>,
    ) -> DomainResult<()> {
        let mut receiver = self
            .receiver
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| DomainError::Queue("consumer already started".into()))?;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                message = receiver.recv() => match message {
                    Some(payload) => {
                        if let Err(err) = handler.handle(&payload).await {
                            warn!(%err, "message handler failed, dropping message");
                        }
                    }
                    None => return Err(DomainError::Queue("queue closed".into())),
                },
            }
        }
    }
}

/// Mutex-guarded map standing in for the shared KV store.
#[derive(Default)]
pub struct InMemoryKvStore {
    data: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> DomainResult<Option<Vec<u8>>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> DomainResult<()> {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
