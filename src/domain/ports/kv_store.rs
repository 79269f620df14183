//! Port for the shared key-value store.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Cross-instance shared mutable state. The orchestrator uses it only for
/// last-run timestamps; correctness relies on idempotent executors, not on
/// KV atomicity.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the value for `key`, or `None` when the key does not exist.
    async fn get(&self, key: &str) -> DomainResult<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: &[u8]) -> DomainResult<()>;
}
