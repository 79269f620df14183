//! Ports (interface abstractions) for external collaborators.

pub mod external_org_provider;
pub mod kv_store;
pub mod organization_repository;
pub mod organization_service;
pub mod queue;
pub mod reconcilers;

pub use external_org_provider::ExternalOrgProvider;
pub use kv_store::KvStore;
pub use organization_repository::OrganizationRepository;
pub use organization_service::OrganizationService;
pub use queue::{
    MessageHandler, QueueConsumer, QueueProvider, QueuePublisher, PERIODIC_TASK_QUEUE,
};
pub use reconcilers::{
    DeviceDisconnectedPoller, DisruptionBudgetReconciler, EventCleanupSweeper,
    RepositoryTester, ResourceSyncPoller, RolloutDeviceSelector,
};
