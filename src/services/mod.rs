//! Services: the orchestrator pair, organization resolution, and the
//! request-gating pipeline.

pub mod authz;
pub mod consumer;
pub mod executors;
pub mod org_resolver;
pub mod org_selection;
pub mod organization_service;
pub mod publisher;

pub use authz::OrgMembershipAuthz;
pub use consumer::PeriodicTaskConsumer;
pub use executors::{executor_map, ExecutorMap, PeriodicTaskExecutor, Reconcilers};
pub use org_resolver::OrgResolver;
pub use org_selection::{resolve_request_org, select_org_id, OrgIdExtractor, ORG_ID_QUERY_KEY};
pub use organization_service::OrganizationDirectory;
pub use publisher::PeriodicTaskPublisher;
