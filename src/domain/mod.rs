//! Domain layer: models, ports, errors, and the request context.

pub mod context;
pub mod errors;
pub mod models;
pub mod ports;

pub use context::RequestContext;
pub use errors::{DomainError, DomainResult};
