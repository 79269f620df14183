//! Domain errors for the flightdeck control plane.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors shared across the orchestrator and authorization paths.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Organization not found: {0}")]
    OrganizationNotFound(Uuid),

    #[error("No organization ID in request context")]
    MissingOrganizationId,

    #[error("Ambiguous organization: caller belongs to multiple organizations")]
    AmbiguousOrganization,

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("No identity in request context")]
    MissingIdentity,

    #[error("Access denied to organization: {0}")]
    AuthorizationDenied(Uuid),

    #[error("Invalid certificate extension: {0}")]
    InvalidCertificate(String),

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("KV store error: {0}")]
    KvStore(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// HTTP status code a transport would map this error to.
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::OrganizationNotFound(_) => 404,
            Self::AmbiguousOrganization
            | Self::InvalidUuid(_)
            | Self::InvalidCertificate(_) => 400,
            Self::AuthorizationDenied(_) => 403,
            Self::MissingOrganizationId | Self::MissingIdentity => 500,
            Self::Queue(_) | Self::KvStore(_) => 503,
            Self::Database(_) | Self::Serialization(_) => 500,
        }
    }

    /// Returns true if retrying on the next tick or message may succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Queue(_) | Self::KvStore(_) | Self::Database(_))
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
