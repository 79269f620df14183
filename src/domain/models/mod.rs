//! Domain models.

pub mod certificate;
pub mod config;
pub mod organization;
pub mod periodic;

pub use certificate::{CertificateExtension, PeerCertificate, ORG_ID_EXTENSION_OID};
pub use config::Config;
pub use organization::{
    ExternalOrganization, Identity, Organization, OrganizationSummary, DEFAULT_ORG_ID,
};
pub use periodic::{
    default_task_metadata, last_run_key, PeriodicTaskKind, PeriodicTaskLastRun,
    PeriodicTaskMetadata, PeriodicTaskReference,
};
