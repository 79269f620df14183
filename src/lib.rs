//! Flightdeck - multi-tenant control-plane core
//!
//! The periodic task orchestrator behind a fleet-management control plane:
//! - Publisher/Consumer pair fanning reconciliation kinds out across tenants
//! - KV-coordinated last-run scheduling tolerant of replicated publishers
//! - Organization resolution with positive-only TTL caching
//! - Membership-based per-request authorization

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;
