//! Periodic task kinds, wire references, and KV last-run records.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// KV key prefix for last-run records. Full key shape:
/// `periodic_task:last_run:<kind>:<org-uuid>`.
pub const LAST_RUN_KEY_PREFIX: &str = "periodic_task:last_run:";

/// The fixed set of server-side reconciliation loops driven by the
/// orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodicTaskKind {
    RepositoryTester,
    ResourceSync,
    DeviceDisconnected,
    RolloutDeviceSelection,
    DisruptionBudget,
    EventCleanup,
}

impl PeriodicTaskKind {
    pub const ALL: [Self; 6] = [
        Self::RepositoryTester,
        Self::ResourceSync,
        Self::DeviceDisconnected,
        Self::RolloutDeviceSelection,
        Self::DisruptionBudget,
        Self::EventCleanup,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RepositoryTester => "repository-tester",
            Self::ResourceSync => "resource-sync",
            Self::DeviceDisconnected => "device-disconnected",
            Self::RolloutDeviceSelection => "rollout-device-selection",
            Self::DisruptionBudget => "disruption-budget",
            Self::EventCleanup => "event-cleanup",
        }
    }
}

impl fmt::Display for PeriodicTaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodicTaskKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repository-tester" => Ok(Self::RepositoryTester),
            "resource-sync" => Ok(Self::ResourceSync),
            "device-disconnected" => Ok(Self::DeviceDisconnected),
            "rollout-device-selection" => Ok(Self::RolloutDeviceSelection),
            "disruption-budget" => Ok(Self::DisruptionBudget),
            "event-cleanup" => Ok(Self::EventCleanup),
            _ => Err(()),
        }
    }
}

/// Static description of one task kind: the kind discriminator and the
/// minimum interval between publishes per organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTaskMetadata {
    pub kind: PeriodicTaskKind,
    pub interval: Duration,
}

/// The built-in task table. Intervals are minimums; a horizontally scaled
/// publisher fleet may overlap by the staleness of the shared last-run value.
pub fn default_task_metadata() -> Vec<PeriodicTaskMetadata> {
    vec![
        PeriodicTaskMetadata {
            kind: PeriodicTaskKind::RepositoryTester,
            interval: Duration::from_secs(2 * 60),
        },
        PeriodicTaskMetadata {
            kind: PeriodicTaskKind::ResourceSync,
            interval: Duration::from_secs(2 * 60),
        },
        PeriodicTaskMetadata {
            kind: PeriodicTaskKind::DeviceDisconnected,
            interval: Duration::from_secs(2 * 60),
        },
        PeriodicTaskMetadata {
            kind: PeriodicTaskKind::RolloutDeviceSelection,
            interval: Duration::from_secs(2 * 60),
        },
        PeriodicTaskMetadata {
            kind: PeriodicTaskKind::DisruptionBudget,
            interval: Duration::from_secs(2 * 60),
        },
        PeriodicTaskMetadata {
            kind: PeriodicTaskKind::EventCleanup,
            interval: Duration::from_secs(10 * 60),
        },
    ]
}

/// On-wire queue message: which reconciliation to run, for which tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicTaskReference {
    pub kind: PeriodicTaskKind,
    pub org_id: Uuid,
}

/// KV value recording the most recent successful publish of a (kind, org)
/// pair. Serialized as `{"last_run": <RFC3339>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicTaskLastRun {
    pub last_run: DateTime<Utc>,
}

/// KV key for a (kind, org) pair's last-run record.
pub fn last_run_key(kind: PeriodicTaskKind, org_id: Uuid) -> String {
    format!("{LAST_RUN_KEY_PREFIX}{kind}:{org_id}")
}
