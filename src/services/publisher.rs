//! Periodic task publisher.
//!
//! One control thread per instance: a task tick sweeps every (org, kind)
//! pair and publishes a reference onto the queue when the kind's interval
//! has elapsed since the KV last-run; an org-refresh tick reconciles the
//! in-memory org set against the organization service. Last-run state in
//! the KV is a soft lease only; replicated publishers may overlap, and the
//! downstream executors are idempotent.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::periodic::{
    last_run_key, PeriodicTaskKind, PeriodicTaskLastRun, PeriodicTaskMetadata,
    PeriodicTaskReference,
};
use crate::domain::ports::{
    KvStore, OrganizationService, QueueProvider, QueuePublisher, PERIODIC_TASK_QUEUE,
};

const DEFAULT_TASK_TICK: Duration = Duration::from_secs(5);
const DEFAULT_ORG_REFRESH_TICK: Duration = Duration::from_secs(5 * 60);

pub struct PeriodicTaskPublisher {
    publisher: Arc<dyn QueuePublisher>,
    kv_store: Arc<dyn KvStore>,
    org_service: Arc<dyn OrganizationService>,
    tasks_metadata: Vec<PeriodicTaskMetadata>,
    organizations: HashSet<Uuid>,
    task_tick: Duration,
    org_refresh_tick: Duration,
}

impl PeriodicTaskPublisher {
    /// Failing to create the queue publisher is fatal to the caller; every
    /// other failure mode is retried on a later tick.
    pub fn new(
        kv_store: Arc<dyn KvStore>,
        org_service: Arc<dyn OrganizationService>,
        queue_provider: &dyn QueueProvider,
        tasks_metadata: Vec<PeriodicTaskMetadata>,
    ) -> DomainResult<Self> {
        let publisher = queue_provider.new_publisher(PERIODIC_TASK_QUEUE)?;
        Ok(Self {
            publisher,
            kv_store,
            org_service,
            tasks_metadata,
            organizations: HashSet::new(),
            task_tick: DEFAULT_TASK_TICK,
            org_refresh_tick: DEFAULT_ORG_REFRESH_TICK,
        })
    }

    pub fn with_intervals(mut self, task_tick: Duration, org_refresh_tick: Duration) -> Self {
        self.task_tick = task_tick;
        self.org_refresh_tick = org_refresh_tick;
        self
    }

    /// Runs the control loop until `cancel` fires. Performs one immediate
    /// org sync, then waits on the two tickers.
    pub async fn run(mut self, cancel: CancellationToken) {
        self.sync_organizations().await;

        let mut task_tick = interval_at(Instant::now() + self.task_tick, self.task_tick);
        task_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut org_tick = interval_at(
            Instant::now() + self.org_refresh_tick,
            self.org_refresh_tick,
        );
        org_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = task_tick.tick() => self.publish_tasks(&cancel).await,
                _ = org_tick.tick() => self.sync_organizations().await,
                _ = cancel.cancelled() => {
                    self.organizations.clear();
                    return;
                }
            }
        }
    }

    /// One sweep over every (org, kind) pair.
    async fn publish_tasks(&self, cancel: &CancellationToken) {
        let now = Utc::now();

        for &org_id in &self.organizations {
            for metadata in &self.tasks_metadata {
                if cancel.is_cancelled() {
                    return;
                }

                let key = last_run_key(metadata.kind, org_id);
                let last_run = match self.kv_store.get(&key).await {
                    // Presumed transient; retrying next tick is cheaper than
                    // publishing blindly.
                    Err(err) => {
                        warn!(%err, %key, "failed to read last run, skipping task this tick");
                        continue;
                    }
                    // First run for this pair.
                    Ok(None) => DateTime::<Utc>::UNIX_EPOCH,
                    Ok(Some(bytes)) => match serde_json::from_slice::<PeriodicTaskLastRun>(&bytes)
                    {
                        Ok(record) => record.last_run,
                        Err(err) => {
                            warn!(%err, %key, "malformed last-run value, treating as first run");
                            DateTime::<Utc>::UNIX_EPOCH
                        }
                    },
                };

                let interval = chrono::Duration::from_std(metadata.interval)
                    .unwrap_or(chrono::TimeDelta::MAX);
                if now.signed_duration_since(last_run) >= interval
                    && self.publish_task(metadata.kind, org_id).await
                {
                    self.record_last_run(&key, now).await;
                }
            }
        }
    }

    /// Publishes one reference. Best-effort: a failure is logged and leaves
    /// the last-run untouched so the next tick retries.
    async fn publish_task(&self, kind: PeriodicTaskKind, org_id: Uuid) -> bool {
        let reference = PeriodicTaskReference { kind, org_id };
        let payload = match serde_json::to_vec(&reference) {
            Ok(payload) => payload,
            Err(err) => {
                error!(%err, %kind, %org_id, "failed to marshal task reference");
                return false;
            }
        };

        match self.publisher.publish(payload).await {
            Ok(()) => {
                debug!(%kind, %org_id, "published periodic task");
                true
            }
            Err(err) => {
                error!(%err, %kind, %org_id, "failed to publish periodic task");
                false
            }
        }
    }

    async fn record_last_run(&self, key: &str, now: DateTime<Utc>) {
        let record = PeriodicTaskLastRun { last_run: now };
        let value = match serde_json::to_vec(&record) {
            Ok(value) => value,
            Err(err) => {
                error!(%err, key, "failed to marshal last-run record");
                return;
            }
        };
        // A failed write means the next tick republishes; duplicate delivery
        // is acceptable downstream.
        if let Err(err) = self.kv_store.set(key, &value).await {
            warn!(%err, key, "failed to record last run");
        }
    }

    /// Replaces the org set with the service's current view. A listing
    /// failure leaves the prior set intact.
    async fn sync_organizations(&mut self) {
        let listed = match self.org_service.list_organizations().await {
            Ok(orgs) => orgs,
            Err(err) => {
                error!(%err, "failed to list organizations");
                return;
            }
        };

        let mut next = HashSet::with_capacity(listed.len());
        for summary in &listed {
            let Ok(org_id) = Uuid::parse_str(&summary.name) else {
                error!(name = %summary.name, "failed to parse organization ID");
                continue;
            };

            if !self.organizations.contains(&org_id) {
                info!(%org_id, "registering organization");
            }
            next.insert(org_id);
        }

        for org_id in self.organizations.difference(&next) {
            info!(%org_id, "organization no longer registered, removing from tracking");
        }

        self.organizations = next;
    }
}
