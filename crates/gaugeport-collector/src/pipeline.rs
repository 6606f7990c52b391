//! Collection pipeline — fans discovery and sample fetches out over a
//! bounded pool and folds the results into one `ScrapeResult`.
//!
//! Each task owns its result until the orchestrator joins it; the
//! orchestrator is the only writer of the line list and the degraded flag.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use gaugeport_core::{format_line, parse_labels, Config, MetricDefinition, ScrapeResult};
use gaugeport_store::MetricsStore;

use crate::error::CollectError;
use crate::fetch::{fetch_definitions, fetch_latest_sample};

/// Runs one collection per scrape. Holds no state between scrapes.
#[derive(Clone)]
pub struct Collector {
    store: Arc<dyn MetricsStore>,
    config: Arc<Config>,
}

impl Collector {
    pub fn new(store: Arc<dyn MetricsStore>, config: Arc<Config>) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve tenants, then collect. This is what one scrape request runs.
    ///
    /// One deadline covers the tenant listing and both stages.
    pub async fn scrape(&self) -> ScrapeResult {
        let deadline = Instant::now() + self.config.scrape_timeout();
        let (tenants, listing_failed) = self.resolve_tenants_until(deadline).await;
        let mut result = self.collect_until(&tenants, deadline).await;
        if listing_failed {
            result = ScrapeResult::new(result.lines, true);
        }
        result
    }

    /// The configured tenant list, or the store's listing when discovery is
    /// enabled. Returns `true` alongside when the listing failed.
    pub async fn resolve_tenants(&self) -> (Vec<String>, bool) {
        let deadline = Instant::now() + self.config.scrape_timeout();
        self.resolve_tenants_until(deadline).await
    }

    async fn resolve_tenants_until(&self, deadline: Instant) -> (Vec<String>, bool) {
        if !self.config.discover_tenants {
            return (self.config.tenants.clone(), false);
        }

        match tokio::time::timeout_at(deadline, self.store.list_tenants()).await {
            Ok(Ok(tenants)) => {
                debug!(count = tenants.len(), "resolved tenants from store");
                (tenants.into_iter().map(|t| t.id).collect(), false)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "tenant listing failed");
                (Vec::new(), true)
            }
            Err(_) => {
                warn!("tenant listing timed out");
                (Vec::new(), true)
            }
        }
    }

    /// Collect the latest sample of every eligible definition across
    /// `tenants`. Never fails: per-tenant and per-definition errors degrade
    /// the result instead.
    pub async fn collect(&self, tenants: &[String]) -> ScrapeResult {
        let deadline = Instant::now() + self.config.scrape_timeout();
        self.collect_until(tenants, deadline).await
    }

    /// `collect` against a deadline fixed by the caller.
    pub async fn collect_until(&self, tenants: &[String], deadline: Instant) -> ScrapeResult {
        let started = Instant::now();
        let permits = Arc::new(Semaphore::new(self.config.store.concurrency.max(1)));

        // ── Stage A: discovery ─────────────────────────────────────

        let mut discovery = JoinSet::new();
        for tenant in tenants {
            let store = Arc::clone(&self.store);
            let config = Arc::clone(&self.config);
            let permits = Arc::clone(&permits);
            let tenant = tenant.clone();
            discovery.spawn(async move {
                let _permit = permits.acquire().await;
                fetch_definitions(store.as_ref(), &config.collect_metrics, &tenant).await
            });
        }
        let (batches, discovery_degraded) = join_stage(&mut discovery, deadline, "discovery").await;
        let definitions: Vec<MetricDefinition> = batches.into_iter().flatten().collect();

        debug!(
            definitions = ?definitions.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            "fetching samples for metric definitions"
        );

        // ── Stage B: sample fetch + format ─────────────────────────

        let mut samples = JoinSet::new();
        for definition in definitions {
            let store = Arc::clone(&self.store);
            let config = Arc::clone(&self.config);
            let permits = Arc::clone(&permits);
            samples.spawn(async move {
                let _permit = permits.acquire().await;
                let sample = fetch_latest_sample(store.as_ref(), &definition).await?;
                let labels = parse_labels(definition.raw_labels.as_deref());
                Ok::<_, CollectError>(format_line(&config, &definition, labels, sample))
            });
        }
        let (lines, sample_degraded) = join_stage(&mut samples, deadline, "sample").await;

        let result = ScrapeResult::new(lines, discovery_degraded || sample_degraded);
        info!(
            tenants = tenants.len(),
            lines = result.lines.len(),
            status = ?result.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scrape collected"
        );
        result
    }
}

/// Drain a stage's tasks, collecting successes. Returns `true` alongside
/// when any task failed, panicked, or was cut off by the deadline.
async fn join_stage<T: 'static>(
    tasks: &mut JoinSet<Result<T, CollectError>>,
    deadline: Instant,
    stage: &'static str,
) -> (Vec<T>, bool) {
    let mut collected = Vec::with_capacity(tasks.len());
    let mut degraded = false;

    loop {
        match tokio::time::timeout_at(deadline, tasks.join_next()).await {
            Ok(None) => break,
            Ok(Some(Ok(Ok(value)))) => collected.push(value),
            Ok(Some(Ok(Err(e)))) => {
                warn!(stage, error = %e, "collection task failed");
                degraded = true;
            }
            Ok(Some(Err(e))) => {
                warn!(stage, error = %e, "collection task aborted");
                degraded = true;
            }
            Err(_) => {
                warn!(
                    stage,
                    outstanding = tasks.len(),
                    "scrape deadline elapsed, aborting outstanding tasks"
                );
                tasks.abort_all();
                degraded = true;
                break;
            }
        }
    }

    (collected, degraded)
}
