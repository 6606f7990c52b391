//! In-memory [`MetricsStore`] for tests and local runs.
//!
//! Canned responses per tenant and per metric id, with switches to make
//! individual calls fail or never complete.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{StoreError, StoreResult};
use crate::model::{DataPoint, DefinitionRecord, Tenant};
use crate::{BoxFuture, MetricsStore};

#[derive(Debug, Clone)]
enum Canned<T> {
    Ok(T),
    Fail(u16),
    Stall,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tenant_order: Vec<String>,
    tenant_listing_fails: bool,
    definitions: HashMap<String, Canned<Vec<DefinitionRecord>>>,
    points: HashMap<String, Canned<Vec<DataPoint>>>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` as the definitions of `tenant`.
    pub fn with_tenant(mut self, tenant: &str, records: Vec<DefinitionRecord>) -> Self {
        self.add_tenant(tenant, Canned::Ok(records));
        self
    }

    /// Answer `tenant`'s discovery call with `status`.
    pub fn with_failing_tenant(mut self, tenant: &str, status: u16) -> Self {
        self.add_tenant(tenant, Canned::Fail(status));
        self
    }

    /// Never answer `tenant`'s discovery call.
    pub fn with_stalled_tenant(mut self, tenant: &str) -> Self {
        self.add_tenant(tenant, Canned::Stall);
        self
    }

    /// Make the tenant listing itself fail.
    pub fn with_failing_tenant_listing(mut self) -> Self {
        self.tenant_listing_fails = true;
        self
    }

    /// Serve a single point with `value` for `metric_id`.
    pub fn with_sample(mut self, metric_id: &str, value: f64) -> Self {
        let point = DataPoint {
            timestamp: 1_700_000_000_000,
            value,
        };
        self.points
            .insert(metric_id.to_string(), Canned::Ok(vec![point]));
        self
    }

    /// Answer `metric_id`'s sample query with `status`.
    pub fn with_failing_sample(mut self, metric_id: &str, status: u16) -> Self {
        self.points
            .insert(metric_id.to_string(), Canned::Fail(status));
        self
    }

    /// Never answer `metric_id`'s sample query.
    pub fn with_stalled_sample(mut self, metric_id: &str) -> Self {
        self.points.insert(metric_id.to_string(), Canned::Stall);
        self
    }

    /// Delay every answered call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Highest number of calls observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Total number of calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn add_tenant(&mut self, tenant: &str, canned: Canned<Vec<DefinitionRecord>>) {
        if !self.tenant_order.iter().any(|t| t == tenant) {
            self.tenant_order.push(tenant.to_string());
        }
        self.definitions.insert(tenant.to_string(), canned);
    }

    async fn answer<T: Clone + Default>(&self, canned: Option<&Canned<T>>, url: String) -> StoreResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match canned {
            None => Ok(T::default()),
            Some(Canned::Ok(value)) => Ok(value.clone()),
            Some(Canned::Fail(status)) => Err(StoreError::Status {
                status: *status,
                url,
            }),
            Some(Canned::Stall) => std::future::pending().await,
        }
    }
}

/// Decrements the in-flight counter when a call finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MetricsStore for InMemoryStore {
    fn list_tenants(&self) -> BoxFuture<'_, StoreResult<Vec<Tenant>>> {
        Box::pin(async move {
            let tenants: Vec<Tenant> = self
                .tenant_order
                .iter()
                .map(|id| Tenant { id: id.clone() })
                .collect();
            let canned = if self.tenant_listing_fails {
                Canned::Fail(503)
            } else {
                Canned::Ok(tenants)
            };
            self.answer(Some(&canned), "memory://tenants".to_string())
                .await
        })
    }

    fn list_metric_definitions<'a>(
        &'a self,
        tenant: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<DefinitionRecord>>> {
        Box::pin(async move {
            self.answer(self.definitions.get(tenant), format!("memory://{tenant}/metrics"))
                .await
        })
    }

    fn query_latest_gauge_sample<'a>(
        &'a self,
        metric_id: &'a str,
        tenant: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, StoreResult<Vec<DataPoint>>> {
        Box::pin(async move {
            let mut points = self
                .answer(self.points.get(metric_id), format!("memory://{tenant}/gauges/{metric_id}"))
                .await?;
            points.truncate(limit);
            Ok(points)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DefinitionTags;

    fn record(id: &str) -> DefinitionRecord {
        DefinitionRecord {
            id: id.to_string(),
            tags: DefinitionTags::default(),
        }
    }

    #[tokio::test]
    async fn serves_canned_definitions() {
        let store = InMemoryStore::new()
            .with_tenant("t1", vec![record("a"), record("b")])
            .with_failing_tenant("t2", 500);

        assert_eq!(store.list_metric_definitions("t1").await.unwrap().len(), 2);
        assert!(matches!(
            store.list_metric_definitions("t2").await,
            Err(StoreError::Status { status: 500, .. })
        ));
        assert!(store.list_metric_definitions("t3").await.unwrap().is_empty());
        assert_eq!(store.calls(), 3);
    }

    #[tokio::test]
    async fn lists_tenants_in_insertion_order() {
        let store = InMemoryStore::new()
            .with_tenant("b", vec![])
            .with_failing_tenant("a", 500);
        let ids: Vec<_> = store.list_tenants().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["b", "a"]);

        let failing = InMemoryStore::new().with_failing_tenant_listing();
        assert!(failing.list_tenants().await.is_err());
    }

    #[tokio::test]
    async fn unknown_metric_has_no_data() {
        let store = InMemoryStore::new().with_sample("a", 1.0);
        assert_eq!(store.query_latest_gauge_sample("a", "ns", 1).await.unwrap().len(), 1);
        assert!(store.query_latest_gauge_sample("b", "ns", 1).await.unwrap().is_empty());
    }
}
