//! gaugeport-store — access to the tenant-scoped metrics store.
//!
//! The collector talks to the store only through the [`MetricsStore`]
//! trait. [`HttpStore`] implements it against the store's REST API;
//! [`InMemoryStore`] serves canned responses for tests.
//!
//! # Queries
//!
//! | Method | Path | Used for |
//! |---|---|---|
//! | GET | `{base}/tenants` | Dynamic tenant discovery |
//! | GET | `{base}/metrics?type=gauge` | Definition discovery (per tenant) |
//! | GET | `{base}/gauges/{id}/raw?limit=1&order=DESC` | Latest sample |
//!
//! Every request carries the bearer credential and, where tenant-scoped,
//! the `Hawkular-Tenant` header.

pub mod client;
pub mod credential;
pub mod error;
pub mod memory;
pub mod model;

use std::future::Future;
use std::pin::Pin;

pub use client::HttpStore;
pub use credential::{load_token, CredentialError};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use model::{DataPoint, DefinitionRecord, DefinitionTags, Tenant};

/// Boxed future returned by [`MetricsStore`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Query interface of the metrics store.
pub trait MetricsStore: Send + Sync {
    /// List every tenant known to the store.
    fn list_tenants(&self) -> BoxFuture<'_, StoreResult<Vec<Tenant>>>;

    /// List the gauge definitions recorded under `tenant`, unfiltered.
    fn list_metric_definitions<'a>(
        &'a self,
        tenant: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<DefinitionRecord>>>;

    /// Newest-first raw points for `metric_id`, at most `limit` of them.
    /// An empty list means the series has no data.
    fn query_latest_gauge_sample<'a>(
        &'a self,
        metric_id: &'a str,
        tenant: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, StoreResult<Vec<DataPoint>>>;
}
