//! Store round-trips for one tenant or one definition.

use tracing::debug;

use gaugeport_core::{MetricDefinition, Sample};
use gaugeport_store::MetricsStore;

use crate::error::{CollectError, SampleError};

/// Discover the collectible definitions of one tenant.
///
/// Keeps only pod-scoped definitions whose descriptor name is in
/// `allow_list`.
pub async fn fetch_definitions(
    store: &dyn MetricsStore,
    allow_list: &[String],
    tenant: &str,
) -> Result<Vec<MetricDefinition>, CollectError> {
    let records = store
        .list_metric_definitions(tenant)
        .await
        .map_err(|source| CollectError::Discovery {
            tenant: tenant.to_string(),
            source,
        })?;

    let total = records.len();
    let definitions: Vec<MetricDefinition> = records
        .into_iter()
        .map(|record| record.into_definition(tenant))
        .filter(|definition| definition.is_collectible(allow_list))
        .collect();

    debug!(
        %tenant,
        total,
        collectible = definitions.len(),
        "discovered metric definitions"
    );
    Ok(definitions)
}

/// Fetch the newest gauge point of `definition`.
///
/// The query is scoped to the definition's namespace. An empty answer is a
/// failure, never a synthetic zero.
pub async fn fetch_latest_sample(
    store: &dyn MetricsStore,
    definition: &MetricDefinition,
) -> Result<Sample, CollectError> {
    let tag = |source: SampleError| CollectError::Sample {
        metric_id: definition.id.clone(),
        source,
    };

    let points = store
        .query_latest_gauge_sample(&definition.id, &definition.namespace_name, 1)
        .await
        .map_err(|e| tag(e.into()))?;

    let point = points.first().ok_or_else(|| tag(SampleError::NoData))?;
    Ok(Sample {
        value: point.value,
        timestamp: point.timestamp,
    })
}
