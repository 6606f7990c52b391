//! Per-task error types for the collection pipeline.
//!
//! None of these escape `Collector::collect`; they are logged and turned
//! into the degraded flag.

use gaugeport_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("discovery failed for tenant {tenant}: {source}")]
    Discovery {
        tenant: String,
        #[source]
        source: StoreError,
    },

    #[error("sample fetch failed for metric {metric_id}: {source}")]
    Sample {
        metric_id: String,
        #[source]
        source: SampleError,
    },
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no data points recorded")]
    NoData,
}
