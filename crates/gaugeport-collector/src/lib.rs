//! gaugeport-collector — the per-scrape collection pipeline.
//!
//! # Architecture
//!
//! ```text
//! Collector::scrape()
//!   ├── resolve_tenants()          static list or store listing
//!   └── collect(tenants)
//!       ├── Stage A: fetch_definitions() per tenant     (bounded, unordered)
//!       │            ── barrier ──
//!       └── Stage B: fetch_latest_sample() → parse_labels() → format_line()
//!                    per definition                     (bounded, unordered)
//! ```
//!
//! Both stages share one semaphore sized by `store.concurrency`. A failed
//! discovery or sample call drops only its own tenant or definition and
//! marks the result `PartialFailure`. A per-scrape deadline aborts whatever
//! is still outstanding.

pub mod error;
pub mod fetch;
pub mod pipeline;

pub use error::{CollectError, SampleError};
pub use fetch::{fetch_definitions, fetch_latest_sample};
pub use pipeline::Collector;
