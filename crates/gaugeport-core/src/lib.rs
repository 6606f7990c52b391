//! gaugeport-core — shared types for the gaugeport exporter.
//!
//! Holds the data model handed between the collector and the scrape
//! endpoint, the pure reshaping functions (name sanitizer, label parser,
//! line formatter), and the `config.toml` parser.
//!
//! # Architecture
//!
//! ```text
//! MetricDefinition ─┬─ parse_labels(raw_labels) → ParsedLabels
//!                   └─ format_line(config, def, labels, sample) → ExpositionLine
//!
//! ScrapeResult
//!   └── render() → text/plain; version=0.0.4 body
//! ```

pub mod config;
pub mod exposition;
pub mod labels;
pub mod sanitize;
pub mod types;

pub use config::{Config, ConfigError, ExpositionConfig, StoreConfig, MAX_SCRAPE_TIMEOUT_SECS};
pub use exposition::{format_line, render, CONTENT_TYPE};
pub use labels::parse_labels;
pub use sanitize::sanitize;
pub use types::*;
