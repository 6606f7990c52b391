//! Prometheus text exposition format.
//!
//! Turns a definition and its latest sample into an `ExpositionLine`, and
//! renders a `ScrapeResult` into the body served on the scrape endpoint.

use std::fmt::Write;

use crate::config::Config;
use crate::sanitize::sanitize;
use crate::types::{ExpositionLine, MetricDefinition, ParsedLabels, Sample, ScrapeResult};

/// Content type of the scrape response body.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Build the exposition line for one definition.
///
/// The name is `descriptor_name`, suffixed with `_<unit>` when a unit is
/// configured, sanitized, then prefixed with `exposition.namespace`. The
/// topology labels come first and are taken verbatim; parsed labels follow
/// with sanitized keys.
pub fn format_line(
    config: &Config,
    definition: &MetricDefinition,
    labels: ParsedLabels,
    sample: Sample,
) -> ExpositionLine {
    let resolved = match config.unit_for(&definition.descriptor_name) {
        Some(unit) => format!("{}_{}", definition.descriptor_name, unit),
        None => definition.descriptor_name.clone(),
    };
    let name = format!("{}{}", config.exposition.namespace, sanitize(&resolved));

    let mut assignments = Vec::with_capacity(3 + labels.len());
    assignments.push(("pod_name".to_string(), definition.pod_name.clone()));
    assignments.push(("namespace_name".to_string(), definition.namespace_name.clone()));
    assignments.push(("nodename".to_string(), definition.node_name.clone()));
    assignments.extend(labels.into_iter().map(|(k, v)| (sanitize(&k), v)));

    ExpositionLine {
        name,
        labels: assignments,
        value: sample.value,
    }
}

impl ExpositionLine {
    /// Append this line, newline-terminated, to `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push_str(&self.name);
        if !self.labels.is_empty() {
            out.push('{');
            for (i, (key, value)) in self.labels.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{key}=\"{}\"", escape_label_value(value));
            }
            out.push('}');
        }
        out.push(' ');
        out.push_str(&format_value(self.value));
        out.push('\n');
    }
}

/// Render every line of a scrape result into one body.
pub fn render(result: &ScrapeResult) -> String {
    let mut out = String::new();
    for line in &result.lines {
        line.write_to(&mut out);
    }
    out
}

fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}
