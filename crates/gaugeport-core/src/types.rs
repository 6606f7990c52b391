//! Data model shared across gaugeport crates.
//!
//! Everything here lives for exactly one scrape: definitions are built
//! from a discovery response, samples are consumed by the formatter, and
//! the resulting `ScrapeResult` is rendered and dropped.

/// Logical partition under which metrics are stored and queried.
pub type TenantId = String;

/// Ordered label key → value pairs parsed from a definition's `labels` tag.
///
/// A `Vec` rather than a map: input order is preserved and duplicate keys
/// are kept.
pub type ParsedLabels = Vec<(String, String)>;

/// Tag value marking a definition as pod-scoped.
pub const POD_KIND: &str = "pod";

/// One collectible series as recorded in the metrics store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDefinition {
    /// Store-internal identifier (opaque, may contain `/`).
    pub id: String,
    /// Tenant the definition was discovered under.
    pub tenant: TenantId,
    /// Declared kind (`tags.type`), only `"pod"` is collectible.
    pub kind: String,
    /// Semantic metric name, e.g. `cpu/usage`.
    pub descriptor_name: String,
    pub pod_name: String,
    pub namespace_name: String,
    pub node_name: String,
    /// Comma-separated `key:value` list, possibly absent or malformed.
    pub raw_labels: Option<String>,
}

impl MetricDefinition {
    /// Whether this definition is pod-scoped and named in the allow-list.
    pub fn is_collectible<S: AsRef<str>>(&self, allow_list: &[S]) -> bool {
        self.kind == POD_KIND
            && allow_list
                .iter()
                .any(|name| name.as_ref() == self.descriptor_name)
    }
}

/// Latest observed value for one definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    /// Milliseconds since the Unix epoch, as reported by the store.
    pub timestamp: i64,
}

/// One formatted exposition line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpositionLine {
    /// Sanitized (and optionally prefixed) metric name.
    pub name: String,
    /// Label assignments in output order. Duplicates are emitted as-is.
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

/// Overall outcome of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStatus {
    /// Every discovery and sample call succeeded.
    Ok,
    /// At least one discovery or sample call failed; the result is incomplete.
    PartialFailure,
}

/// Aggregate of one `collect` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeResult {
    /// Collected lines in completion order (not stable across scrapes).
    pub lines: Vec<ExpositionLine>,
    pub status: ScrapeStatus,
}

impl ScrapeResult {
    /// Build a result from collected lines and the pipeline's degraded flag.
    pub fn new(lines: Vec<ExpositionLine>, degraded: bool) -> Self {
        let status = if degraded {
            ScrapeStatus::PartialFailure
        } else {
            ScrapeStatus::Ok
        };
        Self { lines, status }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ScrapeStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(kind: &str, descriptor_name: &str) -> MetricDefinition {
        MetricDefinition {
            id: format!("p1/{descriptor_name}"),
            tenant: "t1".to_string(),
            kind: kind.to_string(),
            descriptor_name: descriptor_name.to_string(),
            pod_name: "p1".to_string(),
            namespace_name: "ns1".to_string(),
            node_name: "n1".to_string(),
            raw_labels: None,
        }
    }

    #[test]
    fn pod_kind_in_allow_list_is_collectible() {
        let allow = vec!["cpu/usage".to_string()];
        assert!(definition("pod", "cpu/usage").is_collectible(&allow));
    }

    #[test]
    fn non_pod_kind_is_not_collectible() {
        let allow = ["cpu/usage"];
        assert!(!definition("node", "cpu/usage").is_collectible(&allow));
        assert!(!definition("pod_container", "cpu/usage").is_collectible(&allow));
    }

    #[test]
    fn descriptor_outside_allow_list_is_not_collectible() {
        let allow = ["cpu/usage"];
        assert!(!definition("pod", "memory/usage").is_collectible(&allow));
        assert!(!definition("pod", "cpu/usage").is_collectible::<&str>(&[]));
    }

    #[test]
    fn degraded_flag_maps_to_status() {
        assert_eq!(ScrapeResult::new(vec![], false).status, ScrapeStatus::Ok);
        let partial = ScrapeResult::new(vec![], true);
        assert_eq!(partial.status, ScrapeStatus::PartialFailure);
        assert!(!partial.is_ok());
    }
}
