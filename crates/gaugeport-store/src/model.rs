//! Wire types returned by the metrics store.

use serde::{Deserialize, Serialize};

use gaugeport_core::MetricDefinition;

/// One entry of the tenant listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
}

/// A metric definition as returned by the discovery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionRecord {
    pub id: String,
    #[serde(default)]
    pub tags: DefinitionTags,
}

/// Tags attached to a definition. Missing tags decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionTags {
    #[serde(rename = "type")]
    pub kind: String,
    pub descriptor_name: String,
    pub namespace_name: String,
    pub pod_name: String,
    pub nodename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
}

/// A raw gauge point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl DefinitionRecord {
    /// Attach the tenant the record was discovered under.
    pub fn into_definition(self, tenant: &str) -> MetricDefinition {
        MetricDefinition {
            id: self.id,
            tenant: tenant.to_string(),
            kind: self.tags.kind,
            descriptor_name: self.tags.descriptor_name,
            pod_name: self.tags.pod_name,
            namespace_name: self.tags.namespace_name,
            node_name: self.tags.nodename,
            raw_labels: self.tags.labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_definition() {
        let json = r#"[{
            "id": "p1/7d3c/cpu/usage",
            "tenantId": "t1",
            "type": "gauge",
            "tags": {
                "type": "pod",
                "descriptor_name": "cpu/usage",
                "namespace_name": "ns1",
                "pod_name": "p1",
                "nodename": "n1",
                "labels": "container:nginx",
                "units": "ms"
            }
        }]"#;
        let records: Vec<DefinitionRecord> = serde_json::from_str(json).unwrap();
        let definition = records.into_iter().next().unwrap().into_definition("t1");

        assert_eq!(definition.id, "p1/7d3c/cpu/usage");
        assert_eq!(definition.tenant, "t1");
        assert_eq!(definition.kind, "pod");
        assert_eq!(definition.node_name, "n1");
        assert_eq!(definition.raw_labels.as_deref(), Some("container:nginx"));
    }

    #[test]
    fn decode_definition_with_missing_tags() {
        let records: Vec<DefinitionRecord> =
            serde_json::from_str(r#"[{"id": "a"}, {"id": "b", "tags": {"type": "node"}}]"#)
                .unwrap();
        assert_eq!(records[0].tags, DefinitionTags::default());
        assert_eq!(records[1].tags.kind, "node");
        assert!(records[1].tags.labels.is_none());
    }

    #[test]
    fn decode_data_points() {
        let points: Vec<DataPoint> =
            serde_json::from_str(r#"[{"timestamp": 1700000000000, "value": 0.42}]"#).unwrap();
        assert_eq!(points[0].value, 0.42);
        assert_eq!(points[0].timestamp, 1_700_000_000_000);
    }
}
