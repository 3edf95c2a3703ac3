//! Raw facet aggregation payloads returned by the search backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationEntry {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
    pub count: u64,
    #[serde(default)]
    pub is_estimate: bool,
}

/// Aggregation counts keyed by backend field name (`genre`, `fileType`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Aggregations(BTreeMap<String, Vec<AggregationEntry>>);

impl Aggregations {
    /// Entries for `field`, in the order the backend sent them. Unknown
    /// fields have no entries.
    pub fn get(&self, field: &str) -> &[AggregationEntry] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl FromIterator<(String, Vec<AggregationEntry>)> for Aggregations {
    fn from_iter<T: IntoIterator<Item = (String, Vec<AggregationEntry>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_backend_payload_with_optional_fields() {
        let aggregations = Aggregations::from_json(
            r#"{
                "genre": [
                    {"value": "action", "count": 12, "isEstimate": true},
                    {"value": "drama", "label": "Drama", "count": 4}
                ],
                "videoResolution": []
            }"#,
        )
        .unwrap();

        assert_eq!(
            aggregations.get("genre"),
            [
                AggregationEntry {
                    value: "action".to_string(),
                    label: None,
                    count: 12,
                    is_estimate: true,
                },
                AggregationEntry {
                    value: "drama".to_string(),
                    label: Some("Drama".to_string()),
                    count: 4,
                    is_estimate: false,
                },
            ]
        );
        assert!(aggregations.get("videoResolution").is_empty());
        assert!(aggregations.get("torrentTag").is_empty());
    }
}
