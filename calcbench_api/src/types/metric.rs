use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The standardized metrics dictionary, keyed by category.
pub type MetricCatalog = BTreeMap<String, Vec<MetricDefinition>>;

/// One entry of the `availableMetrics` dictionary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MetricDefinition {
    /// Name to pass in a query's metric list.
    pub metric: Option<String>,

    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn catalog_groups_by_category() {
        let catalog: MetricCatalog = serde_json::from_value(json!({
            "Income Statement": [
                {"metric": "revenue", "description": "Total revenue", "isPointInTime": false}
            ],
            "Balance Sheet": []
        }))
        .unwrap();
        assert_eq!(catalog.len(), 2);
        let revenue = &catalog["Income Statement"][0];
        assert_eq!(revenue.metric.as_deref(), Some("revenue"));
        assert_eq!(revenue.extra.get("isPointInTime"), Some(&json!(false)));
    }
}
