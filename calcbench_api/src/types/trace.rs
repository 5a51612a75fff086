use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A source fact that contributed to a standardized value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TraceFact {
    /// The XBRL tag, absent for non-XBRL facts.
    pub local_name: Option<String>,

    /// Label for points extracted from non-XBRL documents.
    #[serde(rename = "non_XBRL_label")]
    pub non_xbrl_label: Option<String>,

    #[serde(default)]
    pub negative_weight: bool,

    #[serde(rename = "XBRL_fact_value")]
    pub xbrl_fact_value: Option<Value>,

    pub fact_id: Option<i64>,

    pub dimensions: Option<String>,

    /// Fields this client does not model yet.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
