use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::null_as_default;

/// Execution record of one analyzer or connector run against a job.
///
/// `status` and `report_type` are passed through exactly as the service sends
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    /// Plugin output; its shape depends entirely on the plugin.
    #[serde(deserialize_with = "null_as_default")]
    pub report: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
    pub process_time: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub runtime_configuration: Map<String, Value>,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub report_type: String,
}
