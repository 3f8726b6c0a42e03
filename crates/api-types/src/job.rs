use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Report, Tag, UserDetails, null_as_default};

/// Fields shared by the list view and the detailed view of a job.
///
/// `received_request_time` and `finished_analysis_time` stay `None` until the
/// service records the corresponding event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSummary {
    pub id: u64,
    pub user: UserDetails,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    pub process_time: f64,
    pub is_sample: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub md5: String,
    #[serde(deserialize_with = "null_as_default")]
    pub observable_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub observable_classification: String,
    #[serde(deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub file_mimetype: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub analyzers_requested: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub connectors_requested: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub analyzers_to_execute: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub connectors_to_execute: Vec<String>,
    pub received_request_time: Option<DateTime<Utc>>,
    pub finished_analysis_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub tlp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
}

/// A job with its analyzer and connector reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    #[serde(flatten)]
    pub summary: JobSummary,
    #[serde(deserialize_with = "null_as_default")]
    pub analyzer_reports: Vec<Report>,
    #[serde(deserialize_with = "null_as_default")]
    pub connector_reports: Vec<Report>,
    #[serde(deserialize_with = "null_as_default")]
    pub permission: Map<String, Value>,
}

impl Job {
    pub fn id(&self) -> u64 {
        self.summary.id
    }

    /// Report of the analyzer with the given name, if it ran.
    pub fn analyzer_report(&self, name: &str) -> Option<&Report> {
        self.analyzer_reports.iter().find(|r| r.name == name)
    }

    /// Report of the connector with the given name, if it ran.
    pub fn connector_report(&self, name: &str) -> Option<&Report> {
        self.connector_reports.iter().find(|r| r.name == name)
    }
}
