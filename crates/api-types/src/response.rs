use serde::{Deserialize, Serialize};

use crate::{JobSummary, null_as_default};

/// Paginated envelope returned by the job listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobListPage {
    pub count: u64,
    pub total_pages: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<JobSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_keep_service_order() {
        let page: JobListPage = serde_json::from_str(
            r#"{
                "count": 2,
                "total_pages": 1,
                "results": [
                    {"id": 7, "status": "reported_without_fails", "observable_name": "8.8.8.8"},
                    {"id": 3, "status": "running", "is_sample": true, "file_name": "invoice.pdf"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(page.count, 2);
        assert_eq!(page.total_pages, 1);
        let ids: Vec<u64> = page.results.iter().map(|job| job.id).collect();
        assert_eq!(ids, vec![7, 3]);
        assert!(page.results[1].is_sample);
    }
}
