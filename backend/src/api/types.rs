//! REST API types for client integration.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::analysis::AnalysisReport;

/// Response sent after an export upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// "ready", or "warning" when the reconciliation remainder is negative
    /// or some rows had no readable date
    pub status: String,

    /// Source file name, if the client sent one
    pub file_name: Option<String>,

    pub report: AnalysisReport,
}

impl UploadResponse {
    pub fn new(report: AnalysisReport, file_name: Option<String>) -> Self {
        let warning = report.summary.other_subscribers < 0.0 || report.summary.undated_records > 0;
        Self {
            job_id: Uuid::new_v4().to_string(),
            status: if warning { "warning" } else { "ready" }.to_string(),
            file_name,
            report,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "report": null
    })
}
