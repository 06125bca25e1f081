use serde::Serialize;

use crate::access::scope::{JobSummary, SubmissionView};
use crate::db::models::JobRow;

/// Response for job creation and mutation.
#[derive(Serialize)]
pub struct JobResponse {
    pub message: String,
    pub job: JobRow,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Role-scoped dashboard widgets: submissions awaiting a response and jobs
/// actively interviewing or placing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub pending_submissions: Vec<SubmissionView>,
    pub active_jobs: Vec<JobSummary>,
}
