use serde::Serialize;

use crate::db::models::SubmissionRow;

/// Response for submission creation and stage transitions.
#[derive(Serialize)]
pub struct SubmissionResponse {
    pub message: String,
    pub submission: SubmissionRow,
    /// Present when the derived job-stage update failed after the
    /// submission write succeeded; the submission state stands, the job's
    /// stage may be stale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Candidate projection of a submission, backing the resume viewer.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    pub id: i32,
    pub job_id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub target_pay: Option<String>,
    pub resume_url: Option<String>,
    pub resume_name: Option<String>,
    pub notes: Option<String>,
}

impl From<SubmissionRow> for CandidateResponse {
    fn from(row: SubmissionRow) -> Self {
        CandidateResponse {
            id: row.id,
            job_id: row.job_id,
            name: row.candidate_name,
            phone: row.phone,
            email: row.email,
            target_pay: row.target_pay,
            resume_url: row.resume_url,
            resume_name: row.resume_name,
            notes: row.notes,
        }
    }
}
