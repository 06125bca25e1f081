use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// Database representation of a job posting.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: i32,
    pub company_id: i32,
    pub agency_id: Option<i32>,
    pub assigned_recruiter: Option<i32>,
    pub title: String,
    pub location: Option<String>,
    pub pay_rate_from: f64,
    pub pay_rate_to: f64,
    pub pay_type: String,
    pub openings: i32,
    pub stage: String,
    pub visibility: String,
    pub priority: Option<String>,
    /// Agency/looper user ids invited to a private posting.
    pub recipients: Option<Vec<i32>>,
    pub description: Option<String>,
    pub duties: Option<String>,
    pub qualifications: Option<String>,
    pub benefits: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database representation of a candidate submission. Candidate fields are
/// stored inline; the resume is an opaque URL.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRow {
    pub id: i32,
    pub job_id: i32,
    pub looper_id: Option<i32>,
    pub looper_name: String,
    /// Set when an agency submitted the candidate.
    pub agency_id: Option<i32>,
    pub candidate_name: String,
    pub phone: String,
    pub email: String,
    pub target_pay: Option<String>,
    pub resume_url: Option<String>,
    pub resume_name: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub feedback: Option<String>,
    pub scheduled_date: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Account record consumed by the trivial login endpoint. Only the fields
/// the login response echoes are mapped; credentials are matched in SQL.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub company_id: Option<i32>,
    pub agency_id: Option<i32>,
}
