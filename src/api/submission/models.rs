use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::pipeline::SubmissionStage;

/// Candidate submission payload. The resume is an opaque URL; byte
/// handling happens elsewhere.
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionCreate {
    pub job_id: i32,
    #[validate(length(min = 1, max = 120, message = "Candidate name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 40, message = "Candidate phone is required"))]
    pub phone: String,
    #[validate(email(message = "Candidate email must be a valid address"))]
    pub email: String,
    /// Submitter display name shown in worklists.
    pub looper: Option<String>,
    pub target_pay: Option<String>,
    pub resume_url: Option<String>,
    pub resume_name: Option<String>,
    pub notes: Option<String>,
}

/// Pipeline transition request.
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub target: SubmissionStage,
    /// Required when target is `declined`.
    pub feedback: Option<String>,
    /// Optional interview/offer date.
    pub scheduled_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionListQuery {
    #[serde(rename = "jobId")]
    pub job_id: Option<i32>,
    pub status: Option<SubmissionStage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_request_uses_canonical_stage_names() {
        let req: TransitionRequest =
            serde_json::from_str(r#"{"target": "interview_phone", "scheduledDate": "2025-03-01"}"#)
                .unwrap();
        assert_eq!(req.target, SubmissionStage::InterviewPhone);
        assert_eq!(req.scheduled_date.as_deref(), Some("2025-03-01"));

        // Legacy vocabularies from older screens must not deserialize.
        assert!(serde_json::from_str::<TransitionRequest>(r#"{"target": "phone_interview"}"#).is_err());
        assert!(serde_json::from_str::<TransitionRequest>(r#"{"target": "pending"}"#).is_err());
    }

    #[test]
    fn candidate_email_is_validated() {
        let req = SubmissionCreate {
            job_id: 1,
            name: "Dana Fields".to_string(),
            phone: "555-0199".to_string(),
            email: "not-an-email".to_string(),
            looper: None,
            target_pay: None,
            resume_url: None,
            resume_name: None,
            notes: None,
        };
        assert!(req.validate().is_err());
    }
}
