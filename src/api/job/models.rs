use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::pipeline::JobStage;

/// Pay basis for a posting.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    Hourly,
    Salary,
}

impl PayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayType::Hourly => "hourly",
            PayType::Salary => "salary",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobVisibility {
    Public,
    Private,
}

impl JobVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobVisibility::Public => "public",
            JobVisibility::Private => "private",
        }
    }
}

/// A/B/C priority band; absent means no priority.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    A,
    B,
    C,
}

impl JobPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPriority::A => "a",
            JobPriority::B => "b",
            JobPriority::C => "c",
        }
    }
}

/// Job creation payload. Ownership comes from the caller's identity for
/// companies; agencies importing a client job name the company explicitly.
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobCreate {
    pub company_id: Option<i32>,
    #[validate(length(min = 3, max = 120, message = "Title must be between 3 and 120 characters"))]
    pub title: String,
    pub location: Option<String>,
    #[validate(range(min = 0.0, message = "Pay rate must not be negative"))]
    pub pay_rate_from: f64,
    #[validate(range(min = 0.0, message = "Pay rate must not be negative"))]
    pub pay_rate_to: f64,
    pub pay_type: PayType,
    #[validate(range(min = 0, message = "Openings must not be negative"))]
    pub openings: i32,
    /// Jobs start life as drafts or open postings; anything else is
    /// rejected.
    pub stage: Option<JobStage>,
    pub visibility: JobVisibility,
    pub priority: Option<JobPriority>,
    /// Invited agency/looper ids; only meaningful on private postings.
    pub recipients: Option<Vec<i32>>,
    pub assigned_recruiter: Option<i32>,
    pub description: Option<String>,
    pub duties: Option<String>,
    pub qualifications: Option<String>,
    pub benefits: Option<String>,
}

/// Partial job update. Absent fields keep their stored value. Stage is not
/// patchable; lifecycle moves go through the stage endpoint.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[validate(length(min = 3, max = 120, message = "Title must be between 3 and 120 characters"))]
    pub title: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 0.0, message = "Pay rate must not be negative"))]
    pub pay_rate_from: Option<f64>,
    #[validate(range(min = 0.0, message = "Pay rate must not be negative"))]
    pub pay_rate_to: Option<f64>,
    pub pay_type: Option<PayType>,
    #[validate(range(min = 0, message = "Openings must not be negative"))]
    pub openings: Option<i32>,
    pub visibility: Option<JobVisibility>,
    pub priority: Option<JobPriority>,
    pub recipients: Option<Vec<i32>>,
    pub assigned_recruiter: Option<i32>,
    pub description: Option<String>,
    pub duties: Option<String>,
    pub qualifications: Option<String>,
    pub benefits: Option<String>,
}

/// Owner-issued lifecycle move: publish, close, or reopen.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct JobStageChange {
    pub target: JobStage,
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub stage: Option<JobStage>,
}

/// `field_like` substring filters, per the persistence query convention.
#[derive(Debug, Deserialize)]
pub struct JobSearchQuery {
    pub title_like: Option<String>,
    pub location_like: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn base_create() -> JobCreate {
        JobCreate {
            company_id: None,
            title: "Forklift Operator".to_string(),
            location: Some("Reno, NV".to_string()),
            pay_rate_from: 22.0,
            pay_rate_to: 28.0,
            pay_type: PayType::Hourly,
            openings: 3,
            stage: None,
            visibility: JobVisibility::Public,
            priority: None,
            recipients: None,
            assigned_recruiter: None,
            description: None,
            duties: None,
            qualifications: None,
            benefits: None,
        }
    }

    #[test]
    fn valid_job_create_passes() {
        assert!(base_create().validate().is_ok());
    }

    #[test]
    fn short_title_is_rejected() {
        let mut job = base_create();
        job.title = "ab".to_string();
        assert!(job.validate().is_err());
    }

    #[test]
    fn negative_pay_and_openings_are_rejected() {
        let mut job = base_create();
        job.pay_rate_from = -1.0;
        assert!(job.validate().is_err());

        let mut job = base_create();
        job.openings = -2;
        assert!(job.validate().is_err());
    }

    #[test]
    fn stage_values_use_the_canonical_vocabulary() {
        let json = r#"{"target": "in-progress"}"#;
        let change: JobStageChange = serde_json::from_str(json).unwrap();
        assert_eq!(change.target, JobStage::InProgress);
        assert!(serde_json::from_str::<JobStageChange>(r#"{"target": "active"}"#).is_err());
        assert!(serde_json::from_str::<JobStageChange>(r#"{"target": "open"}"#).is_err());
    }
}
