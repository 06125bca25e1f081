use sqlx::{Pool, Postgres};
use tracing::{info, warn};

use crate::access::identity::{Identity, Role};
use crate::access::scope::{self, SubmissionView};
use crate::api::error::ServiceError;
use crate::api::submission::dto::CandidateResponse;
use crate::api::submission::models::{SubmissionCreate, TransitionRequest};
use crate::db::job_repository::JobRepository;
use crate::db::models::{JobRow, SubmissionRow};
use crate::db::submission_repository::{NewSubmission, SubmissionRepository};
use crate::pipeline::engine;
use crate::pipeline::{JobStage, SubmissionStage, TransitionPayload};

/// Submission service: scoped worklists, candidate intake, and validated
/// pipeline transitions with the job-activation side effect.
pub struct SubmissionService {
    pool: Pool<Postgres>,
}

impl SubmissionService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// The caller's visible submissions, annotated with badge, label and
    /// legal actions, optionally narrowed to one job and/or one stage.
    pub async fn list_submissions(
        &self,
        identity: &Identity,
        job_id: Option<i32>,
        status: Option<SubmissionStage>,
    ) -> Result<Vec<SubmissionView>, ServiceError> {
        let submissions = SubmissionRepository::list(&self.pool).await?;
        let jobs = JobRepository::list(&self.pool).await?;

        Ok(scope::visible_submissions(identity, &submissions, &jobs, job_id)
            .into_iter()
            .filter(|s| match status {
                Some(wanted) => SubmissionStage::parse(&s.status) == Some(wanted),
                None => true,
            })
            .map(|s| scope::annotate_submission(identity, s))
            .collect())
    }

    /// Candidate intake by a looper or agency against a visible open job.
    pub async fn submit_candidate(
        &self,
        identity: &Identity,
        req: &SubmissionCreate,
    ) -> Result<SubmissionRow, ServiceError> {
        let Some(role) = identity.role else {
            return Err(ServiceError::Forbidden(
                "an authenticated role is required to submit candidates".to_string(),
            ));
        };
        if role == Role::Company {
            return Err(ServiceError::Forbidden(
                "companies review submissions; loopers and agencies submit candidates".to_string(),
            ));
        }

        let job = JobRepository::get(&self.pool, req.job_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("job", req.job_id))?;
        if !scope::job_visible(identity, &job) {
            return Err(ServiceError::not_found("job", req.job_id));
        }
        if JobStage::parse(&job.stage) != Some(JobStage::Hiring) {
            return Err(ServiceError::ValidationError(format!(
                "job {} is not accepting candidates",
                job.id
            )));
        }

        info!(
            "Service: Submitting candidate '{}' for job {}",
            req.name, req.job_id
        );

        let looper_name = req.looper.clone().unwrap_or_default();
        let row = SubmissionRepository::create(
            &self.pool,
            &NewSubmission {
                job_id: req.job_id,
                looper_id: match role {
                    Role::Looper => identity.user_id,
                    _ => None,
                },
                looper_name: &looper_name,
                agency_id: if role.is_agency() { identity.agency_id } else { None },
                candidate_name: &req.name,
                phone: &req.phone,
                email: &req.email,
                target_pay: req.target_pay.as_deref(),
                resume_url: req.resume_url.as_deref(),
                resume_name: req.resume_name.as_deref(),
                notes: req.notes.as_deref(),
            },
        )
        .await?;

        info!("Service: Submission created with id={}", row.id);
        Ok(row)
    }

    /// Validated pipeline transition.
    ///
    /// Order matters: validation, then the submission write, then the
    /// derived job-stage update. The side effect is best-effort: when it
    /// fails, the submission transition stands and the returned warning
    /// tells the caller the job's stage may be stale.
    pub async fn transition(
        &self,
        identity: &Identity,
        id: i32,
        req: &TransitionRequest,
    ) -> Result<(SubmissionRow, Option<String>), ServiceError> {
        let submission = SubmissionRepository::get(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("submission", id))?;
        let job = JobRepository::get(&self.pool, submission.job_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("job", submission.job_id))?;

        let Some(role) = identity.role else {
            return Err(ServiceError::Forbidden(
                "an authenticated role is required to act on submissions".to_string(),
            ));
        };
        if role == Role::Looper {
            return Err(ServiceError::Forbidden(
                "loopers may view their submissions but not change their stage".to_string(),
            ));
        }
        if !scope::can_manage_job(identity, &job) {
            return Err(ServiceError::Forbidden(
                "only the owning company or assigned agency may act on this submission".to_string(),
            ));
        }

        let current = SubmissionStage::parse(&submission.status).ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "submission {} has unrecognized status '{}'",
                id, submission.status
            ))
        })?;
        let payload = TransitionPayload {
            feedback: req.feedback.clone(),
            scheduled_date: req.scheduled_date.clone(),
        };
        let plan = engine::plan_transition(current, req.target, &payload)?;

        info!(
            "Service: Transitioning submission id={} from {} to {}",
            id, current, plan.status
        );
        let updated = SubmissionRepository::apply_transition(&self.pool, id, &plan)
            .await?
            .ok_or_else(|| ServiceError::not_found("submission", id))?;

        let mut warning = None;
        if plan.may_activate_job {
            match self.activate_job_if_first(&job, id).await {
                Ok(true) => {
                    info!(
                        "Service: Job {} promoted to in-progress by submission {}",
                        job.id, id
                    );
                }
                Ok(false) => {}
                Err(e) => {
                    // The submission write already stands; job stage is a
                    // derived convenience field and may lag.
                    warn!(
                        "Service: Job {} stage update failed after accepting submission {}: {:?}",
                        job.id, id, e
                    );
                    warning = Some(
                        "submission updated, but the job's stage could not be refreshed and may be stale"
                            .to_string(),
                    );
                }
            }
        }

        Ok((updated, warning))
    }

    /// Candidate projection for the resume viewer, scoped like any other
    /// submission read.
    pub async fn get_candidate(
        &self,
        identity: &Identity,
        id: i32,
    ) -> Result<CandidateResponse, ServiceError> {
        let submission = SubmissionRepository::get(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("candidate", id))?;
        let job = JobRepository::get(&self.pool, submission.job_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("job", submission.job_id))?;
        if !scope::submission_visible(identity, &submission, &job) {
            return Err(ServiceError::not_found("candidate", id));
        }
        Ok(CandidateResponse::from(submission))
    }

    /// Promote the job to in-progress when this is its first accepted
    /// submission. Siblings are re-read after the primary write, so the
    /// just-updated submission is excluded by id.
    async fn activate_job_if_first(
        &self,
        job: &JobRow,
        submission_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let Some(job_stage) = JobStage::parse(&job.stage) else {
            return Ok(false);
        };
        let siblings = SubmissionRepository::list_by_job(&self.pool, job.id).await?;
        let sibling_stages: Vec<SubmissionStage> = siblings
            .iter()
            .filter(|s| s.id != submission_id)
            .filter_map(|s| SubmissionStage::parse(&s.status))
            .collect();

        if engine::should_activate_job(job_stage, &sibling_stages) {
            JobRepository::set_stage(&self.pool, job.id, JobStage::InProgress.as_str()).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
