use sqlx::{Pool, Postgres};
use tracing::info;

use crate::access::identity::{Identity, Role};
use crate::access::scope::{self, JobSummary};
use crate::api::error::ServiceError;
use crate::api::job::dto::DashboardResponse;
use crate::api::job::models::{JobCreate, JobPatch, JobSearchQuery, JobVisibility};
use crate::db::job_repository::{JobRepository, NewJob};
use crate::db::models::JobRow;
use crate::db::submission_repository::SubmissionRepository;
use crate::pipeline::engine;
use crate::pipeline::{JobStage, SubmissionStage};

/// Job service: access-scoped reads plus owner-gated lifecycle writes.
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// The caller's job worklist, annotated with derived counters.
    pub async fn list_jobs(
        &self,
        identity: &Identity,
        stage: Option<JobStage>,
    ) -> Result<Vec<JobSummary>, ServiceError> {
        let jobs = JobRepository::list(&self.pool).await?;
        let submissions = SubmissionRepository::list(&self.pool).await?;
        let visible = scope::visible_jobs(identity, &jobs, stage);
        Ok(scope::annotate_jobs(visible, &submissions))
    }

    /// Substring search over open postings, still access-scoped.
    pub async fn search_jobs(
        &self,
        identity: &Identity,
        query: &JobSearchQuery,
    ) -> Result<Vec<JobSummary>, ServiceError> {
        let jobs = JobRepository::search(
            &self.pool,
            query.title_like.as_deref(),
            query.location_like.as_deref(),
        )
        .await?;
        let submissions = SubmissionRepository::list(&self.pool).await?;
        let visible = scope::visible_jobs(identity, &jobs, None);
        Ok(scope::annotate_jobs(visible, &submissions))
    }

    /// Scoped fetch: jobs outside the caller's view read as not found.
    pub async fn get_job(&self, identity: &Identity, id: i32) -> Result<JobSummary, ServiceError> {
        let job = JobRepository::get(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("job", id))?;
        if !scope::job_visible(identity, &job) {
            return Err(ServiceError::not_found("job", id));
        }
        let submissions = SubmissionRepository::list_by_job(&self.pool, id).await?;
        Ok(scope::annotate_job(&job, &submissions))
    }

    pub async fn create_job(
        &self,
        identity: &Identity,
        req: &JobCreate,
    ) -> Result<JobRow, ServiceError> {
        let Some(role) = identity.role else {
            return Err(ServiceError::Forbidden(
                "an authenticated role is required to post jobs".to_string(),
            ));
        };

        let (company_id, agency_id) = match role {
            Role::Company => {
                let company_id = identity.company_id.ok_or_else(|| {
                    ServiceError::ValidationError(
                        "company identity is missing a companyId".to_string(),
                    )
                })?;
                (company_id, None)
            }
            Role::AgencyAdmin | Role::AgencyRecruiter => {
                let agency_id = identity.agency_id.ok_or_else(|| {
                    ServiceError::ValidationError(
                        "agency identity is missing an agencyId".to_string(),
                    )
                })?;
                let company_id = req.company_id.ok_or_else(|| {
                    ServiceError::ValidationError(
                        "companyId is required when an agency imports a job".to_string(),
                    )
                })?;
                (company_id, Some(agency_id))
            }
            Role::Looper => {
                return Err(ServiceError::Forbidden(
                    "loopers cannot post jobs".to_string(),
                ))
            }
        };

        let stage = initial_stage(role, req.stage)?;

        // Recipient lists only make sense on private postings.
        let recipients = match req.visibility {
            JobVisibility::Private => req.recipients.as_deref(),
            JobVisibility::Public => None,
        };

        info!(
            "Service: Creating job '{}' for company {}",
            req.title, company_id
        );

        let row = JobRepository::create(
            &self.pool,
            &NewJob {
                company_id,
                agency_id,
                assigned_recruiter: req.assigned_recruiter,
                title: &req.title,
                location: req.location.as_deref(),
                pay_rate_from: req.pay_rate_from,
                pay_rate_to: req.pay_rate_to,
                pay_type: req.pay_type.as_str(),
                openings: req.openings,
                stage: stage.as_str(),
                visibility: req.visibility.as_str(),
                priority: req.priority.map(|p| p.as_str()),
                recipients,
                description: req.description.as_deref(),
                duties: req.duties.as_deref(),
                qualifications: req.qualifications.as_deref(),
                benefits: req.benefits.as_deref(),
            },
        )
        .await?;

        info!("Service: Job created with id={}", row.id);
        Ok(row)
    }

    pub async fn update_job(
        &self,
        identity: &Identity,
        id: i32,
        patch: &JobPatch,
    ) -> Result<JobRow, ServiceError> {
        let job = self.owned_job(identity, id).await?;

        info!("Service: Patching job id={}", job.id);
        JobRepository::update(&self.pool, id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("job", id))
    }

    /// Owner-issued lifecycle move. Publish, close and reopen are the legal
    /// owner moves; `hiring -> in-progress` is applied by the pipeline
    /// engine only and is rejected here.
    pub async fn change_stage(
        &self,
        identity: &Identity,
        id: i32,
        target: JobStage,
    ) -> Result<JobRow, ServiceError> {
        let job = self.owned_job(identity, id).await?;
        let current = parse_job_stage(&job)?;

        if target == JobStage::InProgress {
            return Err(ServiceError::InvalidTransition {
                from: current.to_string(),
                to: target.to_string(),
            });
        }
        let next = engine::plan_job_transition(current, target)?;

        info!("Service: Moving job id={} from {} to {}", id, current, next);
        JobRepository::set_stage(&self.pool, id, next.as_str())
            .await?
            .ok_or_else(|| ServiceError::not_found("job", id))
    }

    /// Owners may delete draft and closed jobs; open and active jobs keep
    /// their history.
    pub async fn delete_job(&self, identity: &Identity, id: i32) -> Result<(), ServiceError> {
        let job = self.owned_job(identity, id).await?;
        let stage = parse_job_stage(&job)?;

        if !stage.is_deletable() {
            return Err(ServiceError::ValidationError(format!(
                "only draft or closed jobs may be deleted; job {id} is {stage}"
            )));
        }

        info!("Service: Deleting job id={}", id);
        JobRepository::delete(&self.pool, id).await?;
        Ok(())
    }

    /// Role-scoped dashboard: submissions awaiting a response plus jobs
    /// actively interviewing or placing candidates.
    pub async fn dashboard(&self, identity: &Identity) -> Result<DashboardResponse, ServiceError> {
        let jobs = JobRepository::list(&self.pool).await?;
        let submissions = SubmissionRepository::list(&self.pool).await?;

        let pending_submissions = scope::visible_submissions(identity, &submissions, &jobs, None)
            .into_iter()
            .filter(|s| SubmissionStage::parse(&s.status) == Some(SubmissionStage::Submitted))
            .map(|s| scope::annotate_submission(identity, s))
            .collect();

        let active_jobs = scope::visible_jobs(identity, &jobs, Some(JobStage::InProgress))
            .into_iter()
            .filter(|job| {
                submissions.iter().any(|s| {
                    s.job_id == job.id
                        && SubmissionStage::parse(&s.status)
                            .is_some_and(|st| st.is_at_or_past_accepted())
                })
            })
            .map(|job| scope::annotate_job(job, &submissions))
            .collect();

        Ok(DashboardResponse {
            pending_submissions,
            active_jobs,
        })
    }

    /// Fetch a job the caller owns. Invisible jobs read as not found;
    /// visible but unowned jobs are forbidden.
    async fn owned_job(&self, identity: &Identity, id: i32) -> Result<JobRow, ServiceError> {
        let job = JobRepository::get(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("job", id))?;
        if !scope::job_visible(identity, &job) {
            return Err(ServiceError::not_found("job", id));
        }
        if !scope::can_manage_job(identity, &job) {
            return Err(ServiceError::Forbidden(
                "only the owning company or assigned agency may modify this job".to_string(),
            ));
        }
        Ok(job)
    }
}

fn parse_job_stage(job: &JobRow) -> Result<JobStage, ServiceError> {
    JobStage::parse(&job.stage).ok_or_else(|| {
        ServiceError::ValidationError(format!(
            "job {} has unrecognized stage '{}'",
            job.id, job.stage
        ))
    })
}

/// Resolve the lifecycle stage a new posting starts in. Companies may save
/// drafts; agency imports go straight to hiring, since drafts are never in
/// an agency's visible set and an agency draft would be unmanageable by
/// its creator.
fn initial_stage(role: Role, requested: Option<JobStage>) -> Result<JobStage, ServiceError> {
    match requested.unwrap_or(JobStage::Hiring) {
        JobStage::Hiring => Ok(JobStage::Hiring),
        JobStage::Draft if role == Role::Company => Ok(JobStage::Draft),
        JobStage::Draft => Err(ServiceError::ValidationError(
            "agency-imported jobs start at hiring, not draft".to_string(),
        )),
        _ => Err(ServiceError::ValidationError(
            "new jobs start as draft or hiring".to_string(),
        )),
    }
}
