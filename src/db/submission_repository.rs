use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::db::models::SubmissionRow;
use crate::pipeline::TransitionPlan;

/// Resolved insert values for a candidate submission.
#[derive(Debug)]
pub struct NewSubmission<'a> {
    pub job_id: i32,
    pub looper_id: Option<i32>,
    pub looper_name: &'a str,
    pub agency_id: Option<i32>,
    pub candidate_name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub target_pay: Option<&'a str>,
    pub resume_url: Option<&'a str>,
    pub resume_name: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Repository for submission database operations.
pub struct SubmissionRepository;

impl SubmissionRepository {
    pub async fn list(pool: &Pool<Postgres>) -> Result<Vec<SubmissionRow>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionRow>("SELECT * FROM submissions ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_job(
        pool: &Pool<Postgres>,
        job_id: i32,
    ) -> Result<Vec<SubmissionRow>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionRow>(
            "SELECT * FROM submissions WHERE job_id = $1 ORDER BY id",
        )
        .bind(job_id)
        .fetch_all(pool)
        .await
    }

    pub async fn get(pool: &Pool<Postgres>, id: i32) -> Result<Option<SubmissionRow>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionRow>("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// New submissions always enter the pipeline at `submitted`.
    pub async fn create(
        pool: &Pool<Postgres>,
        sub: &NewSubmission<'_>,
    ) -> Result<SubmissionRow, sqlx::Error> {
        debug!(
            "Creating submission: candidate={}, job_id={}",
            sub.candidate_name, sub.job_id
        );

        let row = sqlx::query_as::<_, SubmissionRow>(
            r#"
            INSERT INTO submissions (
                job_id, looper_id, looper_name, agency_id, candidate_name,
                phone, email, target_pay, resume_url, resume_name, notes, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'submitted')
            RETURNING *
            "#,
        )
        .bind(sub.job_id)
        .bind(sub.looper_id)
        .bind(sub.looper_name)
        .bind(sub.agency_id)
        .bind(sub.candidate_name)
        .bind(sub.phone)
        .bind(sub.email)
        .bind(sub.target_pay)
        .bind(sub.resume_url)
        .bind(sub.resume_name)
        .bind(sub.notes)
        .fetch_one(pool)
        .await?;

        debug!("Submission created with id={}", row.id);
        Ok(row)
    }

    /// Persist a validated transition plan. Feedback is only overwritten
    /// when the plan says so, and schedule data is only ever added, never
    /// cleared.
    pub async fn apply_transition(
        pool: &Pool<Postgres>,
        id: i32,
        plan: &TransitionPlan,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        debug!("Transitioning submission id={} to {}", id, plan.status);

        let set_feedback = plan.feedback.is_some();
        let feedback = plan.feedback.clone().flatten();

        sqlx::query_as::<_, SubmissionRow>(
            r#"
            UPDATE submissions SET
                status = $2,
                feedback = CASE WHEN $3 THEN $4 ELSE feedback END,
                scheduled_date = COALESCE($5, scheduled_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(plan.status.as_str())
        .bind(set_feedback)
        .bind(feedback)
        .bind(plan.scheduled_date.as_deref())
        .fetch_optional(pool)
        .await
    }
}
