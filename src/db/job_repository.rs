use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::api::job::models::JobPatch;
use crate::db::models::JobRow;

/// Resolved insert values for a job. Ownership and lifecycle defaults are
/// decided by the service before anything reaches the database.
#[derive(Debug)]
pub struct NewJob<'a> {
    pub company_id: i32,
    pub agency_id: Option<i32>,
    pub assigned_recruiter: Option<i32>,
    pub title: &'a str,
    pub location: Option<&'a str>,
    pub pay_rate_from: f64,
    pub pay_rate_to: f64,
    pub pay_type: &'a str,
    pub openings: i32,
    pub stage: &'a str,
    pub visibility: &'a str,
    pub priority: Option<&'a str>,
    pub recipients: Option<&'a [i32]>,
    pub description: Option<&'a str>,
    pub duties: Option<&'a str>,
    pub qualifications: Option<&'a str>,
    pub benefits: Option<&'a str>,
}

/// Repository for job database operations. Plain CRUD; all business rules
/// live in the pipeline engine and the service layer.
pub struct JobRepository;

impl JobRepository {
    pub async fn list(pool: &Pool<Postgres>) -> Result<Vec<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn get(pool: &Pool<Postgres>, id: i32) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Substring search over open postings, following the `field_like`
    /// filter convention.
    pub async fn search(
        pool: &Pool<Postgres>,
        title_like: Option<&str>,
        location_like: Option<&str>,
    ) -> Result<Vec<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE stage = 'hiring'
              AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR location ILIKE '%' || $2 || '%')
            ORDER BY id
            "#,
        )
        .bind(title_like)
        .bind(location_like)
        .fetch_all(pool)
        .await
    }

    pub async fn create(pool: &Pool<Postgres>, job: &NewJob<'_>) -> Result<JobRow, sqlx::Error> {
        debug!("Creating job: title={}, company_id={}", job.title, job.company_id);

        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (
                company_id, agency_id, assigned_recruiter, title, location,
                pay_rate_from, pay_rate_to, pay_type, openings, stage,
                visibility, priority, recipients, description, duties,
                qualifications, benefits
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(job.company_id)
        .bind(job.agency_id)
        .bind(job.assigned_recruiter)
        .bind(job.title)
        .bind(job.location)
        .bind(job.pay_rate_from)
        .bind(job.pay_rate_to)
        .bind(job.pay_type)
        .bind(job.openings)
        .bind(job.stage)
        .bind(job.visibility)
        .bind(job.priority)
        .bind(job.recipients)
        .bind(job.description)
        .bind(job.duties)
        .bind(job.qualifications)
        .bind(job.benefits)
        .fetch_one(pool)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    /// Patch job attributes. Absent fields keep their stored value; `stage`
    /// is deliberately not patchable here (lifecycle moves go through
    /// [`Self::set_stage`]).
    pub async fn update(
        pool: &Pool<Postgres>,
        id: i32,
        patch: &JobPatch,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Patching job id={}", id);

        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                title = COALESCE($2, title),
                location = COALESCE($3, location),
                pay_rate_from = COALESCE($4, pay_rate_from),
                pay_rate_to = COALESCE($5, pay_rate_to),
                pay_type = COALESCE($6, pay_type),
                openings = COALESCE($7, openings),
                visibility = COALESCE($8, visibility),
                priority = COALESCE($9, priority),
                recipients = COALESCE($10, recipients),
                assigned_recruiter = COALESCE($11, assigned_recruiter),
                description = COALESCE($12, description),
                duties = COALESCE($13, duties),
                qualifications = COALESCE($14, qualifications),
                benefits = COALESCE($15, benefits),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.location.as_deref())
        .bind(patch.pay_rate_from)
        .bind(patch.pay_rate_to)
        .bind(patch.pay_type.map(|p| p.as_str()))
        .bind(patch.openings)
        .bind(patch.visibility.map(|v| v.as_str()))
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(patch.recipients.as_deref())
        .bind(patch.assigned_recruiter)
        .bind(patch.description.as_deref())
        .bind(patch.duties.as_deref())
        .bind(patch.qualifications.as_deref())
        .bind(patch.benefits.as_deref())
        .fetch_optional(pool)
        .await
    }

    pub async fn set_stage(
        pool: &Pool<Postgres>,
        id: i32,
        stage: &str,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Setting job id={} stage={}", id, stage);

        sqlx::query_as::<_, JobRow>(
            "UPDATE jobs SET stage = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(stage)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &Pool<Postgres>, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
