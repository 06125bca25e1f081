use serde::Serialize;

use crate::access::identity::{Identity, Role};
use crate::db::models::{JobRow, SubmissionRow};
use crate::pipeline::engine;
use crate::pipeline::stage::{JobStage, SubmissionStage};

/// Whether `job` appears in the caller's worklist.
///
/// Companies see their own jobs, agencies see their assigned jobs plus
/// public postings (never another company's drafts), loopers see open
/// public jobs plus anything they were explicitly invited to. A missing
/// or unknown role sees nothing.
pub fn job_visible(identity: &Identity, job: &JobRow) -> bool {
    let Some(role) = identity.role else {
        return false;
    };
    let stage = JobStage::parse(&job.stage);

    match role {
        Role::Company => identity.company_id == Some(job.company_id),
        Role::AgencyAdmin | Role::AgencyRecruiter => {
            let assigned = identity.agency_id.is_some() && job.agency_id == identity.agency_id;
            let public = job.visibility == "public";
            let stage_listed = matches!(
                stage,
                Some(JobStage::Hiring | JobStage::InProgress | JobStage::Past)
            );
            (assigned || public) && stage_listed
        }
        Role::Looper => {
            let open_public = job.visibility == "public" && stage == Some(JobStage::Hiring);
            let invited = match identity.user_id {
                Some(user_id) => job
                    .recipients
                    .as_deref()
                    .is_some_and(|recipients| recipients.contains(&user_id)),
                None => false,
            };
            open_public || invited
        }
    }
}

/// Whether the caller owns the pipeline for `job` and may drive its
/// submissions: the owning company, or the assigned agency.
pub fn can_manage_job(identity: &Identity, job: &JobRow) -> bool {
    match identity.role {
        Some(Role::Company) => identity.company_id == Some(job.company_id),
        Some(Role::AgencyAdmin | Role::AgencyRecruiter) => {
            identity.agency_id.is_some() && job.agency_id == identity.agency_id
        }
        Some(Role::Looper) | None => false,
    }
}

/// The caller's visible subset of `jobs`, optionally narrowed to one stage.
pub fn visible_jobs<'a>(
    identity: &Identity,
    jobs: &'a [JobRow],
    stage_filter: Option<JobStage>,
) -> Vec<&'a JobRow> {
    jobs.iter()
        .filter(|job| job_visible(identity, job))
        .filter(|job| match stage_filter {
            Some(filter) => JobStage::parse(&job.stage) == Some(filter),
            None => true,
        })
        .collect()
}

/// Whether `sub` appears in the caller's submission worklist. The owning
/// job gates everything: companies see submissions against their jobs,
/// agencies see submissions they created or submissions against their
/// assigned jobs, loopers only ever see their own.
pub fn submission_visible(identity: &Identity, sub: &SubmissionRow, job: &JobRow) -> bool {
    let Some(role) = identity.role else {
        return false;
    };
    match role {
        Role::Company => identity.company_id == Some(job.company_id),
        Role::AgencyAdmin | Role::AgencyRecruiter => {
            if !job_visible(identity, job) {
                return false;
            }
            let job_assigned = identity.agency_id.is_some() && job.agency_id == identity.agency_id;
            let own_submission = identity.agency_id.is_some() && sub.agency_id == identity.agency_id;
            job_assigned || own_submission
        }
        Role::Looper => identity.user_id.is_some() && sub.looper_id == identity.user_id,
    }
}

/// The caller's visible subset of `submissions`, optionally restricted to
/// one job. The role filter still applies with a `job_id`: a looper asking
/// for another looper's job sees their own subset, not an error.
pub fn visible_submissions<'a>(
    identity: &Identity,
    submissions: &'a [SubmissionRow],
    jobs: &[JobRow],
    job_id: Option<i32>,
) -> Vec<&'a SubmissionRow> {
    submissions
        .iter()
        .filter(|sub| job_id.map_or(true, |id| sub.job_id == id))
        .filter(|sub| {
            jobs.iter()
                .find(|job| job.id == sub.job_id)
                .is_some_and(|job| submission_visible(identity, sub, job))
        })
        .collect()
}

/// A job row annotated with derived counters. Counts are always computed
/// from the submission set on read, never trusted from the job record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    #[serde(flatten)]
    pub job: JobRow,
    pub submissions_count: usize,
    pub placements_count: usize,
}

pub fn annotate_job(job: &JobRow, submissions: &[SubmissionRow]) -> JobSummary {
    let mut submissions_count = 0;
    let mut placements_count = 0;
    for sub in submissions.iter().filter(|s| s.job_id == job.id) {
        submissions_count += 1;
        if SubmissionStage::parse(&sub.status) == Some(SubmissionStage::Placed) {
            placements_count += 1;
        }
    }
    JobSummary {
        job: job.clone(),
        submissions_count,
        placements_count,
    }
}

pub fn annotate_jobs(jobs: Vec<&JobRow>, submissions: &[SubmissionRow]) -> Vec<JobSummary> {
    jobs.into_iter()
        .map(|job| annotate_job(job, submissions))
        .collect()
}

/// A submission row annotated with its display category and the caller's
/// legal action set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    #[serde(flatten)]
    pub submission: SubmissionRow,
    /// Coarse display category; echoes the raw status string when it is
    /// not a canonical stage.
    pub badge: String,
    pub stage_label: String,
    pub legal_actions: Vec<SubmissionStage>,
}

pub fn annotate_submission(identity: &Identity, sub: &SubmissionRow) -> SubmissionView {
    let stage = SubmissionStage::parse(&sub.status);
    let badge = stage
        .map(|s| s.badge().as_str().to_string())
        .unwrap_or_else(|| sub.status.clone());
    let stage_label = stage
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| sub.status.clone());
    let legal_actions = match (identity.role, stage) {
        (Some(role), Some(stage)) => engine::legal_actions(role, stage).to_vec(),
        _ => Vec::new(),
    };
    SubmissionView {
        submission: sub.clone(),
        badge,
        stage_label,
        legal_actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn job(id: i32, company_id: i32, stage: &str, visibility: &str) -> JobRow {
        JobRow {
            id,
            company_id,
            agency_id: None,
            assigned_recruiter: None,
            title: format!("Job {id}"),
            location: Some("Remote".to_string()),
            pay_rate_from: 40.0,
            pay_rate_to: 60.0,
            pay_type: "hourly".to_string(),
            openings: 2,
            stage: stage.to_string(),
            visibility: visibility.to_string(),
            priority: None,
            recipients: None,
            description: None,
            duties: None,
            qualifications: None,
            benefits: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn submission(id: i32, job_id: i32, status: &str) -> SubmissionRow {
        SubmissionRow {
            id,
            job_id,
            looper_id: None,
            looper_name: "bob".to_string(),
            agency_id: None,
            candidate_name: format!("Candidate {id}"),
            phone: "555-0100".to_string(),
            email: "candidate@example.com".to_string(),
            target_pay: None,
            resume_url: None,
            resume_name: None,
            notes: None,
            status: status.to_string(),
            feedback: None,
            scheduled_date: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn company_only_sees_its_own_jobs() {
        let jobs = vec![
            job(1, 10, "hiring", "public"),
            job(2, 11, "hiring", "public"),
            job(3, 10, "draft", "private"),
        ];
        let visible = visible_jobs(&Identity::company(10), &jobs, None);
        let ids: Vec<i32> = visible.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn company_stage_filter_narrows_the_worklist() {
        let jobs = vec![
            job(1, 10, "hiring", "public"),
            job(2, 10, "in-progress", "public"),
            job(3, 10, "past", "public"),
        ];
        let visible = visible_jobs(&Identity::company(10), &jobs, Some(JobStage::Past));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 3);
    }

    #[test]
    fn agency_sees_assigned_and_public_jobs_but_never_drafts() {
        let mut assigned = job(1, 10, "hiring", "private");
        assigned.agency_id = Some(5);
        let mut assigned_draft = job(2, 10, "draft", "private");
        assigned_draft.agency_id = Some(5);
        let jobs = vec![
            assigned,
            assigned_draft,
            job(3, 11, "hiring", "public"),
            job(4, 11, "draft", "public"),
            job(5, 11, "hiring", "private"),
        ];
        let identity = Identity::agency(Role::AgencyRecruiter, 5);
        let ids: Vec<i32> = visible_jobs(&identity, &jobs, None)
            .iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn looper_sees_open_public_jobs_and_invitations_only() {
        let mut invited = job(3, 11, "hiring", "private");
        invited.recipients = Some(vec![42, 77]);
        let mut not_invited = job(4, 11, "hiring", "private");
        not_invited.recipients = Some(vec![77]);
        let jobs = vec![
            job(1, 10, "hiring", "public"),
            job(2, 10, "in-progress", "public"),
            invited,
            not_invited,
            job(5, 10, "hiring", "private"),
        ];
        let ids: Vec<i32> = visible_jobs(&Identity::looper(42), &jobs, None)
            .iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn agency_drafts_stay_invisible_even_to_their_manager() {
        // Management rights do not widen the visible set, which is why the
        // job service never lets an agency create a draft in the first
        // place.
        let mut draft = job(1, 10, "draft", "private");
        draft.agency_id = Some(5);
        let identity = Identity::agency(Role::AgencyAdmin, 5);
        assert!(can_manage_job(&identity, &draft));
        assert!(!job_visible(&identity, &draft));
    }

    #[test]
    fn missing_or_unknown_role_fails_closed() {
        let jobs = vec![job(1, 10, "hiring", "public")];
        let subs = vec![submission(1, 1, "submitted")];
        let anonymous = Identity::default();
        assert!(visible_jobs(&anonymous, &jobs, None).is_empty());
        assert!(visible_submissions(&anonymous, &subs, &jobs, None).is_empty());
    }

    #[test]
    fn company_sees_submissions_against_its_jobs_only() {
        let jobs = vec![job(1, 10, "hiring", "public"), job(2, 11, "hiring", "public")];
        let subs = vec![
            submission(1, 1, "submitted"),
            submission(2, 2, "submitted"),
            submission(3, 1, "accepted"),
        ];
        let ids: Vec<i32> = visible_submissions(&Identity::company(10), &subs, &jobs, None)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn agency_sees_own_submissions_and_assigned_job_submissions() {
        let mut assigned = job(1, 10, "hiring", "private");
        assigned.agency_id = Some(5);
        let public = job(2, 11, "hiring", "public");
        let jobs = vec![assigned, public];

        let mut own_sub = submission(1, 2, "submitted");
        own_sub.agency_id = Some(5);
        let mut foreign_sub = submission(2, 2, "submitted");
        foreign_sub.agency_id = Some(6);
        let subs = vec![own_sub, foreign_sub, submission(3, 1, "accepted")];

        let identity = Identity::agency(Role::AgencyAdmin, 5);
        let ids: Vec<i32> = visible_submissions(&identity, &subs, &jobs, None)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn looper_sees_only_their_own_submissions_even_with_job_filter() {
        let jobs = vec![job(1, 10, "hiring", "public")];
        let mut mine = submission(1, 1, "submitted");
        mine.looper_id = Some(42);
        let mut theirs = submission(2, 1, "submitted");
        theirs.looper_id = Some(77);
        let subs = vec![mine, theirs];

        let visible = visible_submissions(&Identity::looper(42), &subs, &jobs, Some(1));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn job_filter_restricts_results() {
        let jobs = vec![job(1, 10, "hiring", "public"), job(2, 10, "hiring", "public")];
        let subs = vec![submission(1, 1, "submitted"), submission(2, 2, "submitted")];
        let visible = visible_submissions(&Identity::company(10), &subs, &jobs, Some(2));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }

    #[test]
    fn counters_are_derived_from_the_submission_set() {
        let j = job(1, 10, "in-progress", "public");
        let subs = vec![
            submission(1, 1, "submitted"),
            submission(2, 1, "placed"),
            submission(3, 1, "placed"),
            submission(4, 2, "placed"),
        ];
        let summary = annotate_job(&j, &subs);
        assert_eq!(summary.submissions_count, 3);
        assert_eq!(summary.placements_count, 2);
    }

    #[test]
    fn annotation_gates_actions_by_role() {
        let sub = submission(1, 1, "submitted");
        let company_view = annotate_submission(&Identity::company(10), &sub);
        assert_eq!(company_view.badge, "Submitted");
        assert_eq!(company_view.stage_label, "Pending Response");
        assert_eq!(
            company_view.legal_actions,
            vec![SubmissionStage::Accepted, SubmissionStage::Declined]
        );

        let looper_view = annotate_submission(&Identity::looper(42), &sub);
        assert!(looper_view.legal_actions.is_empty());
    }

    #[test]
    fn annotation_echoes_unrecognized_status_strings() {
        let sub = submission(1, 1, "pending");
        let view = annotate_submission(&Identity::company(10), &sub);
        assert_eq!(view.badge, "pending");
        assert_eq!(view.stage_label, "pending");
        assert!(view.legal_actions.is_empty());
    }
}
