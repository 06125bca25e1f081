use std::fmt;

use crate::access::identity::Role;
use crate::pipeline::stage::{JobStage, SubmissionStage};

/// Optional data accompanying a transition request.
#[derive(Debug, Default, Clone)]
pub struct TransitionPayload {
    /// Required (non-blank) when declining; ignored otherwise.
    pub feedback: Option<String>,
    /// Optional interview/offer date. Must be non-blank when provided.
    pub scheduled_date: Option<String>,
}

/// Errors produced by the pure pipeline core. No mutation has occurred when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Target stage is not reachable from the current stage.
    InvalidTransition {
        from: SubmissionStage,
        to: SubmissionStage,
    },
    /// Target job stage is not reachable from the current job stage.
    InvalidJobTransition { from: JobStage, to: JobStage },
    /// Required accompanying data is missing or malformed.
    Validation(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidTransition { from, to } => {
                write!(f, "cannot move submission from '{from}' to '{to}'")
            }
            PipelineError::InvalidJobTransition { from, to } => {
                write!(f, "cannot move job from '{from}' to '{to}'")
            }
            PipelineError::Validation(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

/// The writes to apply to a submission row once a transition validates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub status: SubmissionStage,
    /// `Some(value)` overwrites the stored feedback (`Some(None)` clears
    /// it); `None` leaves whatever is stored untouched.
    pub feedback: Option<Option<String>>,
    /// New schedule entry, if the caller provided one. Existing schedule
    /// data is never cleared, so declined submissions keep it for audit.
    pub scheduled_date: Option<String>,
    /// True when the owning job may need promoting to in-progress. The
    /// caller still has to check whether this submission is the first of
    /// its job to be accepted; see [`should_activate_job`].
    pub may_activate_job: bool,
}

/// Validate a requested stage transition and compute the resulting writes.
///
/// Pure: performs no I/O and touches nothing. Callers persist the returned
/// plan and then apply the job-activation side effect best-effort.
pub fn plan_transition(
    current: SubmissionStage,
    target: SubmissionStage,
    payload: &TransitionPayload,
) -> Result<TransitionPlan, PipelineError> {
    if !current.can_transition_to(target) {
        return Err(PipelineError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    if target == SubmissionStage::Declined {
        let feedback = payload.feedback.as_deref().map(str::trim).unwrap_or("");
        if feedback.is_empty() {
            return Err(PipelineError::Validation(
                "declining a submission requires feedback".to_string(),
            ));
        }
        return Ok(TransitionPlan {
            status: SubmissionStage::Declined,
            feedback: Some(Some(feedback.to_string())),
            scheduled_date: None,
            may_activate_job: false,
        });
    }

    // Reassignment: the one move out of declined, back to the top of the
    // pipeline with a clean slate.
    if current == SubmissionStage::Declined {
        return Ok(TransitionPlan {
            status: SubmissionStage::Submitted,
            feedback: Some(None),
            scheduled_date: None,
            may_activate_job: false,
        });
    }

    let scheduled_date = match payload.scheduled_date.as_deref().map(str::trim) {
        Some("") => {
            return Err(PipelineError::Validation(
                "scheduled date must not be blank when provided".to_string(),
            ))
        }
        Some(date) => Some(date.to_string()),
        None => None,
    };

    Ok(TransitionPlan {
        status: target,
        feedback: None,
        scheduled_date,
        may_activate_job: target == SubmissionStage::Accepted,
    })
}

/// Validate an owner-issued job lifecycle change (publish, close, reopen)
/// or the engine's own hiring -> in-progress promotion.
pub fn plan_job_transition(current: JobStage, target: JobStage) -> Result<JobStage, PipelineError> {
    if current.can_transition_to(target) {
        Ok(target)
    } else {
        Err(PipelineError::InvalidJobTransition {
            from: current,
            to: target,
        })
    }
}

/// Whether accepting a submission should also mark its job in-progress:
/// only when the job is still open and no sibling submission is already at
/// or past accepted. This keeps the side effect to exactly one promotion
/// per job.
pub fn should_activate_job(job_stage: JobStage, sibling_stages: &[SubmissionStage]) -> bool {
    job_stage == JobStage::Hiring
        && !sibling_stages.iter().any(SubmissionStage::is_at_or_past_accepted)
}

/// The ordered transitions `role` may issue from `stage`. Companies and
/// agencies drive the pipeline; loopers only view, never mutate.
pub fn legal_actions(role: Role, stage: SubmissionStage) -> &'static [SubmissionStage] {
    match role {
        Role::Company | Role::AgencyAdmin | Role::AgencyRecruiter => stage.allowed_targets(),
        Role::Looper => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubmissionStage::*;

    fn feedback(text: &str) -> TransitionPayload {
        TransitionPayload {
            feedback: Some(text.to_string()),
            scheduled_date: None,
        }
    }

    #[test]
    fn transition_succeeds_iff_target_is_in_the_table() {
        for from in SubmissionStage::ALL {
            for to in SubmissionStage::ALL {
                let result = plan_transition(from, to, &feedback("not a fit"));
                if from.can_transition_to(to) {
                    assert!(result.is_ok(), "{from} -> {to} should be legal");
                } else {
                    assert_eq!(
                        result,
                        Err(PipelineError::InvalidTransition { from, to }),
                        "{from} -> {to} should be rejected"
                    );
                }
            }
        }
    }

    #[test]
    fn decline_requires_non_blank_feedback() {
        for payload in [
            TransitionPayload::default(),
            feedback(""),
            feedback("   "),
            feedback("\t\n"),
        ] {
            let result = plan_transition(Submitted, Declined, &payload);
            assert!(matches!(result, Err(PipelineError::Validation(_))));
        }

        let plan = plan_transition(Submitted, Declined, &feedback("  too junior  ")).unwrap();
        assert_eq!(plan.status, Declined);
        assert_eq!(plan.feedback, Some(Some("too junior".to_string())));
    }

    #[test]
    fn decline_keeps_existing_schedule_data() {
        let payload = TransitionPayload {
            feedback: Some("position filled".to_string()),
            scheduled_date: Some("2025-03-01".to_string()),
        };
        let plan = plan_transition(InterviewPhone, Declined, &payload).unwrap();
        // The stored schedule is left untouched for audit.
        assert_eq!(plan.scheduled_date, None);
    }

    #[test]
    fn reassignment_clears_feedback() {
        let plan = plan_transition(Declined, Submitted, &TransitionPayload::default()).unwrap();
        assert_eq!(plan.status, Submitted);
        assert_eq!(plan.feedback, Some(None));
        assert!(!plan.may_activate_job);
    }

    #[test]
    fn scheduled_date_is_optional_but_not_blank() {
        let plan = plan_transition(Accepted, InterviewPhone, &TransitionPayload::default()).unwrap();
        assert_eq!(plan.scheduled_date, None);

        let with_date = TransitionPayload {
            feedback: None,
            scheduled_date: Some("2025-02-14".to_string()),
        };
        let plan = plan_transition(Accepted, InterviewPhone, &with_date).unwrap();
        assert_eq!(plan.scheduled_date, Some("2025-02-14".to_string()));

        let blank = TransitionPayload {
            feedback: None,
            scheduled_date: Some("  ".to_string()),
        };
        assert!(matches!(
            plan_transition(Accepted, InterviewPhone, &blank),
            Err(PipelineError::Validation(_))
        ));
    }

    #[test]
    fn only_acceptance_flags_job_activation() {
        let plan = plan_transition(Submitted, Accepted, &TransitionPayload::default()).unwrap();
        assert!(plan.may_activate_job);

        let plan = plan_transition(Accepted, InterviewPhone, &TransitionPayload::default()).unwrap();
        assert!(!plan.may_activate_job);
        let plan = plan_transition(OfferAccepted, Placed, &TransitionPayload::default()).unwrap();
        assert!(!plan.may_activate_job);
    }

    #[test]
    fn transition_to_current_stage_is_rejected() {
        for stage in SubmissionStage::ALL {
            assert!(matches!(
                plan_transition(stage, stage, &feedback("x")),
                Err(PipelineError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn job_activates_only_for_the_first_accepted_submission() {
        assert!(should_activate_job(JobStage::Hiring, &[]));
        assert!(should_activate_job(JobStage::Hiring, &[Submitted, Declined]));
        assert!(!should_activate_job(JobStage::Hiring, &[Accepted]));
        assert!(!should_activate_job(JobStage::Hiring, &[Submitted, Placed]));
        assert!(!should_activate_job(JobStage::Hiring, &[InterviewOnsite]));
        // Already promoted (or never open): nothing to do.
        assert!(!should_activate_job(JobStage::InProgress, &[]));
        assert!(!should_activate_job(JobStage::Past, &[]));
        assert!(!should_activate_job(JobStage::Draft, &[]));
    }

    #[test]
    fn close_and_reopen_are_legal_job_moves() {
        assert_eq!(
            plan_job_transition(JobStage::Hiring, JobStage::Past),
            Ok(JobStage::Past)
        );
        assert_eq!(
            plan_job_transition(JobStage::InProgress, JobStage::Past),
            Ok(JobStage::Past)
        );
        assert_eq!(
            plan_job_transition(JobStage::Past, JobStage::Hiring),
            Ok(JobStage::Hiring)
        );
        assert!(matches!(
            plan_job_transition(JobStage::Past, JobStage::InProgress),
            Err(PipelineError::InvalidJobTransition { .. })
        ));
        assert!(matches!(
            plan_job_transition(JobStage::Draft, JobStage::Past),
            Err(PipelineError::InvalidJobTransition { .. })
        ));
    }

    #[test]
    fn loopers_have_no_legal_actions() {
        for stage in SubmissionStage::ALL {
            assert!(legal_actions(Role::Looper, stage).is_empty());
        }
        assert_eq!(
            legal_actions(Role::Company, Submitted),
            &[Accepted, Declined]
        );
        assert_eq!(
            legal_actions(Role::AgencyRecruiter, Declined),
            &[Submitted]
        );
    }
}
