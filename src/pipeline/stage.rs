use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical pipeline position of a submission.
///
/// Single linear happy path with one side branch: any non-terminal stage may
/// move to `Declined`, and a declined submission may be reassigned back to
/// `Submitted`. `Placed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStage {
    Submitted,
    Accepted,
    InterviewPhone,
    InterviewOnsite,
    OfferSent,
    OfferAccepted,
    Placed,
    Declined,
}

impl SubmissionStage {
    pub const ALL: [SubmissionStage; 8] = [
        SubmissionStage::Submitted,
        SubmissionStage::Accepted,
        SubmissionStage::InterviewPhone,
        SubmissionStage::InterviewOnsite,
        SubmissionStage::OfferSent,
        SubmissionStage::OfferAccepted,
        SubmissionStage::Placed,
        SubmissionStage::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStage::Submitted => "submitted",
            SubmissionStage::Accepted => "accepted",
            SubmissionStage::InterviewPhone => "interview_phone",
            SubmissionStage::InterviewOnsite => "interview_onsite",
            SubmissionStage::OfferSent => "offer_sent",
            SubmissionStage::OfferAccepted => "offer_accepted",
            SubmissionStage::Placed => "placed",
            SubmissionStage::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(SubmissionStage::Submitted),
            "accepted" => Some(SubmissionStage::Accepted),
            "interview_phone" => Some(SubmissionStage::InterviewPhone),
            "interview_onsite" => Some(SubmissionStage::InterviewOnsite),
            "offer_sent" => Some(SubmissionStage::OfferSent),
            "offer_accepted" => Some(SubmissionStage::OfferAccepted),
            "placed" => Some(SubmissionStage::Placed),
            "declined" => Some(SubmissionStage::Declined),
            _ => None,
        }
    }

    /// Stages reachable from `self`. The transition table is strictly
    /// forward/branch; self-loops are never legal.
    pub fn allowed_targets(&self) -> &'static [SubmissionStage] {
        use SubmissionStage::*;
        match self {
            Submitted => &[Accepted, Declined],
            Accepted => &[InterviewPhone, Declined],
            InterviewPhone => &[InterviewOnsite, Declined],
            InterviewOnsite => &[OfferSent, Declined],
            OfferSent => &[OfferAccepted, Declined],
            OfferAccepted => &[Placed, Declined],
            Placed => &[],
            Declined => &[Submitted],
        }
    }

    pub fn can_transition_to(&self, target: SubmissionStage) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// True for any stage at or past `Accepted` on the happy path. Used to
    /// decide whether a job already has an active candidate.
    pub fn is_at_or_past_accepted(&self) -> bool {
        !matches!(self, SubmissionStage::Submitted | SubmissionStage::Declined)
    }

    /// Display grouping used by stage tabs (interview and offer stages
    /// collapse into one badge each).
    pub fn badge(&self) -> StageBadge {
        match self {
            SubmissionStage::Submitted => StageBadge::Submitted,
            SubmissionStage::Accepted => StageBadge::Accepted,
            SubmissionStage::InterviewPhone | SubmissionStage::InterviewOnsite => {
                StageBadge::Interview
            }
            SubmissionStage::OfferSent | SubmissionStage::OfferAccepted => StageBadge::Offer,
            SubmissionStage::Placed => StageBadge::Placed,
            SubmissionStage::Declined => StageBadge::Declined,
        }
    }

    /// Human-readable status text shown next to the badge.
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStage::Submitted => "Pending Response",
            SubmissionStage::Accepted => "Availability Requested",
            SubmissionStage::InterviewPhone => "Phone Interview",
            SubmissionStage::InterviewOnsite => "In-Person Interview",
            SubmissionStage::OfferSent => "Offer Sent",
            SubmissionStage::OfferAccepted => "Offer Accepted",
            SubmissionStage::Placed => "Placed",
            SubmissionStage::Declined => "Declined",
        }
    }
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse display category for a submission stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageBadge {
    Submitted,
    Accepted,
    Interview,
    Offer,
    Placed,
    Declined,
}

impl StageBadge {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageBadge::Submitted => "Submitted",
            StageBadge::Accepted => "Accepted",
            StageBadge::Interview => "Interview",
            StageBadge::Offer => "Offer",
            StageBadge::Placed => "Placed",
            StageBadge::Declined => "Declined",
        }
    }
}

/// Lifecycle position of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStage {
    #[serde(rename = "draft")]
    Draft,
    #[serde(rename = "hiring")]
    Hiring,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "past")]
    Past,
}

impl JobStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Draft => "draft",
            JobStage::Hiring => "hiring",
            JobStage::InProgress => "in-progress",
            JobStage::Past => "past",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(JobStage::Draft),
            "hiring" => Some(JobStage::Hiring),
            "in-progress" => Some(JobStage::InProgress),
            "past" => Some(JobStage::Past),
            _ => None,
        }
    }

    /// Legal job lifecycle moves: publish a draft, close an open or active
    /// job, reopen a closed one. `Hiring -> InProgress` is here because the
    /// pipeline engine promotes jobs through it when a submission is
    /// accepted; owners do not issue it directly.
    pub fn allowed_targets(&self) -> &'static [JobStage] {
        use JobStage::*;
        match self {
            Draft => &[Hiring],
            Hiring => &[InProgress, Past],
            InProgress => &[Past],
            Past => &[Hiring],
        }
    }

    pub fn can_transition_to(&self, target: JobStage) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Draft and closed jobs may be deleted by their owner; open and active
    /// jobs may not.
    pub fn is_deletable(&self) -> bool {
        matches!(self, JobStage::Draft | JobStage::Past)
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_stage_string_round_trip() {
        for stage in SubmissionStage::ALL {
            assert_eq!(SubmissionStage::parse(stage.as_str()), Some(stage));
        }
        assert_eq!(SubmissionStage::parse("pending"), None);
        assert_eq!(SubmissionStage::parse(""), None);
    }

    #[test]
    fn every_non_terminal_stage_can_decline() {
        for stage in SubmissionStage::ALL {
            let can_decline = stage.can_transition_to(SubmissionStage::Declined);
            match stage {
                SubmissionStage::Placed | SubmissionStage::Declined => assert!(!can_decline),
                _ => assert!(can_decline, "{stage} should be declinable"),
            }
        }
    }

    #[test]
    fn placed_is_terminal() {
        assert!(SubmissionStage::Placed.allowed_targets().is_empty());
    }

    #[test]
    fn declined_only_reassigns_to_submitted() {
        assert_eq!(
            SubmissionStage::Declined.allowed_targets(),
            &[SubmissionStage::Submitted]
        );
    }

    #[test]
    fn self_loops_are_never_legal() {
        for stage in SubmissionStage::ALL {
            assert!(!stage.can_transition_to(stage), "{stage} -> {stage} must be rejected");
        }
    }

    #[test]
    fn happy_path_is_linear() {
        use SubmissionStage::*;
        let path = [Submitted, Accepted, InterviewPhone, InterviewOnsite, OfferSent, OfferAccepted, Placed];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]));
        }
        // No stage skipping.
        assert!(!Submitted.can_transition_to(InterviewPhone));
        assert!(!Accepted.can_transition_to(OfferSent));
        assert!(!InterviewPhone.can_transition_to(Placed));
    }

    #[test]
    fn badges_group_interview_and_offer_stages() {
        assert_eq!(SubmissionStage::InterviewPhone.badge(), StageBadge::Interview);
        assert_eq!(SubmissionStage::InterviewOnsite.badge(), StageBadge::Interview);
        assert_eq!(SubmissionStage::OfferSent.badge(), StageBadge::Offer);
        assert_eq!(SubmissionStage::OfferAccepted.badge(), StageBadge::Offer);
        assert_eq!(SubmissionStage::Placed.badge(), StageBadge::Placed);
    }

    #[test]
    fn labels_are_total() {
        for stage in SubmissionStage::ALL {
            assert!(!stage.label().is_empty());
        }
    }

    #[test]
    fn job_stage_lifecycle() {
        assert!(JobStage::Draft.can_transition_to(JobStage::Hiring));
        assert!(JobStage::Hiring.can_transition_to(JobStage::Past));
        assert!(JobStage::InProgress.can_transition_to(JobStage::Past));
        assert!(JobStage::Past.can_transition_to(JobStage::Hiring));
        // Nothing moves back into draft, and closed jobs never jump straight
        // to active.
        assert!(!JobStage::Hiring.can_transition_to(JobStage::Draft));
        assert!(!JobStage::Past.can_transition_to(JobStage::InProgress));
        assert!(!JobStage::Draft.can_transition_to(JobStage::Past));
    }

    #[test]
    fn only_draft_and_past_jobs_are_deletable() {
        assert!(JobStage::Draft.is_deletable());
        assert!(JobStage::Past.is_deletable());
        assert!(!JobStage::Hiring.is_deletable());
        assert!(!JobStage::InProgress.is_deletable());
    }
}
