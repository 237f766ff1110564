use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a referral case.
///
/// Older storage blobs used `information_needed` and `under_review` for the
/// additional-documents state; both are accepted on deserialization and map
/// to [`CaseStatus::AdditionalInfoRequired`]. The aliases are never written
/// back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    New,
    Pending,
    Reviewing,
    #[serde(alias = "information_needed", alias = "under_review")]
    AdditionalInfoRequired,
    Accepted,
    Rejected,
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

/// All statuses, in workflow order.
pub const CASE_STATUSES: &[CaseStatus] = &[
    CaseStatus::New,
    CaseStatus::Pending,
    CaseStatus::Reviewing,
    CaseStatus::AdditionalInfoRequired,
    CaseStatus::Accepted,
    CaseStatus::Rejected,
    CaseStatus::Scheduled,
    CaseStatus::Confirmed,
    CaseStatus::Completed,
    CaseStatus::Cancelled,
];

impl CaseStatus {
    /// Stable snake_case name, matching the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::New => "new",
            CaseStatus::Pending => "pending",
            CaseStatus::Reviewing => "reviewing",
            CaseStatus::AdditionalInfoRequired => "additional_info_required",
            CaseStatus::Accepted => "accepted",
            CaseStatus::Rejected => "rejected",
            CaseStatus::Scheduled => "scheduled",
            CaseStatus::Confirmed => "confirmed",
            CaseStatus::Completed => "completed",
            CaseStatus::Cancelled => "cancelled",
        }
    }

    /// Legal next statuses from this one. Terminal states return the
    /// empty slice.
    pub fn legal_transitions(&self) -> &'static [CaseStatus] {
        use CaseStatus::*;
        match self {
            New => &[Pending, Reviewing, AdditionalInfoRequired, Rejected, Cancelled],
            Pending => &[Reviewing, AdditionalInfoRequired, Rejected, Cancelled],
            Reviewing => &[Accepted, Rejected, AdditionalInfoRequired, Cancelled],
            AdditionalInfoRequired => &[Reviewing, Rejected, Cancelled],
            Accepted => &[Scheduled, Cancelled],
            Scheduled => &[Confirmed, Cancelled],
            Confirmed => &[Completed, Cancelled],
            Rejected | Completed | Cancelled => &[],
        }
    }

    /// Whether `current -> next` is a listed edge. Self-transitions are not
    /// listed anywhere, so resubmitting the same status is rejected here;
    /// callers that want "unchanged status" to be a no-op must check for
    /// equality before asking.
    pub fn can_transition_to(&self, next: CaseStatus) -> bool {
        self.legal_transitions().contains(&next)
    }

    /// Terminal statuses have no legal outgoing transition.
    pub fn is_terminal(&self) -> bool {
        self.legal_transitions().is_empty()
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
