use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::case::{Case, Urgency};
use crate::status::CaseStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseEventKind {
    Created,
    StatusChanged,
    Urgent,
}

/// Fact emitted by the workflow service after a successful mutation.
///
/// Notification and chat collaborators consume these; they carry just
/// enough to render a message and link back to the case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseEvent {
    pub kind: CaseEventKind,
    pub case_id: Uuid,
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_status: Option<CaseStatus>,
    pub new_status: CaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CaseEvent {
    pub fn created(case: &Case) -> Self {
        Self {
            kind: CaseEventKind::Created,
            case_id: case.id,
            patient_name: case.patient_name.clone(),
            old_status: None,
            new_status: case.status,
            reason: None,
        }
    }

    pub fn status_changed(case: &Case, old_status: CaseStatus, reason: Option<String>) -> Self {
        Self {
            kind: CaseEventKind::StatusChanged,
            case_id: case.id,
            patient_name: case.patient_name.clone(),
            old_status: Some(old_status),
            new_status: case.status,
            reason,
        }
    }

    /// Emitted alongside `created` when the referral is flagged high urgency.
    pub fn urgent(case: &Case) -> Option<Self> {
        (case.urgency == Urgency::High).then(|| Self {
            kind: CaseEventKind::Urgent,
            case_id: case.id,
            patient_name: case.patient_name.clone(),
            old_status: None,
            new_status: case.status,
            reason: None,
        })
    }
}
