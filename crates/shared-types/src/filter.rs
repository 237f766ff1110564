use serde::{Deserialize, Serialize};

use crate::case::{Case, Urgency};
use crate::status::CaseStatus;

/// Stateless projection over a case list. Unset fields match everything;
/// `search` is a case-insensitive substring match on the patient name or
/// treatment type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    pub urgency: Option<Urgency>,
    pub department: Option<String>,
    pub nationality: Option<String>,
    pub search: Option<String>,
}

impl CaseFilter {
    pub fn matches(&self, case: &Case) -> bool {
        if let Some(status) = self.status {
            if case.status != status {
                return false;
            }
        }
        if let Some(urgency) = self.urgency {
            if case.urgency != urgency {
                return false;
            }
        }
        if let Some(department) = &self.department {
            if case.department.as_deref() != Some(department.as_str()) {
                return false;
            }
        }
        if let Some(nationality) = &self.nationality {
            if case.nationality != *nationality {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = case.patient_name.to_lowercase().contains(&needle)
                || case.treatment_type.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}
