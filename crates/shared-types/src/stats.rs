use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::case::Case;
use crate::status::CaseStatus;

/// Aggregates for the dashboard collaborators. Revenue figures count
/// completed cases only, at the confirmed amount when one exists and the
/// estimate otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub total_revenue: f64,
    /// Revenue from cases completed in the current calendar month.
    pub monthly_revenue: f64,
    /// Mean settled amount per completed case.
    pub average_amount: f64,
    /// Completed cases as a percentage of all cases.
    pub completion_rate: f64,
}

/// Pure aggregation over a case list; `now` anchors the monthly window.
pub fn case_stats_at(cases: &[Case], now: DateTime<Utc>) -> CaseStats {
    let total = cases.len();

    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    for case in cases {
        *by_status.entry(case.status.as_str().to_string()).or_insert(0) += 1;
    }

    let completed: Vec<&Case> = cases
        .iter()
        .filter(|c| c.status == CaseStatus::Completed)
        .collect();

    let total_revenue: f64 = completed.iter().map(|c| c.net_amount()).sum();

    let monthly_revenue: f64 = completed
        .iter()
        .filter(|c| c.updated_at.month() == now.month() && c.updated_at.year() == now.year())
        .map(|c| c.net_amount())
        .sum();

    let average_amount = if completed.is_empty() {
        0.0
    } else {
        total_revenue / completed.len() as f64
    };

    let completion_rate = if total > 0 {
        completed.len() as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    CaseStats {
        total,
        by_status,
        total_revenue,
        monthly_revenue,
        average_amount,
        completion_rate,
    }
}

/// [`case_stats_at`] anchored to the current time.
pub fn case_stats(cases: &[Case]) -> CaseStats {
    case_stats_at(cases, Utc::now())
}
