use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

use crate::status::CaseStatus;

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Latin letters, hiragana, katakana, common CJK ideographs, whitespace.
pub static PATIENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z\u{3040}-\u{309F}\u{30A0}-\u{30FF}\u{4E00}-\u{9FAF}\s]+$").unwrap()
});

/// Passport numbers are uppercase alphanumeric only.
pub static PASSPORT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9]+$").unwrap());

/// Digits plus the usual phone punctuation.
pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\+\-\(\)\s\d]*$").unwrap());

/// Chat handles (WeChat ids): alphanumeric, underscore, hyphen.
pub static CHAT_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]*$").unwrap());

/// Upper bound applied to monetary fields to guard against garbage input.
pub const MAX_AMOUNT: f64 = 100_000_000.0;

/// Hard cap applied by [`sanitize_text`].
pub const MAX_TEXT_LEN: usize = 10_000;

/// Trim, strip markup/control characters, and truncate free text.
/// Total: never fails, non-string garbage is simply reduced to less of it.
pub fn sanitize_text(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'') && !c.is_control())
        .take(MAX_TEXT_LEN)
        .collect()
}

// ---------------------------------------------------------------------------
// Field enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Settlement currencies accepted by the hospital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    JPY,
    USD,
    CNY,
    KRW,
    EUR,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    MedicalRecord,
    Passport,
    Other,
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// A document attached to a case (scans, referral letters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: Uuid,
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    #[validate(url(message = "Attachment URL must be a valid URL"))]
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Case record
// ---------------------------------------------------------------------------

/// A medical-tourism referral case, the persisted record.
///
/// Field names serialize in camelCase so blobs written by earlier versions
/// of the system load unchanged. `id`, `created_at` and `created_by` are
/// assigned by the store at creation and never overwritten afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: Uuid,

    // Patient
    #[validate(
        length(min = 1, max = 100, message = "Patient name must be 1-100 characters"),
        regex(path = *PATIENT_NAME_RE, message = "Patient name contains invalid characters")
    )]
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Original-script name must be at most 100 characters"))]
    pub patient_name_original: Option<String>,
    #[validate(range(max = 150, message = "Age must be at most 150"))]
    pub age: u32,
    pub gender: Gender,
    #[validate(length(min = 1, max = 50, message = "Nationality must be 1-50 characters"))]
    pub nationality: String,
    #[validate(
        length(min = 1, max = 20, message = "Passport number must be 1-20 characters"),
        regex(path = *PASSPORT_RE, message = "Passport number must be uppercase letters and digits")
    )]
    pub passport_number: String,

    // Contact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        email(message = "Email address is not valid"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(max = 20, message = "Phone number must be at most 20 characters"),
        regex(path = *PHONE_RE, message = "Phone number format is not valid")
    )]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(max = 50, message = "Chat handle must be at most 50 characters"),
        regex(path = *CHAT_HANDLE_RE, message = "Chat handle may use letters, digits, underscore and hyphen")
    )]
    pub wechat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(max = 50, message = "Chat handle must be at most 50 characters"),
        regex(path = *CHAT_HANDLE_RE, message = "Chat handle may use letters, digits, underscore and hyphen")
    )]
    pub patient_wechat_id: Option<String>,

    // Treatment
    #[validate(length(min = 1, max = 200, message = "Treatment type must be 1-200 characters"))]
    pub treatment_type: String,
    #[validate(length(min = 1, max = 200, message = "Hospital name must be 1-200 characters"))]
    pub hospital_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Doctor name must be at most 100 characters"))]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,
    pub preferred_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_date: Option<NaiveDate>,

    // Medical
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 20, message = "Companion count must be at most 20"))]
    pub companions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Allergy text must be at most 1000 characters"))]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Medical history must be at most 2000 characters"))]
    pub medical_history: Option<String>,

    // Financial
    #[validate(range(min = 0.0, max = 100_000_000.0, message = "Estimated amount must be between 0 and 100,000,000"))]
    pub estimated_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100_000_000.0, message = "Confirmed amount must be between 0 and 100,000,000"))]
    pub confirmed_amount: Option<f64>,
    pub currency: Currency,
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0, message = "Commission rate must be between 0 and 1"))]
    pub commission_rate: Option<f64>,

    // Agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Agent name must be at most 100 characters"))]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "Agent company must be at most 200 characters"))]
    pub agent_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Agent contact must be at most 500 characters"))]
    pub agent_contact: Option<String>,

    // Narrative / notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Requirements must be at most 1000 characters"))]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Hospital notes must be at most 2000 characters"))]
    pub hospital_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Rejection reason must be at most 1000 characters"))]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Assignee must be at most 100 characters"))]
    pub assigned_to: Option<String>,

    // Workflow
    pub status: CaseStatus,

    // Attachments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub attachments: Vec<Attachment>,

    // System metadata
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[validate(length(min = 1, max = 100, message = "Creator id must be 1-100 characters"))]
    pub created_by: String,
}

impl Case {
    /// Amount the billing side settles against: confirmed when known,
    /// otherwise the estimate.
    pub fn net_amount(&self) -> f64 {
        self.confirmed_amount.unwrap_or(self.estimated_amount)
    }

    /// Agent commission: net amount times the agreed rate, `None` when no
    /// rate was agreed.
    pub fn commission(&self) -> Option<f64> {
        self.commission_rate.map(|rate| self.net_amount() * rate)
    }
}
