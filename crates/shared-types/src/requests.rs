use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::case::{
    sanitize_text, Attachment, Case, Currency, Gender, Urgency, CHAT_HANDLE_RE, PASSPORT_RE,
    PATIENT_NAME_RE, PHONE_RE,
};
use crate::status::CaseStatus;

fn sanitize_opt(value: Option<String>) -> Option<String> {
    value.map(|v| sanitize_text(&v))
}

/// Fields a caller may supply when creating a case: everything except the
/// system-assigned `id`, `created_at`, `updated_at` and `created_by`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    #[validate(
        length(min = 1, max = 100, message = "Patient name must be 1-100 characters"),
        regex(path = *PATIENT_NAME_RE, message = "Patient name contains invalid characters")
    )]
    pub patient_name: String,
    #[serde(default)]
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

    #[serde(default)]
    #[validate(
        email(message = "Email address is not valid"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(
        length(max = 20, message = "Phone number must be at most 20 characters"),
        regex(path = *PHONE_RE, message = "Phone number format is not valid")
    )]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(
        length(max = 50, message = "Chat handle must be at most 50 characters"),
        regex(path = *CHAT_HANDLE_RE, message = "Chat handle may use letters, digits, underscore and hyphen")
    )]
    pub wechat_id: Option<String>,
    #[serde(default)]
    #[validate(
        length(max = 50, message = "Chat handle must be at most 50 characters"),
        regex(path = *CHAT_HANDLE_RE, message = "Chat handle may use letters, digits, underscore and hyphen")
    )]
    pub patient_wechat_id: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Treatment type must be 1-200 characters"))]
    pub treatment_type: String,
    #[validate(length(min = 1, max = 200, message = "Hospital name must be 1-200 characters"))]
    pub hospital_name: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "Doctor name must be at most 100 characters"))]
    pub doctor_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,
    pub preferred_date: NaiveDate,
    #[serde(default)]
    pub confirmed_date: Option<NaiveDate>,

    #[serde(default)]
    #[validate(range(max = 20, message = "Companion count must be at most 20"))]
    pub companions: Option<u32>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Allergy text must be at most 1000 characters"))]
    pub allergies: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Medical history must be at most 2000 characters"))]
    pub medical_history: Option<String>,

    #[validate(range(min = 0.0, max = 100_000_000.0, message = "Estimated amount must be between 0 and 100,000,000"))]
    pub estimated_amount: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100_000_000.0, message = "Confirmed amount must be between 0 and 100,000,000"))]
    pub confirmed_amount: Option<f64>,
    pub currency: Currency,
    pub urgency: Urgency,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0, message = "Commission rate must be between 0 and 1"))]
    pub commission_rate: Option<f64>,

    #[serde(default)]
    #[validate(length(max = 100, message = "Agent name must be at most 100 characters"))]
    pub agent_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Agent company must be at most 200 characters"))]
    pub agent_company: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "Agent contact must be at most 500 characters"))]
    pub agent_contact: Option<String>,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Requirements must be at most 1000 characters"))]
    pub requirements: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Hospital notes must be at most 2000 characters"))]
    pub hospital_notes: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Rejection reason must be at most 1000 characters"))]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "Assignee must be at most 100 characters"))]
    pub assigned_to: Option<String>,

    pub status: CaseStatus,

    #[serde(default)]
    #[validate(nested)]
    pub attachments: Vec<Attachment>,
}

impl CreateCaseRequest {
    /// Sanitize every free-text field before validation and persistence.
    pub fn sanitized(mut self) -> Self {
        self.patient_name = sanitize_text(&self.patient_name);
        self.patient_name_original = sanitize_opt(self.patient_name_original);
        self.nationality = sanitize_text(&self.nationality);
        self.passport_number = sanitize_text(&self.passport_number);
        self.email = sanitize_opt(self.email);
        self.phone = sanitize_opt(self.phone);
        self.wechat_id = sanitize_opt(self.wechat_id);
        self.patient_wechat_id = sanitize_opt(self.patient_wechat_id);
        self.treatment_type = sanitize_text(&self.treatment_type);
        self.hospital_name = sanitize_text(&self.hospital_name);
        self.doctor_name = sanitize_opt(self.doctor_name);
        self.department = sanitize_opt(self.department);
        self.allergies = sanitize_opt(self.allergies);
        self.medical_history = sanitize_opt(self.medical_history);
        self.agent_name = sanitize_opt(self.agent_name);
        self.agent_company = sanitize_opt(self.agent_company);
        self.agent_contact = sanitize_opt(self.agent_contact);
        self.description = sanitize_opt(self.description);
        self.requirements = sanitize_opt(self.requirements);
        self.hospital_notes = sanitize_opt(self.hospital_notes);
        self.rejection_reason = sanitize_opt(self.rejection_reason);
        self.assigned_to = sanitize_opt(self.assigned_to);
        self
    }

    /// Assemble the persisted record with the system-assigned fields.
    pub fn into_case(self, id: Uuid, created_by: String, now: DateTime<Utc>) -> Case {
        Case {
            id,
            patient_name: self.patient_name,
            patient_name_original: self.patient_name_original,
            age: self.age,
            gender: self.gender,
            nationality: self.nationality,
            passport_number: self.passport_number,
            email: self.email,
            phone: self.phone,
            wechat_id: self.wechat_id,
            patient_wechat_id: self.patient_wechat_id,
            treatment_type: self.treatment_type,
            hospital_name: self.hospital_name,
            doctor_name: self.doctor_name,
            department: self.department,
            preferred_date: self.preferred_date,
            confirmed_date: self.confirmed_date,
            companions: self.companions,
            allergies: self.allergies,
            medical_history: self.medical_history,
            estimated_amount: self.estimated_amount,
            confirmed_amount: self.confirmed_amount,
            currency: self.currency,
            urgency: self.urgency,
            commission_rate: self.commission_rate,
            agent_name: self.agent_name,
            agent_company: self.agent_company,
            agent_contact: self.agent_contact,
            description: self.description,
            requirements: self.requirements,
            hospital_notes: self.hospital_notes,
            rejection_reason: self.rejection_reason,
            assigned_to: self.assigned_to,
            status: self.status,
            attachments: self.attachments,
            created_at: now,
            updated_at: now,
            created_by,
        }
    }
}

/// Partial update for a case. `Some` sets the field, `None` leaves it
/// unchanged; `id`, `created_at` and `created_by` are not representable
/// here and therefore can never be overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseUpdate {
    pub patient_name: Option<String>,
    pub patient_name_original: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub nationality: Option<String>,
    pub passport_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub wechat_id: Option<String>,
    pub patient_wechat_id: Option<String>,
    pub treatment_type: Option<String>,
    pub hospital_name: Option<String>,
    pub doctor_name: Option<String>,
    pub department: Option<String>,
    pub preferred_date: Option<NaiveDate>,
    pub confirmed_date: Option<NaiveDate>,
    pub companions: Option<u32>,
    pub allergies: Option<String>,
    pub medical_history: Option<String>,
    pub estimated_amount: Option<f64>,
    pub confirmed_amount: Option<f64>,
    pub currency: Option<Currency>,
    pub urgency: Option<Urgency>,
    pub commission_rate: Option<f64>,
    pub agent_name: Option<String>,
    pub agent_company: Option<String>,
    pub agent_contact: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub hospital_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<CaseStatus>,
    pub attachments: Option<Vec<Attachment>>,
}

impl CaseUpdate {
    /// Sanitize every free-text field carried by the update.
    pub fn sanitized(mut self) -> Self {
        self.patient_name = sanitize_opt(self.patient_name);
        self.patient_name_original = sanitize_opt(self.patient_name_original);
        self.nationality = sanitize_opt(self.nationality);
        self.passport_number = sanitize_opt(self.passport_number);
        self.email = sanitize_opt(self.email);
        self.phone = sanitize_opt(self.phone);
        self.wechat_id = sanitize_opt(self.wechat_id);
        self.patient_wechat_id = sanitize_opt(self.patient_wechat_id);
        self.treatment_type = sanitize_opt(self.treatment_type);
        self.hospital_name = sanitize_opt(self.hospital_name);
        self.doctor_name = sanitize_opt(self.doctor_name);
        self.department = sanitize_opt(self.department);
        self.allergies = sanitize_opt(self.allergies);
        self.medical_history = sanitize_opt(self.medical_history);
        self.agent_name = sanitize_opt(self.agent_name);
        self.agent_company = sanitize_opt(self.agent_company);
        self.agent_contact = sanitize_opt(self.agent_contact);
        self.description = sanitize_opt(self.description);
        self.requirements = sanitize_opt(self.requirements);
        self.hospital_notes = sanitize_opt(self.hospital_notes);
        self.rejection_reason = sanitize_opt(self.rejection_reason);
        self.assigned_to = sanitize_opt(self.assigned_to);
        self
    }

    /// Merge the provided fields onto `case`. System metadata is untouched;
    /// the caller stamps `updated_at` and re-validates the merged record.
    pub fn apply_to(self, case: &mut Case) {
        if let Some(v) = self.patient_name {
            case.patient_name = v;
        }
        if let Some(v) = self.patient_name_original {
            case.patient_name_original = Some(v);
        }
        if let Some(v) = self.age {
            case.age = v;
        }
        if let Some(v) = self.gender {
            case.gender = v;
        }
        if let Some(v) = self.nationality {
            case.nationality = v;
        }
        if let Some(v) = self.passport_number {
            case.passport_number = v;
        }
        if let Some(v) = self.email {
            case.email = Some(v);
        }
        if let Some(v) = self.phone {
            case.phone = Some(v);
        }
        if let Some(v) = self.wechat_id {
            case.wechat_id = Some(v);
        }
        if let Some(v) = self.patient_wechat_id {
            case.patient_wechat_id = Some(v);
        }
        if let Some(v) = self.treatment_type {
            case.treatment_type = v;
        }
        if let Some(v) = self.hospital_name {
            case.hospital_name = v;
        }
        if let Some(v) = self.doctor_name {
            case.doctor_name = Some(v);
        }
        if let Some(v) = self.department {
            case.department = Some(v);
        }
        if let Some(v) = self.preferred_date {
            case.preferred_date = v;
        }
        if let Some(v) = self.confirmed_date {
            case.confirmed_date = Some(v);
        }
        if let Some(v) = self.companions {
            case.companions = Some(v);
        }
        if let Some(v) = self.allergies {
            case.allergies = Some(v);
        }
        if let Some(v) = self.medical_history {
            case.medical_history = Some(v);
        }
        if let Some(v) = self.estimated_amount {
            case.estimated_amount = v;
        }
        if let Some(v) = self.confirmed_amount {
            case.confirmed_amount = Some(v);
        }
        if let Some(v) = self.currency {
            case.currency = v;
        }
        if let Some(v) = self.urgency {
            case.urgency = v;
        }
        if let Some(v) = self.commission_rate {
            case.commission_rate = Some(v);
        }
        if let Some(v) = self.agent_name {
            case.agent_name = Some(v);
        }
        if let Some(v) = self.agent_company {
            case.agent_company = Some(v);
        }
        if let Some(v) = self.agent_contact {
            case.agent_contact = Some(v);
        }
        if let Some(v) = self.description {
            case.description = Some(v);
        }
        if let Some(v) = self.requirements {
            case.requirements = Some(v);
        }
        if let Some(v) = self.hospital_notes {
            case.hospital_notes = Some(v);
        }
        if let Some(v) = self.rejection_reason {
            case.rejection_reason = Some(v);
        }
        if let Some(v) = self.assigned_to {
            case.assigned_to = Some(v);
        }
        if let Some(v) = self.status {
            case.status = v;
        }
        if let Some(v) = self.attachments {
            case.attachments = v;
        }
    }
}
