use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categorization of errors surfaced by the workflow core.
///
/// `Validation` covers schema rules and illegal status transitions,
/// `Business` covers rules like the completed-case deletion guard,
/// `Storage` is the persistence layer (subtyped by [`StorageCode`]), and
/// `Network` is reserved for callers that bridge this core over a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Business,
    Storage,
    Network,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "Validation"),
            ErrorKind::Business => write!(f, "Business"),
            ErrorKind::Storage => write!(f, "Storage"),
            ErrorKind::Network => write!(f, "Network"),
        }
    }
}

/// Machine-readable subtype for storage failures. `NotFound` is an
/// expected outcome for lookups on absent ids, distinguishable from
/// genuine I/O failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageCode {
    LoadFailed,
    SaveFailed,
    AddFailed,
    UpdateFailed,
    DeleteFailed,
    GetFailed,
    QuotaExceeded,
    NotFound,
}

impl StorageCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageCode::LoadFailed => "LOAD_FAILED",
            StorageCode::SaveFailed => "SAVE_FAILED",
            StorageCode::AddFailed => "ADD_FAILED",
            StorageCode::UpdateFailed => "UPDATE_FAILED",
            StorageCode::DeleteFailed => "DELETE_FAILED",
            StorageCode::GetFailed => "GET_FAILED",
            StorageCode::QuotaExceeded => "QUOTA_EXCEEDED",
            StorageCode::NotFound => "NOT_FOUND",
        }
    }
}

/// Structured application error shared by the store and the service.
///
/// The message is written for hospital staff and is preserved verbatim as
/// errors cross layers; callers branch on `kind` (and `code` for storage
/// errors) rather than on the text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<StorageCode>,
}

impl AppError {
    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
            field_errors,
            code: None,
        }
    }

    /// Validation error naming a single offending field.
    pub fn validation_field(
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), message.clone());
        Self {
            kind: ErrorKind::Validation,
            message,
            field_errors,
            code: None,
        }
    }

    pub fn business(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Business,
            message: message.into(),
            field_errors: HashMap::new(),
            code: None,
        }
    }

    pub fn storage(code: StorageCode, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Storage,
            message: message.into(),
            field_errors: HashMap::new(),
            code: Some(code),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::storage(StorageCode::NotFound, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Some(StorageCode::NotFound)
    }

    pub fn is_quota_exceeded(&self) -> bool {
        self.code == Some(StorageCode::QuotaExceeded)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} ({}): {}", self.kind, code.as_str(), self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = HashMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                field_errors.insert(field.to_string(), msg);
            }
        }
        AppError::validation("Validation failed", field_errors)
    }
}
