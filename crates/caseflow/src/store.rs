use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use shared_types::{
    AppConfig, AppError, Case, CaseStatus, CaseUpdate, CreateCaseRequest, StorageCode,
};

use crate::storage::BlobStore;

/// Blob key holding the whole case collection.
pub const STORAGE_KEY: &str = "medical-tourism-cases";

/// Blob key holding the schema version of the stored collection.
pub const STORAGE_VERSION_KEY: &str = "medical-tourism-cases-version";

/// Bumping this discards stored data on the next [`CaseStore::ensure_version`].
pub const STORAGE_VERSION: &str = "1.0.4";

/// Result of loading the collection: the usable records plus how many
/// stored records failed validation and were skipped. The dropped count is
/// the structured diagnostic operators and tests assert on.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub cases: Vec<Case>,
    pub dropped: usize,
}

/// Capacity diagnostics, informational only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    pub count: usize,
    pub bytes_used: u64,
    pub bytes_max: u64,
    pub percent_used: u8,
}

/// Durable collection of case records with schema and business-rule
/// enforcement on every read and write.
///
/// The whole collection is reloaded and rewritten per mutation, so a single
/// caller always observes its own prior writes. There is no cross-caller
/// coordination; a multi-writer deployment must add serialization at this
/// boundary (per-case lock or database transaction) rather than reuse the
/// read-merge-write pattern.
pub struct CaseStore<B: BlobStore> {
    blobs: B,
    max_bytes: u64,
    actor: String,
}

impl<B: BlobStore> CaseStore<B> {
    pub fn new(blobs: B) -> Self {
        Self::with_config(blobs, &AppConfig::default())
    }

    pub fn with_config(blobs: B, config: &AppConfig) -> Self {
        Self {
            blobs,
            max_bytes: config.storage.max_bytes,
            actor: config.actor.clone(),
        }
    }

    /// Actor stamped as `created_by` on new cases.
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Load the collection, re-validating every stored record. Records that
    /// fail to parse or validate are skipped with a diagnostic, never
    /// surfaced as corrupt data; this tolerates blobs written by older
    /// schema versions.
    pub fn load(&self) -> Result<LoadOutcome, AppError> {
        let raw = match self.blobs.read(STORAGE_KEY)? {
            Some(raw) => raw,
            None => {
                return Ok(LoadOutcome {
                    cases: Vec::new(),
                    dropped: 0,
                })
            }
        };

        let values: Vec<serde_json::Value> = serde_json::from_str(&raw).map_err(|e| {
            AppError::storage(
                StorageCode::LoadFailed,
                format!("Failed to load case data: {e}"),
            )
        })?;

        let mut cases = Vec::with_capacity(values.len());
        let mut dropped = 0;
        for value in values {
            let id = value
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("<no id>")
                .to_string();
            match serde_json::from_value::<Case>(value).map_err(|e| e.to_string()) {
                Ok(case) => match case.validate() {
                    Ok(()) => cases.push(case),
                    Err(e) => {
                        warn!(case_id = %id, error = %e, "skipping stored case that fails validation");
                        dropped += 1;
                    }
                },
                Err(e) => {
                    warn!(case_id = %id, error = %e, "skipping stored case that fails to parse");
                    dropped += 1;
                }
            }
        }

        Ok(LoadOutcome { cases, dropped })
    }

    /// The usable records, dropping invalid ones silently (they are still
    /// logged; use [`CaseStore::load`] for the dropped count).
    pub fn list(&self) -> Result<Vec<Case>, AppError> {
        Ok(self.load()?.cases)
    }

    /// Persist the collection. Every record is re-validated before the
    /// write (defense in depth); a serialized blob larger than the
    /// configured capacity fails with `QUOTA_EXCEEDED` instead of
    /// truncating.
    fn save(&self, cases: &[Case]) -> Result<(), AppError> {
        let mut valid = Vec::with_capacity(cases.len());
        for case in cases {
            match case.validate() {
                Ok(()) => valid.push(case),
                Err(e) => {
                    warn!(case_id = %case.id, error = %e, "refusing to persist invalid case");
                }
            }
        }

        let data = serde_json::to_string(&valid).map_err(|e| {
            AppError::storage(
                StorageCode::SaveFailed,
                format!("Failed to save case data: {e}"),
            )
        })?;

        if data.len() as u64 > self.max_bytes {
            return Err(AppError::storage(
                StorageCode::QuotaExceeded,
                "Storage capacity reached. Delete old cases before adding more.",
            ));
        }

        self.blobs.write(STORAGE_KEY, &data)?;
        info!(count = valid.len(), "saved case collection");
        Ok(())
    }

    /// Validate the input, assign system fields, and append.
    pub fn add(&self, request: CreateCaseRequest) -> Result<Case, AppError> {
        let request = request.sanitized();
        request
            .validate()
            .map_err(AppError::from)?;

        let mut cases = self.list()?;
        let case = request.into_case(Uuid::new_v4(), self.actor.clone(), Utc::now());

        // The request was already validated; re-check the assembled record
        // so a bad system field can never reach storage.
        case.validate().map_err(AppError::from)?;

        cases.push(case.clone());
        self.save(&cases)?;
        Ok(case)
    }

    /// Merge `updates` onto the stored record. Status changes must be a
    /// legal edge in the transition table; `id`, `created_at` and
    /// `created_by` are never overwritten; `updated_at` is stamped here.
    pub fn update(&self, id: Uuid, updates: CaseUpdate) -> Result<Case, AppError> {
        let mut cases = self.list()?;
        let index = cases
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Case not found"))?;

        let current = &cases[index];
        if let Some(next) = updates.status {
            if next != current.status && !current.status.can_transition_to(next) {
                return Err(AppError::validation_field(
                    "status",
                    format!(
                        "Status change from {} to {} is not allowed",
                        current.status, next
                    ),
                ));
            }
        }

        let mut updated = current.clone();
        updates.sanitized().apply_to(&mut updated);
        updated.updated_at = Utc::now();
        updated.validate().map_err(AppError::from)?;

        cases[index] = updated.clone();
        self.save(&cases)?;
        Ok(updated)
    }

    /// Remove a case. Returns false when no record has `id`. Completed
    /// cases are protected by a business rule and cannot be deleted.
    pub fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut cases = self.list()?;
        let Some(index) = cases.iter().position(|c| c.id == id) else {
            return Ok(false);
        };

        if cases[index].status == CaseStatus::Completed {
            return Err(AppError::business("Completed cases cannot be deleted"));
        }

        cases.remove(index);
        self.save(&cases)?;
        Ok(true)
    }

    /// Single-record lookup. Absent ids are `Ok(None)`, not an error.
    pub fn get(&self, id: Uuid) -> Result<Option<Case>, AppError> {
        Ok(self.list()?.into_iter().find(|c| c.id == id))
    }

    /// Sweep the collection: drop records that fail validation and records
    /// older than `retention` (measured from `created_at`). Returns how
    /// many were removed.
    pub fn cleanup(&self, retention: Duration) -> Result<usize, AppError> {
        let raw = match self.blobs.read(STORAGE_KEY)? {
            Some(raw) => raw,
            None => return Ok(0),
        };
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw).map_err(|e| {
            AppError::storage(
                StorageCode::LoadFailed,
                format!("Failed to load case data: {e}"),
            )
        })?;

        let now = Utc::now();
        let mut kept = Vec::with_capacity(values.len());
        let mut removed = 0;
        for value in values {
            match serde_json::from_value::<Case>(value) {
                Ok(case) if case.validate().is_ok() => {
                    if now - case.created_at < retention {
                        kept.push(case);
                    } else {
                        removed += 1;
                    }
                }
                _ => removed += 1,
            }
        }

        if removed > 0 {
            self.save(&kept)?;
            warn!(removed, "cleanup removed stale or invalid cases");
        }
        Ok(removed)
    }

    /// Capacity diagnostics for the collection blob.
    pub fn usage(&self) -> Result<StorageUsage, AppError> {
        let count = self.list()?.len();
        let bytes_used = self.blobs.len(STORAGE_KEY)?;
        let percent_used = if self.max_bytes > 0 {
            ((bytes_used as f64 / self.max_bytes as f64) * 100.0)
                .round()
                .min(100.0) as u8
        } else {
            0
        };
        Ok(StorageUsage {
            count,
            bytes_used,
            bytes_max: self.max_bytes,
            percent_used,
        })
    }

    /// Compare the stored schema version against [`STORAGE_VERSION`]; on a
    /// mismatch the collection is discarded and the version stamped.
    /// Returns true when a reset happened.
    pub fn ensure_version(&self) -> Result<bool, AppError> {
        let stored = self.blobs.read(STORAGE_VERSION_KEY)?;
        if stored.as_deref() == Some(STORAGE_VERSION) {
            return Ok(false);
        }
        info!(
            old = stored.as_deref().unwrap_or("<none>"),
            new = STORAGE_VERSION,
            "storage version changed, resetting case collection"
        );
        self.blobs.remove(STORAGE_KEY)?;
        self.blobs.write(STORAGE_VERSION_KEY, STORAGE_VERSION)?;
        Ok(true)
    }

    /// Write a starter collection when the store is empty or the schema
    /// version was bumped. Returns true when the seed was written.
    pub fn seed(&self, cases: &[Case]) -> Result<bool, AppError> {
        let reset = self.ensure_version()?;
        if reset || self.list()?.is_empty() {
            self.save(cases)?;
            return Ok(true);
        }
        Ok(false)
    }
}
