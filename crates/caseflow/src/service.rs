use std::sync::{Arc, Mutex};
use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, Utc};
use uuid::Uuid;

use shared_types::{
    case_stats, AppConfig, AppError, Case, CaseEvent, CaseFilter, CaseStats, CaseStatus,
    CaseUpdate, CreateCaseRequest,
};

use crate::storage::{BlobStore, FileBlobStore};
use crate::store::{CaseStore, StorageUsage};

/// Consumer of workflow facts (the notification collaborator). Events are
/// published only after the store mutation succeeded.
pub trait CaseEventSink: Send + Sync {
    fn publish(&self, event: CaseEvent);
}

/// Sink that discards everything.
pub struct NullEventSink;

impl CaseEventSink for NullEventSink {
    fn publish(&self, _event: CaseEvent) {}
}

/// Sink that keeps every published event, for tests and audit tooling.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<CaseEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CaseEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl CaseEventSink for RecordingEventSink {
    fn publish(&self, event: CaseEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Read cache with a freshness window, owned by the service and
/// invalidated after every mutation. Replaces the module-level timestamp
/// cache of the original hook layer.
struct CaseCache {
    entries: Option<Vec<Case>>,
    refreshed_at: Instant,
    ttl: StdDuration,
}

impl CaseCache {
    fn new(ttl: StdDuration) -> Self {
        Self {
            entries: None,
            refreshed_at: Instant::now(),
            ttl,
        }
    }

    fn fresh(&self) -> Option<&[Case]> {
        match &self.entries {
            Some(entries) if self.refreshed_at.elapsed() < self.ttl => Some(entries),
            _ => None,
        }
    }

    fn put(&mut self, cases: Vec<Case>) {
        self.entries = Some(cases);
        self.refreshed_at = Instant::now();
    }

    fn invalidate(&mut self) {
        self.entries = None;
    }
}

const CACHE_TTL: StdDuration = StdDuration::from_secs(5);
const DEFAULT_RETENTION_DAYS: i64 = 730;

/// Workflow façade over the case store, the only interface UI,
/// notification and chat collaborators use. Adds the early transition
/// check, status side-updates, event publication, and the read cache.
pub struct CaseService<B: BlobStore> {
    store: CaseStore<B>,
    sink: Arc<dyn CaseEventSink>,
    cache: CaseCache,
    retention: Duration,
}

impl CaseService<FileBlobStore> {
    /// File-backed service wired entirely from configuration: the data
    /// directory, capacity, actor and retention window all come from
    /// `config`.
    pub fn open(config: &AppConfig) -> Result<Self, AppError> {
        let blobs = FileBlobStore::new(&config.storage.data_dir)?;
        let store = CaseStore::with_config(blobs, config);
        let mut service = Self::new(store);
        service.set_retention_days(config.storage.retention_days);
        Ok(service)
    }
}

impl<B: BlobStore> CaseService<B> {
    pub fn new(store: CaseStore<B>) -> Self {
        Self::with_sink(store, Arc::new(NullEventSink))
    }

    pub fn with_sink(store: CaseStore<B>, sink: Arc<dyn CaseEventSink>) -> Self {
        Self {
            store,
            sink,
            cache: CaseCache::new(CACHE_TTL),
            retention: Duration::days(DEFAULT_RETENTION_DAYS),
        }
    }

    pub fn set_retention_days(&mut self, days: u32) {
        self.retention = Duration::days(i64::from(days));
    }

    pub fn store(&self) -> &CaseStore<B> {
        &self.store
    }

    fn refresh_cache(&mut self) -> Result<(), AppError> {
        if self.cache.fresh().is_none() {
            let cases = self.store.list()?;
            self.cache.put(cases);
        }
        Ok(())
    }

    /// Create a case from validated input. Publishes a `created` fact, and
    /// an `urgent` fact when the referral is high urgency.
    pub fn create_case(&mut self, request: CreateCaseRequest) -> Result<Case, AppError> {
        let case = self.store.add(request)?;
        self.cache.invalidate();
        self.sink.publish(CaseEvent::created(&case));
        if let Some(event) = CaseEvent::urgent(&case) {
            self.sink.publish(event);
        }
        Ok(case)
    }

    /// Non-workflow edits (patient details, amounts, notes). Status changes
    /// should go through [`CaseService::update_case_status`].
    pub fn update_case(&mut self, id: Uuid, updates: CaseUpdate) -> Result<Case, AppError> {
        let updated = self.store.update(id, updates)?;
        self.cache.invalidate();
        Ok(updated)
    }

    /// Move a case through the workflow.
    ///
    /// The transition is checked here, before the store's own check, so the
    /// caller gets an error naming both the current and attempted status.
    /// Entering `Accepted` or `Confirmed` stamps `confirmed_date` when
    /// unset; a supplied `reason` becomes the rejection reason on
    /// `Cancelled`/`Rejected` and the additional-documents request on
    /// `AdditionalInfoRequired`. Publishes a `status_changed` fact.
    pub fn update_case_status(
        &mut self,
        id: Uuid,
        new_status: CaseStatus,
        reason: Option<&str>,
    ) -> Result<Case, AppError> {
        let current = self
            .store
            .get(id)?
            .ok_or_else(|| AppError::not_found("Case not found"))?;

        // No self-edges exist in the table, so resubmitting the current
        // status is rejected here too; only update_case treats an equal
        // status as "unchanged".
        if !current.status.can_transition_to(new_status) {
            return Err(AppError::validation_field(
                "status",
                format!(
                    "Status change from {} to {} is not allowed",
                    current.status, new_status
                ),
            ));
        }

        let mut updates = CaseUpdate {
            status: Some(new_status),
            ..CaseUpdate::default()
        };
        match new_status {
            CaseStatus::Accepted | CaseStatus::Confirmed if current.confirmed_date.is_none() => {
                updates.confirmed_date = Some(Utc::now().date_naive());
            }
            CaseStatus::Cancelled | CaseStatus::Rejected => {
                updates.rejection_reason = reason.map(str::to_string);
            }
            CaseStatus::AdditionalInfoRequired => {
                updates.requirements = reason.map(str::to_string);
            }
            _ => {}
        }

        let updated = self.store.update(id, updates)?;
        self.cache.invalidate();
        self.sink.publish(CaseEvent::status_changed(
            &updated,
            current.status,
            reason.map(str::to_string),
        ));
        Ok(updated)
    }

    /// Remove a case; completed cases are protected by the store's
    /// business rule. Absent ids surface as a not-found storage error.
    pub fn delete_case(&mut self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.store.delete(id)?;
        if !deleted {
            return Err(AppError::not_found("Case not found"));
        }
        self.cache.invalidate();
        Ok(())
    }

    pub fn get_case(&mut self, id: Uuid) -> Result<Option<Case>, AppError> {
        self.refresh_cache()?;
        Ok(self
            .cache
            .fresh()
            .unwrap_or(&[])
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    /// The case list, optionally filtered. Filtering is a pure projection,
    /// never a stored query.
    pub fn list_cases(&mut self, filter: Option<&CaseFilter>) -> Result<Vec<Case>, AppError> {
        self.refresh_cache()?;
        let cases = self.cache.fresh().unwrap_or(&[]);
        Ok(match filter {
            Some(filter) => cases.iter().filter(|c| filter.matches(c)).cloned().collect(),
            None => cases.to_vec(),
        })
    }

    /// Sweep invalid and out-of-retention records; returns how many were
    /// removed.
    pub fn cleanup(&mut self) -> Result<usize, AppError> {
        let removed = self.store.cleanup(self.retention)?;
        self.cache.invalidate();
        Ok(removed)
    }

    pub fn usage(&self) -> Result<StorageUsage, AppError> {
        self.store.usage()
    }

    /// Dashboard aggregates over the current collection.
    pub fn stats(&mut self) -> Result<CaseStats, AppError> {
        let cases = self.list_cases(None)?;
        Ok(case_stats(&cases))
    }
}
