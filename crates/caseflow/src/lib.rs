//! Case workflow core: a validated, transition-checked store of
//! medical-tourism referral cases and the service façade collaborators
//! call. Persistence is a pluggable key-value blob substrate; see
//! [`storage::BlobStore`].

pub mod config;
pub mod service;
pub mod storage;
pub mod store;

pub use config::{load_config, load_config_from};
pub use service::{CaseEventSink, CaseService, NullEventSink, RecordingEventSink};
pub use storage::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use store::{
    CaseStore, LoadOutcome, StorageUsage, STORAGE_KEY, STORAGE_VERSION, STORAGE_VERSION_KEY,
};
