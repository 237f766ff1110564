use caseflow::{
    BlobStore, CaseStore, FileBlobStore, MemoryBlobStore, STORAGE_KEY, STORAGE_VERSION,
    STORAGE_VERSION_KEY,
};
use chrono::Utc;
use pretty_assertions::assert_eq;
use shared_types::AppConfig;
use uuid::Uuid;

use crate::common::{memory_store, sample_request};

fn sample_cases(n: usize) -> Vec<shared_types::Case> {
    (0..n)
        .map(|_| {
            sample_request().sanitized().into_case(
                Uuid::new_v4(),
                "hospital-staff-001".to_string(),
                Utc::now(),
            )
        })
        .collect()
}

#[test]
fn quota_is_enforced_before_the_write() {
    let mut config = AppConfig::default();
    config.storage.max_bytes = 256;
    let store = CaseStore::with_config(MemoryBlobStore::new(), &config);

    let err = store.add(sample_request()).unwrap_err();
    assert!(err.is_quota_exceeded());
    assert_eq!(store.list().unwrap().len(), 0);
}

#[test]
fn usage_reports_count_and_capacity() {
    let store = memory_store();
    let empty = store.usage().unwrap();
    assert_eq!(empty.count, 0);
    assert_eq!(empty.bytes_used, 0);
    assert_eq!(empty.bytes_max, 4 * 1024 * 1024);
    assert_eq!(empty.percent_used, 0);

    store.add(sample_request()).unwrap();
    let used = store.usage().unwrap();
    assert_eq!(used.count, 1);
    assert!(used.bytes_used > 0);
    assert!(used.percent_used <= 100);
}

#[test]
fn version_stamp_is_written_once_and_then_stable() {
    let blobs = MemoryBlobStore::new();
    let store = CaseStore::new(blobs);

    assert!(store.ensure_version().unwrap());
    assert!(!store.ensure_version().unwrap());
}

#[test]
fn version_bump_discards_the_stored_collection() {
    let blobs = MemoryBlobStore::new();
    blobs.write(STORAGE_VERSION_KEY, "0.9.0").unwrap();
    blobs
        .write(STORAGE_KEY, &serde_json::to_string(&sample_cases(2)).unwrap())
        .unwrap();

    let store = CaseStore::new(blobs);
    assert!(store.ensure_version().unwrap());
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn seed_populates_an_empty_store() {
    let store = memory_store();
    let cases = sample_cases(2);

    assert!(store.seed(&cases).unwrap());
    assert_eq!(store.list().unwrap().len(), 2);
}

#[test]
fn seed_leaves_existing_data_alone() {
    let store = memory_store();
    store.seed(&sample_cases(1)).unwrap();
    store.add(sample_request()).unwrap();

    assert!(!store.seed(&sample_cases(5)).unwrap());
    assert_eq!(store.list().unwrap().len(), 2);
}

#[test]
fn seed_reseeds_after_a_version_bump() {
    let blobs = MemoryBlobStore::new();
    blobs.write(STORAGE_VERSION_KEY, "0.9.0").unwrap();
    blobs
        .write(STORAGE_KEY, &serde_json::to_string(&sample_cases(3)).unwrap())
        .unwrap();

    let store = CaseStore::new(blobs);
    assert!(store.seed(&sample_cases(1)).unwrap());
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn file_backed_collection_survives_a_new_store_instance() {
    let dir = tempfile::tempdir().unwrap();

    let first = CaseStore::new(FileBlobStore::new(dir.path()).unwrap());
    let case = first.add(sample_request()).unwrap();

    let second = CaseStore::new(FileBlobStore::new(dir.path()).unwrap());
    let reloaded = second.get(case.id).unwrap().unwrap();
    assert_eq!(reloaded, case);
}

#[test]
fn service_opens_from_configuration_alone() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.storage.data_dir = dir.path().join("cases").to_string_lossy().into_owned();
    config.actor = "reception-02".to_string();

    let mut service = caseflow::CaseService::open(&config).unwrap();
    let case = service.create_case(sample_request()).unwrap();
    assert_eq!(case.created_by, "reception-02");

    let mut reopened = caseflow::CaseService::open(&config).unwrap();
    assert_eq!(reopened.get_case(case.id).unwrap(), Some(case));
}

#[test]
fn removing_an_absent_blob_is_not_an_error() {
    let blobs = MemoryBlobStore::new();
    blobs.remove("never-written").unwrap();
    assert_eq!(blobs.read("never-written").unwrap(), None);
    assert_eq!(blobs.len("never-written").unwrap(), 0);
}

#[test]
fn version_constants_match_the_persisted_layout() {
    assert_eq!(STORAGE_KEY, "medical-tourism-cases");
    assert_eq!(STORAGE_VERSION_KEY, "medical-tourism-cases-version");
    assert_eq!(STORAGE_VERSION, "1.0.4");
}
