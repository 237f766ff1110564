use caseflow::{BlobStore, CaseStore, MemoryBlobStore, STORAGE_KEY};
use chrono::Utc;
use pretty_assertions::assert_eq;
use shared_types::{CaseFilter, CaseStatus, Urgency};
use uuid::Uuid;

use crate::common::{sample_request, service};

#[test]
fn empty_store_lists_nothing() {
    let mut service = service();
    assert!(service.list_cases(None).unwrap().is_empty());
}

#[test]
fn status_filter_projects_the_list() {
    let mut service = service();
    let a = service.create_case(sample_request()).unwrap();
    let b = service.create_case(sample_request()).unwrap();
    service
        .update_case_status(b.id, CaseStatus::Reviewing, None)
        .unwrap();

    let filter = CaseFilter {
        status: Some(CaseStatus::New),
        ..CaseFilter::default()
    };
    let listed = service.list_cases(Some(&filter)).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, a.id);
}

#[test]
fn urgency_filter_matches_exactly() {
    let mut service = service();
    service.create_case(sample_request()).unwrap();
    let mut urgent = sample_request();
    urgent.urgency = Urgency::High;
    let urgent = service.create_case(urgent).unwrap();

    let filter = CaseFilter {
        urgency: Some(Urgency::High),
        ..CaseFilter::default()
    };
    let listed = service.list_cases(Some(&filter)).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, urgent.id);
}

#[test]
fn search_is_a_case_insensitive_substring_match() {
    let mut service = service();
    service.create_case(sample_request()).unwrap();
    let mut other = sample_request();
    other.patient_name = "Tanaka Yuki".to_string();
    other.treatment_type = "Cardiac bypass".to_string();
    service.create_case(other).unwrap();

    let by_name = CaseFilter {
        search: Some("wang".to_string()),
        ..CaseFilter::default()
    };
    assert_eq!(service.list_cases(Some(&by_name)).unwrap().len(), 1);

    let by_treatment = CaseFilter {
        search: Some("CARDIAC".to_string()),
        ..CaseFilter::default()
    };
    assert_eq!(service.list_cases(Some(&by_treatment)).unwrap().len(), 1);

    let no_hit = CaseFilter {
        search: Some("dialysis".to_string()),
        ..CaseFilter::default()
    };
    assert!(service.list_cases(Some(&no_hit)).unwrap().is_empty());
}

#[test]
fn combined_filters_intersect() {
    let mut service = service();
    service.create_case(sample_request()).unwrap();
    let mut match_both = sample_request();
    match_both.urgency = Urgency::High;
    let match_both = service.create_case(match_both).unwrap();

    let filter = CaseFilter {
        urgency: Some(Urgency::High),
        nationality: Some("China".to_string()),
        department: Some("Oncology".to_string()),
        ..CaseFilter::default()
    };
    let listed = service.list_cases(Some(&filter)).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, match_both.id);
}

#[test]
fn corrupt_records_are_skipped_and_counted() {
    let valid = sample_request()
        .sanitized()
        .into_case(Uuid::new_v4(), "hospital-staff-001".to_string(), Utc::now());
    let blob = serde_json::json!([
        serde_json::to_value(&valid).unwrap(),
        { "id": "not-a-case", "patientName": 42 },
    ]);

    let blobs = MemoryBlobStore::new();
    blobs.write(STORAGE_KEY, &blob.to_string()).unwrap();
    let store = CaseStore::new(blobs);

    let outcome = store.load().unwrap();
    assert_eq!(outcome.cases.len(), 1);
    assert_eq!(outcome.cases[0].id, valid.id);
    assert_eq!(outcome.dropped, 1);
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn a_blob_that_is_not_an_array_is_a_load_error() {
    let blobs = MemoryBlobStore::new();
    blobs.write(STORAGE_KEY, "{\"oops\":true}").unwrap();
    let store = CaseStore::new(blobs);

    let err = store.load().unwrap_err();
    assert_eq!(err.code, Some(shared_types::StorageCode::LoadFailed));
}
