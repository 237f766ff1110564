use pretty_assertions::assert_eq;
use shared_types::{CaseUpdate, ErrorKind, StorageCode};
use uuid::Uuid;

use crate::common::{sample_request, service};

#[test]
fn update_merges_only_provided_fields() {
    let mut service = service();
    let case = service.create_case(sample_request()).unwrap();

    let updates = CaseUpdate {
        hospital_notes: Some("Interpreter required".to_string()),
        confirmed_amount: Some(4_800_000.0),
        ..CaseUpdate::default()
    };
    let updated = service.update_case(case.id, updates).unwrap();

    assert_eq!(updated.hospital_notes.as_deref(), Some("Interpreter required"));
    assert_eq!(updated.confirmed_amount, Some(4_800_000.0));
    assert_eq!(updated.patient_name, case.patient_name);
    assert_eq!(updated.status, case.status);
}

#[test]
fn update_preserves_immutable_system_fields() {
    let mut service = service();
    let case = service.create_case(sample_request()).unwrap();

    let updated = service
        .update_case(
            case.id,
            CaseUpdate {
                age: Some(55),
                ..CaseUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(updated.id, case.id);
    assert_eq!(updated.created_at, case.created_at);
    assert_eq!(updated.created_by, case.created_by);
    assert!(updated.updated_at >= case.updated_at);
}

#[test]
fn update_of_absent_id_is_a_not_found_storage_error() {
    let mut service = service();
    let err = service
        .update_case(Uuid::new_v4(), CaseUpdate::default())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Storage);
    assert_eq!(err.code, Some(StorageCode::NotFound));
}

#[test]
fn invalid_merged_record_is_rejected_and_nothing_changes() {
    let mut service = service();
    let case = service.create_case(sample_request()).unwrap();

    let err = service
        .update_case(
            case.id,
            CaseUpdate {
                estimated_amount: Some(999_000_000.0),
                ..CaseUpdate::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let stored = service.store().get(case.id).unwrap().unwrap();
    assert_eq!(stored.estimated_amount, case.estimated_amount);
}

#[test]
fn update_sanitizes_incoming_text() {
    let mut service = service();
    let case = service.create_case(sample_request()).unwrap();

    let updated = service
        .update_case(
            case.id,
            CaseUpdate {
                description: Some("<b>urgent</b> follow-up".to_string()),
                ..CaseUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("burgent/b follow-up"));
}

#[test]
fn setting_the_same_status_through_update_case_is_a_no_op() {
    let mut service = service();
    let case = service.create_case(sample_request()).unwrap();

    // Equal status is "unchanged", not a self-transition.
    let updated = service
        .update_case(
            case.id,
            CaseUpdate {
                status: Some(case.status),
                ..CaseUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.status, case.status);
}
