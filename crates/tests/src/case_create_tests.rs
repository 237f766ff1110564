use pretty_assertions::assert_eq;
use shared_types::{CaseEventKind, CaseStatus, ErrorKind, Urgency};

use crate::common::{recording_service, sample_request, service};

#[test]
fn create_assigns_system_fields() {
    let mut service = service();
    let case = service.create_case(sample_request()).unwrap();

    assert!(!case.created_by.is_empty());
    assert_eq!(case.created_at, case.updated_at);
    assert_eq!(case.status, CaseStatus::New);
}

#[test]
fn created_case_is_listed_unchanged() {
    let mut service = service();
    let case = service.create_case(sample_request()).unwrap();

    let listed = service.list_cases(None).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], case);
}

#[test]
fn repeated_adds_do_not_double_count() {
    let mut service = service();
    service.create_case(sample_request()).unwrap();
    service.create_case(sample_request()).unwrap();
    service.create_case(sample_request()).unwrap();

    assert_eq!(service.list_cases(None).unwrap().len(), 3);
}

#[test]
fn each_created_case_gets_a_distinct_id() {
    let mut service = service();
    let a = service.create_case(sample_request()).unwrap();
    let b = service.create_case(sample_request()).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn invalid_input_is_rejected_naming_the_field() {
    let mut service = service();
    let mut request = sample_request();
    request.age = 200;

    let err = service.create_case(request).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.field_errors.contains_key("age"));
    assert!(service.list_cases(None).unwrap().is_empty());
}

#[test]
fn free_text_is_sanitized_before_persistence() {
    let mut service = service();
    let mut request = sample_request();
    request.description = Some("  <script>alert(1)</script> note  ".to_string());

    let case = service.create_case(request).unwrap();
    let stored = service.get_case(case.id).unwrap().unwrap();
    let description = stored.description.unwrap();
    assert!(!description.contains('<'));
    assert!(!description.contains('>'));
    assert!(description.ends_with("note"));
}

#[test]
fn create_publishes_a_created_event() {
    let (mut service, sink) = recording_service();
    let case = service.create_case(sample_request()).unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, CaseEventKind::Created);
    assert_eq!(events[0].case_id, case.id);
    assert_eq!(events[0].patient_name, case.patient_name);
    assert_eq!(events[0].new_status, CaseStatus::New);
    assert_eq!(events[0].old_status, None);
}

#[test]
fn high_urgency_create_also_publishes_urgent() {
    let (mut service, sink) = recording_service();
    let mut request = sample_request();
    request.urgency = Urgency::High;
    service.create_case(request).unwrap();

    let kinds: Vec<_> = sink.events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![CaseEventKind::Created, CaseEventKind::Urgent]);
}

#[test]
fn failed_create_publishes_nothing() {
    let (mut service, sink) = recording_service();
    let mut request = sample_request();
    request.passport_number = "lowercase".to_string();
    assert!(service.create_case(request).is_err());
    assert!(sink.events().is_empty());
}
