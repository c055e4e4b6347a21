//! # End-to-End Checklist Scenarios
//!
//! Drives the public API from a persisted instance through classification,
//! hydration, editing, and submission to a store, then reopens the stored
//! record to check that it comes back read-only with the submitted answers.

use ckl_core::{ChecklistDate, ChecklistId, ChecklistInstance, ChecklistItem, Schema};
use ckl_state::{
    build, classify, ChecklistSession, ChecklistStore, CompletionOutcome, FormState,
    MemoryStore, Responses, SessionError, SessionState, StoreError, SubmissionPayload, ViewMode,
};

fn id(s: &str) -> ChecklistId {
    ChecklistId::new(s).expect("valid id")
}

fn daily(checklist: &str) -> ChecklistInstance {
    ChecklistInstance::new(id(checklist), "Daily Report")
}

/// Store whose submit always fails; reads delegate to a memory store.
struct FailingStore(MemoryStore);

impl ChecklistStore for FailingStore {
    fn fetch(&self, id: &ChecklistId) -> Result<ChecklistInstance, StoreError> {
        self.0.fetch(id)
    }

    fn submit(&self, _payload: &SubmissionPayload) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    fn create(&self, instance: ChecklistInstance) -> Result<(), StoreError> {
        self.0.create(instance)
    }

    fn list(&self) -> Result<Vec<ChecklistInstance>, StoreError> {
        self.0.list()
    }
}

// ── Scenario A: blank template ───────────────────────────────────────

#[test]
fn test_blank_template_opens_editable_with_defaults() {
    let schema = Schema::daily_report();
    let instance = daily("c1");
    assert_eq!(classify(&instance.items), ViewMode::Editable);

    let responses = Responses::hydrate(&instance.items, &schema);
    for field in &schema {
        let expected = if field.key.as_str() == "clockIn" || field.key.as_str() == "clockOut" {
            "Yes"
        } else {
            ""
        };
        assert_eq!(responses.value(field.key.as_str()), Some(expected));
        assert_eq!(responses.comment(field.key.as_str()), Some(""));
    }

    let items = responses.serialize(&schema);
    assert_eq!(items.len(), 9);
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    let labels: Vec<&str> = schema.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(titles, labels);
}

// ── Scenario B: submitted record ─────────────────────────────────────

#[test]
fn test_submitted_record_opens_read_only() {
    let schema = Schema::daily_report();
    let mut instance = daily("c1");
    instance.items = vec![ChecklistItem::new("No of Tasks Worked")
        .with_response("5")
        .with_comment("done early")];

    assert_eq!(classify(&instance.items), ViewMode::ReadOnly);

    let mut session = ChecklistSession::open(&instance, &schema);
    assert_eq!(session.state(), SessionState::ReadOnly);
    let responses = session.form().responses();
    assert_eq!(responses.value("tasksWorked"), Some("5"));
    assert_eq!(responses.comment("tasksWorked"), Some("done early"));
    assert_eq!(responses.value("clockIn"), Some("Yes"));
    assert_eq!(responses.value("bugsFixes"), Some(""));

    assert!(!session.set_value("tasksWorked", "6").expect("no-op"));
    assert!(matches!(session.begin_submit(), Err(SessionError::ReadOnly { .. })));
}

// ── Scenario C: payload shape ────────────────────────────────────────

#[test]
fn test_fully_populated_form_builds_payload() {
    let schema = Schema::daily_report();
    let mut form = FormState::open(&daily("c1"), &schema);
    for field in &schema {
        let value = match field.key.as_str() {
            "clockIn" | "clockOut" => "No",
            _ => "3",
        };
        assert!(form.set_value(&schema, field.key.as_str(), value).expect("valid input"));
        assert!(form.set_comment(&schema, field.key.as_str(), "noted").expect("known field"));
    }

    let date = ChecklistDate::parse("2025-03-01").expect("valid date");
    let payload = build(&id("c1"), "Daily Report", date, &form, &schema).expect("editable");

    let json = serde_json::to_value(&payload).expect("serializable");
    assert_eq!(json["checklistId"], "c1");
    assert_eq!(json["title"], "Daily Report");
    assert_eq!(json["date"], "2025-03-01");
    let items = json["items"].as_array().expect("items array");
    assert_eq!(items.len(), 9);
    for (item, field) in items.iter().zip(schema.iter()) {
        assert_eq!(item["title"], field.label.as_str());
        assert_eq!(item["comment"], "noted");
    }
    assert_eq!(items[3]["response"], "No");
    assert_eq!(items[0]["response"], "3");
}

// ── Scenario D: obsolete items ───────────────────────────────────────

#[test]
fn test_obsolete_items_are_dropped() {
    let schema = Schema::daily_report();
    let items = vec![
        ChecklistItem::new("Obsolete Field").with_response("42"),
        ChecklistItem::new("Code Reviews Done").with_response("1"),
    ];

    let responses = Responses::hydrate(&items, &schema);
    assert!(responses.values().values().all(|v| v != "42"));
    assert_eq!(responses.value("codeReviews"), Some("1"));

    let out = responses.serialize(&schema);
    assert_eq!(out.len(), 9);
    assert!(out.iter().all(|i| i.title != "Obsolete Field"));
}

// ── Session lifecycle against a store ────────────────────────────────

#[test]
fn test_submit_then_reopen_is_read_only() {
    let schema = Schema::daily_report();
    let store = MemoryStore::new();
    store
        .create(ChecklistInstance::blank(id("c1"), "Daily Report", &schema).expect("blank"))
        .expect("created");

    let instance = store.fetch(&id("c1")).expect("fetched");
    let mut session = ChecklistSession::open(&instance, &schema);
    assert_eq!(session.state(), SessionState::Editable);
    session.set_value("tasksCompleted", "7").expect("valid");
    assert!(session.set_date(ChecklistDate::parse("2025-03-01").expect("valid date")));

    assert_eq!(session.submit_to(&store).expect("accepted"), CompletionOutcome::Submitted);
    assert_eq!(session.state(), SessionState::Submitted);

    let stored = store.fetch(&id("c1")).expect("fetched");
    assert_eq!(stored.last_submitted.map(|d| d.to_string()).as_deref(), Some("2025-03-01"));

    let reopened = ChecklistSession::open(&stored, &schema);
    assert_eq!(reopened.state(), SessionState::ReadOnly);
    assert_eq!(reopened.date().to_string(), "2025-03-01");
    assert_eq!(reopened.form().responses().value("tasksCompleted"), Some("7"));
}

#[test]
fn test_failed_submit_keeps_form_and_allows_retry() {
    let schema = Schema::daily_report();
    let failing = FailingStore(MemoryStore::new());
    failing.create(daily("c1")).expect("created");

    let instance = failing.fetch(&id("c1")).expect("fetched");
    let mut session = ChecklistSession::open(&instance, &schema);
    session.set_value("remainingTasks", "2").expect("valid");

    let err = session.submit_to(&failing).unwrap_err();
    assert!(matches!(err, SessionError::SubmissionFailed { .. }));
    assert_eq!(session.state(), SessionState::Editable);
    assert_eq!(session.form().responses().value("remainingTasks"), Some("2"));

    // the same session can go to a healthy store
    assert_eq!(
        session.submit_to(&failing.0).expect("accepted"),
        CompletionOutcome::Submitted
    );
    let stored = failing.0.fetch(&id("c1")).expect("fetched");
    assert_eq!(classify(&stored.items), ViewMode::ReadOnly);
}

#[test]
fn test_concurrent_sessions_are_independent() {
    let schema = Schema::daily_report();
    let a = daily("a");
    let b = daily("b");
    let mut first = ChecklistSession::open(&a, &schema);
    let second = ChecklistSession::open(&b, &schema);

    first.set_value("tasksWorked", "9").expect("valid");
    assert_eq!(first.form().responses().value("tasksWorked"), Some("9"));
    assert_eq!(second.form().responses().value("tasksWorked"), Some(""));
}

#[test]
fn test_stored_record_round_trips_through_json() {
    let raw = r#"{
        "id": "c9",
        "title": "Daily Report",
        "date": "2025-03-01T08:15:00Z",
        "items": [
            {"title": "Daily Clock In", "response": "No", "comment": null},
            {"title": "No of Bugs fixed", "response": 4},
            "garbage"
        ]
    }"#;
    let instance: ChecklistInstance = serde_json::from_str(raw).expect("lenient parse");
    let schema = Schema::daily_report();
    let session = ChecklistSession::open(&instance, &schema);
    assert_eq!(session.state(), SessionState::ReadOnly);
    assert_eq!(session.date().to_string(), "2025-03-01");
    assert_eq!(session.form().responses().value("clockIn"), Some("No"));
    assert_eq!(session.form().responses().value("bugsFixes"), Some("4"));
    assert_eq!(session.form().responses().comment("clockIn"), Some(""));
}
