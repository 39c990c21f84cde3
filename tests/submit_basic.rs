#![forbid(unsafe_code)]
use anyhow::anyhow;
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde_json::json;
use std::cell::RefCell;
use tournee::model::ResourceId;
use tournee::notification::SilentNotifier;
use tournee::submit::{
    submit_shift, CreateShiftPayload, FormError, MutationService, ShiftForm,
};
use tournee::validate::{ShiftDraft, ShiftField};
use tournee::workflow::BulkActionPayload;

/// Collaborateur de mutation factice : enregistre ce qu'il reçoit et
/// échoue sur demande.
#[derive(Default)]
struct RecordingService {
    fail: bool,
    created: RefCell<Vec<CreateShiftPayload>>,
}

impl MutationService for RecordingService {
    fn create_shift(&self, payload: &CreateShiftPayload) -> anyhow::Result<()> {
        if self.fail {
            return Err(anyhow!("backend unavailable"));
        }
        self.created.borrow_mut().push(payload.clone());
        Ok(())
    }

    fn apply_bulk_action(&self, _payload: &BulkActionPayload) -> anyhow::Result<()> {
        Ok(())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
}

fn recurring_draft() -> ShiftDraft {
    ShiftDraft {
        title: "Evening round".to_string(),
        client: "c1".to_string(),
        carers: vec![ResourceId::new("k1"), ResourceId::new("k2")],
        founder_code: Some("21.5".to_string()),
        call_slot: None,
        visit_type: Some("domestic".to_string()),
        start_date: NaiveDate::from_ymd_opt(2026, 1, 21),
        end_date: None,
        start_time: NaiveTime::from_hms_opt(18, 0, 0),
        end_time: NaiveTime::from_hms_opt(20, 0, 0),
        recurring: true,
        weekdays: vec![Weekday::Mon, Weekday::Thu],
    }
}

#[test]
fn create_shift_payload_matches_the_wire_format() {
    let mut form = ShiftForm::new(recurring_draft());
    let payload = form.submit(today()).unwrap();
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({
            "title": "Evening round",
            "client_id": "c1",
            "carers": ["k1", "k2"],
            "start_date": "2026-01-21",
            "start_time": "18:00",
            "end_time": "20:00",
            "is_recurring": 1,
            "founder_code": "21.5",
            "visit_type": "domestic",
            "recurring_days": ["Mon", "Thu"],
        })
    );
}

#[test]
fn single_shift_payload_carries_its_end_date() {
    let mut draft = recurring_draft();
    draft.recurring = false;
    draft.weekdays = Vec::new();
    draft.end_date = NaiveDate::from_ymd_opt(2026, 1, 22);

    let mut form = ShiftForm::new(draft);
    let payload = form.submit(today()).unwrap();
    assert_eq!(payload.is_recurring, 0);
    assert_eq!(payload.end_date.as_deref(), Some("2026-01-22"));
    assert_eq!(payload.recurring_days, None);
}

#[test]
fn invalid_draft_never_reaches_the_mutation_service() {
    let mut draft = recurring_draft();
    draft.start_date = None;
    let mut form = ShiftForm::new(draft);
    let service = RecordingService::default();

    let err = submit_shift(&mut form, today(), &service, &SilentNotifier).unwrap_err();
    let form_err = err.downcast::<FormError>().unwrap();
    match form_err {
        FormError::Invalid(errors) => {
            assert!(errors.get(ShiftField::StartDate).is_some());
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(service.created.borrow().is_empty());
    // Erreur locale : la soumission n'a jamais été armée.
    assert!(!form.is_pending());
}

#[test]
fn remote_failure_keeps_the_form_open_for_retry() {
    let mut form = ShiftForm::new(recurring_draft());
    let failing = RecordingService {
        fail: true,
        ..RecordingService::default()
    };
    assert!(submit_shift(&mut form, today(), &failing, &SilentNotifier).is_err());
    // État intact, prêt pour une nouvelle tentative.
    assert!(!form.is_pending());
    assert_eq!(form.draft().client, "c1");

    let service = RecordingService::default();
    submit_shift(&mut form, today(), &service, &SilentNotifier).unwrap();
    assert_eq!(service.created.borrow().len(), 1);
    // Succès : le formulaire repart vide.
    assert!(form.draft().client.is_empty());
}

#[test]
fn pending_form_refuses_a_second_submission() {
    let mut form = ShiftForm::new(recurring_draft());
    form.submit(today()).unwrap();
    assert!(form.is_pending());
    assert!(matches!(
        form.submit(today()),
        Err(FormError::SubmissionPending)
    ));

    // Fermer avant résolution abandonne l'état local.
    form.close();
    assert!(!form.is_pending());
    assert!(form.draft().client.is_empty());
}
