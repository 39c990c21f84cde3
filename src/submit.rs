//! Frontière de soumission : formes sur le fil, collaborateur de
//! mutation et garde "une seule soumission en vol par instance".

use crate::model::{weekday_code, ShiftPattern, ShiftRecord};
use crate::notification::OutcomeNotifier;
use crate::validate::{ShiftDraft, ValidationErrors};
use crate::workflow::{BulkActionPayload, BulkWorkflow};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Forme sur le fil pour la création d'un shift. Doit coller bit à bit
/// au backend : snake_case, optionnels absents omis, `is_recurring` 0|1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateShiftPayload {
    pub title: String,
    pub client_id: String,
    pub carers: Vec<String>,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub is_recurring: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founder_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_slot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_days: Option<Vec<String>>,
}

impl CreateShiftPayload {
    pub fn from_record(record: &ShiftRecord) -> Self {
        let (start_date, end_date, is_recurring, recurring_days) = match &record.pattern {
            ShiftPattern::Single {
                start_date,
                end_date,
            } => (*start_date, Some(*end_date), 0, None),
            ShiftPattern::Recurring {
                start_date,
                end_date,
                days,
            } => (
                *start_date,
                *end_date,
                1,
                Some(days.iter().map(|d| weekday_code(*d).to_string()).collect()),
            ),
        };

        Self {
            title: record.title.clone(),
            client_id: record.client.clone(),
            carers: record
                .carers
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            start_date: start_date.format("%Y-%m-%d").to_string(),
            end_date: end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            start_time: record.start_time.format("%H:%M").to_string(),
            end_time: record.end_time.format("%H:%M").to_string(),
            is_recurring,
            founder_code: record.founder_code.clone(),
            call_slot: record.call_slot.clone(),
            visit_type: record.visit_type.clone(),
            recurring_days,
        }
    }
}

/// Collaborateur de mutation externe. Le cœur s'arrête à lui remettre
/// une charge utile validée ; les erreurs remontent telles quelles.
pub trait MutationService {
    fn create_shift(&self, payload: &CreateShiftPayload) -> anyhow::Result<()>;
    fn apply_bulk_action(&self, payload: &BulkActionPayload) -> anyhow::Result<()>;
}

#[derive(Error, Debug)]
pub enum FormError {
    /// Jamais transmis au collaborateur : résolu localement.
    #[error("shift draft is invalid:\n{0}")]
    Invalid(ValidationErrors),
    #[error("a submission is already pending for this form")]
    SubmissionPending,
}

/// Formulaire de création ouvert. Porte le brouillon et le drapeau
/// "soumission en vol" de l'instance.
#[derive(Debug, Default)]
pub struct ShiftForm {
    draft: ShiftDraft,
    pending: bool,
}

impl ShiftForm {
    pub fn new(draft: ShiftDraft) -> Self {
        Self {
            draft,
            pending: false,
        }
    }

    pub fn draft(&self) -> &ShiftDraft {
        &self.draft
    }
    pub fn draft_mut(&mut self) -> &mut ShiftDraft {
        &mut self.draft
    }
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Valide le brouillon et arme la soumission. Le bouton reste grisé
    /// tant que la précédente n'est pas résolue.
    pub fn submit(&mut self, today: NaiveDate) -> Result<CreateShiftPayload, FormError> {
        if self.pending {
            return Err(FormError::SubmissionPending);
        }
        let record = self
            .draft
            .clone()
            .into_record(today)
            .map_err(FormError::Invalid)?;
        self.pending = true;
        Ok(CreateShiftPayload::from_record(&record))
    }

    /// Échec distant : état intact, nouvelle tentative possible.
    pub fn resolve_failure(&mut self) {
        self.pending = false;
    }

    /// Succès : le formulaire se vide.
    pub fn resolve_success(&mut self) {
        self.draft = ShiftDraft::default();
        self.pending = false;
    }

    /// Fermer avant résolution abandonne l'état local, sans chercher à
    /// rappeler la requête partie.
    pub fn close(&mut self) {
        self.draft = ShiftDraft::default();
        self.pending = false;
    }
}

/// Soumet le formulaire au collaborateur et résout l'instance selon
/// l'issue. L'erreur distante est propagée, pas interprétée.
pub fn submit_shift(
    form: &mut ShiftForm,
    today: NaiveDate,
    service: &dyn MutationService,
    notifier: &dyn OutcomeNotifier,
) -> anyhow::Result<CreateShiftPayload> {
    let payload = form.submit(today)?;
    match service.create_shift(&payload) {
        Ok(()) => {
            form.resolve_success();
            notifier.submitted(&format!("shift created for client {}", payload.client_id));
            Ok(payload)
        }
        Err(err) => {
            form.resolve_failure();
            notifier.failed("shift creation rejected", &err);
            Err(err)
        }
    }
}

/// Idem pour le workflow groupé : construit la charge depuis la revue,
/// l'expédie, et ferme ou rouvre la session selon l'issue.
pub fn submit_bulk_action(
    workflow: &mut BulkWorkflow,
    service: &dyn MutationService,
    notifier: &dyn OutcomeNotifier,
) -> anyhow::Result<BulkActionPayload> {
    let payload = workflow.save()?;
    match service.apply_bulk_action(&payload) {
        Ok(()) => {
            let count = payload.visit_ids().len();
            workflow.resolve_success();
            notifier.submitted(&format!("bulk action applied to {count} visit(s)"));
            Ok(payload)
        }
        Err(err) => {
            workflow.resolve_failure();
            notifier.failed("bulk action rejected", &err);
            Err(err)
        }
    }
}
