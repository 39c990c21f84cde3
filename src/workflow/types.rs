use crate::eligibility;
use crate::model::{Visit, VisitId};
use thiserror::Error;

/// Étape courante du workflow groupé.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    SelectVisits,
    SelectAction,
    Review,
}

impl WorkflowStep {
    pub fn number(self) -> u8 {
        match self {
            WorkflowStep::SelectVisits => 1,
            WorkflowStep::SelectAction => 2,
            WorkflowStep::Review => 3,
        }
    }
}

/// Les quatre opérations mutuellement exclusives de l'étape 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    MoveToVacant,
    Reassign,
    Cancel,
    ReverseCancellation,
}

impl WorkflowAction {
    pub fn label(self) -> &'static str {
        match self {
            WorkflowAction::MoveToVacant => "Move to Vacant",
            WorkflowAction::Reassign => "Reassign Visits",
            WorkflowAction::Cancel => "Cancel",
            WorkflowAction::ReverseCancellation => "Reverse Cancellation",
        }
    }
}

/// État activé/désactivé des quatre cartes d'action pour une sélection
/// donnée. Recalculé à la volée depuis `eligibility`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionAvailability {
    pub move_to_vacant: bool,
    pub reassign: bool,
    pub cancel: bool,
    pub reverse_cancellation: bool,
}

impl ActionAvailability {
    pub fn for_selection<'a, I>(selection: I) -> Self
    where
        I: IntoIterator<Item = &'a Visit> + Clone,
    {
        let all_cancelled = eligibility::all_cancelled(selection.clone());
        // Toute visite annulée dans le lot bloque les trois actions standard.
        let standard = eligibility::has_non_cancelled(selection.clone())
            && !eligibility::has_cancelled(selection);
        Self {
            move_to_vacant: standard,
            reassign: standard,
            cancel: standard,
            reverse_cancellation: all_cancelled,
        }
    }

    pub fn allows(&self, action: WorkflowAction) -> bool {
        match action {
            WorkflowAction::MoveToVacant => self.move_to_vacant,
            WorkflowAction::Reassign => self.reassign,
            WorkflowAction::Cancel => self.cancel,
            WorkflowAction::ReverseCancellation => self.reverse_cancellation,
        }
    }
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("unknown visit: {0}")]
    UnknownVisit(u64),
    #[error("visit {0} is not eligible for bulk actions")]
    IneligibleVisit(u64),
    #[error("no visit selected")]
    EmptySelection,
    #[error("action {0:?} is not available for this selection")]
    ActionUnavailable(WorkflowAction),
    #[error("no action chosen")]
    NoActionChosen,
    #[error("cancellation requires a reason")]
    MissingCancelReason,
    #[error("reassignment requires a target carer")]
    MissingTargetCarer,
    #[error("unknown carer: {0}")]
    UnknownCarer(String),
    #[error("step {step} does not accept this command")]
    WrongStep { step: u8 },
    #[error("a submission is already pending for this workflow")]
    SubmissionPending,
}

impl WorkflowError {
    pub(super) fn unknown_visit(id: VisitId) -> Self {
        WorkflowError::UnknownVisit(id.value())
    }
    pub(super) fn ineligible(id: VisitId) -> Self {
        WorkflowError::IneligibleVisit(id.value())
    }
}
