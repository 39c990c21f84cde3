mod payload;
mod types;

pub use payload::{BulkActionPayload, Cancellation, NewCarer};
pub use types::{ActionAvailability, WorkflowAction, WorkflowError, WorkflowStep};

use crate::eligibility;
use crate::model::{Resource, ResourceId, Visit, VisitId};
use uuid::Uuid;

/// Workflow groupé en 3 étapes : sélection → action → revue.
///
/// Chaque instance possède son état en propre ; les listes de visites et
/// de carers sont injectées à la construction et lues seulement.
#[derive(Debug)]
pub struct BulkWorkflow {
    id: Uuid,
    visits: Vec<Visit>,
    carers: Vec<Resource>,
    step: WorkflowStep,
    /// Cases cochées de l'étape 1, mutables tant que rien n'est engagé.
    selection: Vec<VisitId>,
    /// Snapshot figé par "Next" ; les étapes suivantes ne lisent que lui.
    snapshot: Vec<VisitId>,
    action: Option<WorkflowAction>,
    cancel_reason: Option<String>,
    cancel_comments: Option<String>,
    target_carer: Option<ResourceId>,
    pending: bool,
}

impl BulkWorkflow {
    pub fn new(visits: Vec<Visit>, carers: Vec<Resource>) -> Self {
        Self {
            id: Uuid::new_v4(),
            visits,
            carers,
            step: WorkflowStep::SelectVisits,
            selection: Vec::new(),
            snapshot: Vec::new(),
            action: None,
            cancel_reason: None,
            cancel_comments: None,
            target_carer: None,
            pending: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn step(&self) -> WorkflowStep {
        self.step
    }
    pub fn action(&self) -> Option<WorkflowAction> {
        self.action
    }
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Sélection de référence : le snapshot une fois l'étape 1 engagée,
    /// les cases vivantes sinon.
    pub fn selected_ids(&self) -> &[VisitId] {
        match self.step {
            WorkflowStep::SelectVisits => &self.selection,
            _ => &self.snapshot,
        }
    }

    pub fn selected_visits(&self) -> Vec<&Visit> {
        self.selected_ids()
            .iter()
            .filter_map(|id| self.visits.iter().find(|v| v.id == *id))
            .collect()
    }

    /// Coche ou décoche une visite (étape 1 uniquement).
    pub fn toggle_visit(&mut self, id: VisitId) -> Result<(), WorkflowError> {
        if self.step != WorkflowStep::SelectVisits {
            return Err(WorkflowError::WrongStep {
                step: self.step.number(),
            });
        }
        let visit = self
            .visits
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| WorkflowError::unknown_visit(id))?;
        if !eligibility::is_eligible_for_bulk_action(visit) {
            return Err(WorkflowError::ineligible(id));
        }
        if let Some(pos) = self.selection.iter().position(|s| *s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id);
        }
        Ok(())
    }

    /// Coche toutes les visites éligibles, ou décoche tout si elles le
    /// sont déjà toutes.
    pub fn toggle_select_all(&mut self) -> Result<(), WorkflowError> {
        if self.step != WorkflowStep::SelectVisits {
            return Err(WorkflowError::WrongStep {
                step: self.step.number(),
            });
        }
        if !eligibility::is_select_all_eligible(&self.visits) {
            self.selection.clear();
            return Ok(());
        }
        let eligible: Vec<VisitId> = self
            .visits
            .iter()
            .filter(|v| eligibility::is_eligible_for_bulk_action(v))
            .map(|v| v.id)
            .collect();
        let all_selected = eligible.iter().all(|id| self.selection.contains(id));
        self.selection = if all_selected { Vec::new() } else { eligible };
        Ok(())
    }

    /// Disponibilité des quatre actions pour la sélection de référence.
    pub fn availability(&self) -> ActionAvailability {
        ActionAvailability::for_selection(self.selected_visits())
    }

    /// Sous-transition de l'étape 2 : ne fait pas avancer, vérifie le
    /// verrouillage. Changer d'action remet à zéro les champs annexes.
    pub fn choose_action(&mut self, action: WorkflowAction) -> Result<(), WorkflowError> {
        if self.step != WorkflowStep::SelectAction {
            return Err(WorkflowError::WrongStep {
                step: self.step.number(),
            });
        }
        if !self.availability().allows(action) {
            return Err(WorkflowError::ActionUnavailable(action));
        }
        if self.action != Some(action) {
            self.cancel_reason = None;
            self.cancel_comments = None;
            self.target_carer = None;
        }
        self.action = Some(action);
        Ok(())
    }

    pub fn set_cancel_reason<S: Into<String>>(&mut self, reason: S) -> Result<(), WorkflowError> {
        if self.action != Some(WorkflowAction::Cancel) {
            return Err(WorkflowError::WrongStep {
                step: self.step.number(),
            });
        }
        self.cancel_reason = Some(reason.into());
        Ok(())
    }

    pub fn set_cancel_comments<S: Into<String>>(
        &mut self,
        comments: S,
    ) -> Result<(), WorkflowError> {
        if self.action != Some(WorkflowAction::Cancel) {
            return Err(WorkflowError::WrongStep {
                step: self.step.number(),
            });
        }
        self.cancel_comments = Some(comments.into());
        Ok(())
    }

    pub fn set_target_carer(&mut self, carer: ResourceId) -> Result<(), WorkflowError> {
        if self.action != Some(WorkflowAction::Reassign) {
            return Err(WorkflowError::WrongStep {
                step: self.step.number(),
            });
        }
        if !self.carers.iter().any(|c| c.id == carer) {
            return Err(WorkflowError::UnknownCarer(carer.as_str().to_string()));
        }
        self.target_carer = Some(carer);
        Ok(())
    }

    /// Miroir de l'état "Next" grisé : vrai quand `next()` passerait.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WorkflowStep::SelectVisits => !self.selection.is_empty(),
            WorkflowStep::SelectAction => match self.action {
                None => false,
                Some(WorkflowAction::Cancel) => self.cancel_reason.is_some(),
                Some(WorkflowAction::Reassign) => self.target_carer.is_some(),
                Some(_) => true,
            },
            WorkflowStep::Review => false,
        }
    }

    /// "Next" : engage la sélection, ou passe en revue. Les quatre
    /// actions convergent sur la même étape de revue.
    pub fn next(&mut self) -> Result<(), WorkflowError> {
        match self.step {
            WorkflowStep::SelectVisits => {
                if self.selection.is_empty() {
                    return Err(WorkflowError::EmptySelection);
                }
                self.snapshot = self.selection.clone();
                self.step = WorkflowStep::SelectAction;
                Ok(())
            }
            WorkflowStep::SelectAction => {
                match self.action {
                    None => return Err(WorkflowError::NoActionChosen),
                    Some(WorkflowAction::Cancel) if self.cancel_reason.is_none() => {
                        return Err(WorkflowError::MissingCancelReason)
                    }
                    Some(WorkflowAction::Reassign) if self.target_carer.is_none() => {
                        return Err(WorkflowError::MissingTargetCarer)
                    }
                    Some(_) => {}
                }
                self.step = WorkflowStep::Review;
                Ok(())
            }
            WorkflowStep::Review => Err(WorkflowError::WrongStep { step: 3 }),
        }
    }

    /// "Back" : toujours permis. Quitter l'étape 2 oublie le choix
    /// d'action et ses champs annexes.
    pub fn back(&mut self) {
        match self.step {
            WorkflowStep::SelectVisits => {}
            WorkflowStep::SelectAction => {
                self.action = None;
                self.cancel_reason = None;
                self.cancel_comments = None;
                self.target_carer = None;
                self.step = WorkflowStep::SelectVisits;
            }
            WorkflowStep::Review => {
                self.step = WorkflowStep::SelectAction;
            }
        }
    }

    /// "Save" en revue : construit la charge utile discriminée et passe
    /// en attente de soumission. Une seule soumission à la fois.
    pub fn save(&mut self) -> Result<BulkActionPayload, WorkflowError> {
        if self.step != WorkflowStep::Review {
            return Err(WorkflowError::WrongStep {
                step: self.step.number(),
            });
        }
        if self.pending {
            return Err(WorkflowError::SubmissionPending);
        }
        let action = self.action.ok_or(WorkflowError::NoActionChosen)?;
        let visit_ids = self.snapshot.clone();

        let built = match action {
            WorkflowAction::MoveToVacant => BulkActionPayload::MoveToVacant { visit_ids },
            WorkflowAction::ReverseCancellation => {
                BulkActionPayload::ReverseCancellation { visit_ids }
            }
            WorkflowAction::Cancel => {
                let reason = self
                    .cancel_reason
                    .clone()
                    .ok_or(WorkflowError::MissingCancelReason)?;
                BulkActionPayload::Cancel {
                    visit_ids,
                    cancellation: Cancellation {
                        reason,
                        comments: self.cancel_comments.clone(),
                    },
                }
            }
            WorkflowAction::Reassign => {
                let target = self
                    .target_carer
                    .clone()
                    .ok_or(WorkflowError::MissingTargetCarer)?;
                let carer = self
                    .carers
                    .iter()
                    .find(|c| c.id == target)
                    .ok_or_else(|| WorkflowError::UnknownCarer(target.as_str().to_string()))?;
                BulkActionPayload::Reassign {
                    previous_carers: payload::previous_carers(
                        &self.selected_visits(),
                        &self.carers,
                    ),
                    visit_ids,
                    new_carer: NewCarer {
                        id: carer.id.clone(),
                        name: carer.title.clone(),
                    },
                }
            }
        };

        self.pending = true;
        Ok(built)
    }

    /// Le collaborateur a accepté : la session se ferme et repart vide.
    pub fn resolve_success(&mut self) {
        self.reset();
    }

    /// Échec de soumission : erreur récupérable, l'état reste intact
    /// pour permettre une nouvelle tentative.
    pub fn resolve_failure(&mut self) {
        self.pending = false;
    }

    /// Fermeture ou abandon à n'importe quelle étape. Ne tente pas
    /// d'annuler une requête déjà partie.
    pub fn close(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.id = Uuid::new_v4();
        self.step = WorkflowStep::SelectVisits;
        self.selection.clear();
        self.snapshot.clear();
        self.action = None;
        self.cancel_reason = None;
        self.cancel_comments = None;
        self.target_carer = None;
        self.pending = false;
    }
}
