use crate::model::{Resource, ResourceId, Visit, VisitId};
use serde::Serialize;

/// Nouveau carer choisi pour une réassignation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCarer {
    pub id: ResourceId,
    pub name: String,
}

/// Motif + commentaires d'une annulation groupée.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cancellation {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Charge utile discriminée envoyée au collaborateur de mutation.
/// La forme JSON doit coller bit à bit au backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BulkActionPayload {
    #[serde(rename_all = "camelCase")]
    Reassign {
        visit_ids: Vec<VisitId>,
        previous_carers: String,
        new_carer: NewCarer,
    },
    #[serde(rename_all = "camelCase")]
    Cancel {
        visit_ids: Vec<VisitId>,
        cancellation: Cancellation,
    },
    #[serde(rename_all = "camelCase")]
    MoveToVacant { visit_ids: Vec<VisitId> },
    #[serde(rename_all = "camelCase")]
    ReverseCancellation { visit_ids: Vec<VisitId> },
}

impl BulkActionPayload {
    pub fn visit_ids(&self) -> &[VisitId] {
        match self {
            BulkActionPayload::Reassign { visit_ids, .. }
            | BulkActionPayload::Cancel { visit_ids, .. }
            | BulkActionPayload::MoveToVacant { visit_ids }
            | BulkActionPayload::ReverseCancellation { visit_ids } => visit_ids,
        }
    }
}

/// Noms distincts des carers du lot sélectionné, ordre de première
/// apparition, joints par des virgules. Calculé sur le snapshot, pas sur
/// l'état vivant.
pub(super) fn previous_carers(snapshot: &[&Visit], carers: &[Resource]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for visit in snapshot {
        let Some(carer_id) = visit.carer.as_ref() else {
            continue;
        };
        let Some(carer) = carers.iter().find(|c| &c.id == carer_id) else {
            continue;
        };
        if !seen.contains(&carer.title.as_str()) {
            seen.push(&carer.title);
        }
    }
    seen.join(", ")
}
