//! Prédicats purs sur les statuts de visite. Recalculés à chaque
//! changement de sélection, jamais mis en cache.

use crate::model::{Visit, VisitStatus};

/// Une visite terminée ne peut plus entrer dans une action groupée.
pub fn is_eligible_for_bulk_action(visit: &Visit) -> bool {
    visit.status != VisitStatus::Completed
}

/// "Tout sélectionner" n'a de sens que s'il reste au moins une visite éligible.
pub fn is_select_all_eligible(visits: &[Visit]) -> bool {
    visits.iter().any(is_eligible_for_bulk_action)
}

/// Vrai ssi la sélection est non vide et entièrement annulée.
pub fn all_cancelled<'a, I>(selection: I) -> bool
where
    I: IntoIterator<Item = &'a Visit>,
{
    let mut any = false;
    for visit in selection {
        if visit.status != VisitStatus::Cancelled {
            return false;
        }
        any = true;
    }
    any
}

pub fn has_cancelled<'a, I>(selection: I) -> bool
where
    I: IntoIterator<Item = &'a Visit>,
{
    selection
        .into_iter()
        .any(|v| v.status == VisitStatus::Cancelled)
}

pub fn has_non_cancelled<'a, I>(selection: I) -> bool
where
    I: IntoIterator<Item = &'a Visit>,
{
    selection
        .into_iter()
        .any(|v| v.status != VisitStatus::Cancelled)
}
