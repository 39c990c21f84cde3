//! Conversion d'un enregistrement brut du backend de planification en
//! évènement affichable. Un enregistrement inclassable est fatal pour
//! lui seul : averti puis sauté, jamais propagé à toute la liste.

use crate::model::{CalendarEvent, EventSchedule, ResourceId};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use thiserror::Error;

/// Référence pivot carer ↔ scheduler, telle que servie par l'API.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerPivot {
    pub carer_id: String,
    pub scheduler_id: String,
}

/// Enregistrement de planification brut : tout en chaînes, y compris le
/// drapeau `is_recurring` ("0" | "1").
#[derive(Debug, Clone, Deserialize)]
pub struct RawScheduler {
    pub id: String,
    pub client_id: String,
    pub title: String,
    /// YYYY-MM-DD
    pub start_date: String,
    /// YYYY-MM-DD
    pub end_date: String,
    /// HH:MM:SS
    pub start_time: String,
    /// HH:MM:SS
    pub end_time: String,
    pub is_recurring: String,
    pub pivot: SchedulerPivot,
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("scheduler {id}: ambiguous is_recurring flag: {value:?}")]
    AmbiguousRecurrence { id: String, value: String },
    #[error("scheduler {id}: invalid date {value:?}")]
    InvalidDate { id: String, value: String },
    #[error("scheduler {id}: invalid time {value:?}")]
    InvalidTime { id: String, value: String },
}

/// Construit un évènement depuis un enregistrement brut.
///
/// Récurrent : les sept jours par défaut (la source ne porte pas encore
/// de masque hebdomadaire par enregistrement) et pas de date de fin.
/// Ponctuel : date + heures combinées en deux instants.
///
/// L'identifiant affiché est dérivé de `(scheduler_id, start_date)` :
/// l'ancien suffixe aléatoire cassait la stabilité référentielle entre
/// deux rechargements.
pub fn map_scheduler(raw: &RawScheduler) -> Result<CalendarEvent, MapError> {
    let recurring = match raw.is_recurring.as_str() {
        "1" => true,
        "0" => false,
        other => {
            return Err(MapError::AmbiguousRecurrence {
                id: raw.id.clone(),
                value: other.to_string(),
            })
        }
    };

    let start_date = parse_date(&raw.id, &raw.start_date)?;
    let start_time = parse_time(&raw.id, &raw.start_time)?;
    let end_time = parse_time(&raw.id, &raw.end_time)?;

    let schedule = if recurring {
        EventSchedule::Recurring {
            days_of_week: (0..=6).collect(),
            start_time,
            end_time,
            start_recur: start_date,
        }
    } else {
        let end_date = parse_date(&raw.id, &raw.end_date)?;
        EventSchedule::Timed {
            start: NaiveDateTime::new(start_date, start_time),
            end: NaiveDateTime::new(end_date, end_time),
        }
    };

    Ok(CalendarEvent {
        id: format!("{}-{}", raw.id, start_date.format("%Y-%m-%d")),
        title: raw.title.clone(),
        resource: Some(ResourceId::new(&raw.pivot.carer_id)),
        status: None,
        shift_type: None,
        schedule,
    })
}

/// Mappe toute une réponse backend ; les enregistrements invalides sont
/// signalés puis sautés.
pub fn map_all(records: &[RawScheduler]) -> Vec<CalendarEvent> {
    let mut events = Vec::with_capacity(records.len());
    for raw in records {
        match map_scheduler(raw) {
            Ok(event) => events.push(event),
            Err(err) => {
                eprintln!("Warning: skipping scheduler record: {err}");
            }
        }
    }
    events
}

fn parse_date(id: &str, raw: &str) -> Result<NaiveDate, MapError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| MapError::InvalidDate {
        id: id.to_string(),
        value: raw.to_string(),
    })
}

fn parse_time(id: &str, raw: &str) -> Result<NaiveTime, MapError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| MapError::InvalidTime {
            id: id.to_string(),
            value: raw.to_string(),
        })
}
