use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour Visit (numérique côté backend)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisitId(u64);

impl VisitId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Identifiant fort pour Resource (carer ou client, chaîne opaque)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Statut d'une visite, orthographe exacte du backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitStatus {
    Pending,
    Completed,
    InProgress,
    Cancelled,
    Confirmed,
    Vacant,
    Dropped,
    JobBoard,
}

impl VisitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VisitStatus::Pending => "Pending",
            VisitStatus::Completed => "Completed",
            VisitStatus::InProgress => "InProgress",
            VisitStatus::Cancelled => "Cancelled",
            VisitStatus::Confirmed => "Confirmed",
            VisitStatus::Vacant => "Vacant",
            VisitStatus::Dropped => "Dropped",
            VisitStatus::JobBoard => "JobBoard",
        }
    }
}

impl std::str::FromStr for VisitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(VisitStatus::Pending),
            "Completed" => Ok(VisitStatus::Completed),
            "InProgress" => Ok(VisitStatus::InProgress),
            "Cancelled" => Ok(VisitStatus::Cancelled),
            "Confirmed" => Ok(VisitStatus::Confirmed),
            "Vacant" => Ok(VisitStatus::Vacant),
            "Dropped" => Ok(VisitStatus::Dropped),
            "JobBoard" => Ok(VisitStatus::JobBoard),
            other => Err(format!("unknown visit status: {other}")),
        }
    }
}

/// Une occurrence de soin à délivrer. Mutée uniquement via le workflow
/// ou le formulaire de création, jamais supprimée.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id: VisitId,
    pub name: String,
    pub status: VisitStatus,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub location: String,
    /// None = créneau vacant.
    #[serde(default)]
    pub carer: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_type: Option<String>,
}

/// Ligne de la timeline (carer ou client). La couleur est portée telle
/// quelle pour la présentation, jamais calculée ici.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub initials: String,
    #[serde(default)]
    pub hours: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Resource {
    pub fn new<T: Into<String>, I: Into<String>>(title: T, initials: I) -> Self {
        Self {
            id: ResourceId::random(),
            title: title.into(),
            initials: initials.into(),
            hours: None,
            color: None,
        }
    }
}

/// Récurrence d'un ShiftRecord : exactement une des deux formes.
#[derive(Debug, Clone, PartialEq)]
pub enum ShiftPattern {
    Single {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    Recurring {
        start_date: NaiveDate,
        /// None = récurrence ouverte.
        end_date: Option<NaiveDate>,
        days: Vec<Weekday>,
    },
}

impl ShiftPattern {
    pub fn is_recurring(&self) -> bool {
        matches!(self, ShiftPattern::Recurring { .. })
    }

    pub fn start_date(&self) -> NaiveDate {
        match self {
            ShiftPattern::Single { start_date, .. } => *start_date,
            ShiftPattern::Recurring { start_date, .. } => *start_date,
        }
    }
}

/// Unité persistée lors de la planification d'un nouveau shift.
/// Sort toujours validé de `ShiftDraft::into_record`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftRecord {
    pub title: String,
    pub client: String,
    pub carers: Vec<ResourceId>,
    pub founder_code: Option<String>,
    pub call_slot: Option<String>,
    pub visit_type: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub pattern: ShiftPattern,
}

/// Forme affichable d'un évènement côté timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventSchedule {
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Recurring {
        /// Convention FullCalendar : 0 = dimanche.
        days_of_week: Vec<u8>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        start_recur: NaiveDate,
    },
}

/// Évènement prêt pour le moteur de rendu externe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VisitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_type: Option<String>,
    #[serde(flatten)]
    pub schedule: EventSchedule,
}

/// Agrégat injecté (ressources + visites). Remplace les listes de démo
/// globales du tableau de bord d'origine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Board {
    pub resources: Vec<Resource>,
    pub visits: Vec<Visit>,
}

impl Board {
    pub fn find_resource<'a>(&'a self, id: &ResourceId) -> Option<&'a Resource> {
        self.resources.iter().find(|r| &r.id == id)
    }
}

/// Code court utilisé sur le fil (`recurring_days`, CSV).
pub fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code {
        "Mon" => Some(Weekday::Mon),
        "Tue" => Some(Weekday::Tue),
        "Wed" => Some(Weekday::Wed),
        "Thu" => Some(Weekday::Thu),
        "Fri" => Some(Weekday::Fri),
        "Sat" => Some(Weekday::Sat),
        "Sun" => Some(Weekday::Sun),
        _ => None,
    }
}
