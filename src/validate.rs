//! Validation d'un brouillon de shift avant soumission. Les règles sont
//! vérifiées objet entier (plusieurs dépendent du mode récurrent) et
//! toutes les violations sont collectées, sauf qu'une date absente
//! masque les contrôles d'ordre qui en dépendent.

use crate::model::{ResourceId, ShiftPattern, ShiftRecord};
use chrono::{NaiveDate, NaiveTime, Weekday};
use std::collections::BTreeMap;
use std::fmt;

/// Champ du formulaire porteur d'une erreur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShiftField {
    Client,
    Carers,
    StartDate,
    EndDate,
    StartTime,
    EndTime,
    RecurringDays,
}

impl ShiftField {
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftField::Client => "client",
            ShiftField::Carers => "carers",
            ShiftField::StartDate => "start_date",
            ShiftField::EndDate => "end_date",
            ShiftField::StartTime => "start_time",
            ShiftField::EndTime => "end_time",
            ShiftField::RecurringDays => "recurring_days",
        }
    }
}

/// Erreurs par champ, rendues toutes en même temps par l'appelant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    by_field: BTreeMap<ShiftField, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }
    pub fn len(&self) -> usize {
        self.by_field.len()
    }
    pub fn get(&self, field: ShiftField) -> Option<&str> {
        self.by_field.get(&field).map(String::as_str)
    }
    pub fn iter(&self) -> impl Iterator<Item = (ShiftField, &str)> {
        self.by_field.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn push(&mut self, field: ShiftField, message: &str) {
        self.by_field.entry(field).or_insert_with(|| message.to_string());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.by_field {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}: {}", field.as_str(), message)?;
            first = false;
        }
        Ok(())
    }
}

/// Brouillon tel que le formulaire le tient : tout optionnel, rien de
/// garanti. `into_record` est la seule sortie vers un `ShiftRecord`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftDraft {
    pub title: String,
    pub client: String,
    pub carers: Vec<ResourceId>,
    pub founder_code: Option<String>,
    pub call_slot: Option<String>,
    pub visit_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub recurring: bool,
    pub weekdays: Vec<Weekday>,
}

impl ShiftDraft {
    /// Applique toutes les règles ; `today` est fourni par l'appelant
    /// (comparaison date seule, heure tronquée à minuit).
    pub fn validate(&self, today: NaiveDate) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        if self.client.trim().is_empty() {
            errors.push(ShiftField::Client, "please enter a client name");
        }
        if self.carers.is_empty() {
            errors.push(ShiftField::Carers, "please select a carer");
        }

        match self.start_date {
            None => errors.push(ShiftField::StartDate, "please select a start date"),
            Some(start) => {
                if start < today {
                    errors.push(ShiftField::StartDate, "start date cannot be in the past");
                }
                // L'ordre n'est contrôlé que si les deux dates existent.
                if let Some(end) = self.end_date {
                    if end < start {
                        errors.push(ShiftField::EndDate, "end date must be after start date");
                    }
                }
            }
        }
        // La date de fin n'est exigée qu'en mode non récurrent.
        if self.end_date.is_none() && !self.recurring {
            errors.push(ShiftField::EndDate, "please select an end date");
        }

        if self.start_time.is_none() {
            errors.push(ShiftField::StartTime, "please select a start time");
        }
        if self.end_time.is_none() {
            errors.push(ShiftField::EndTime, "please select an end time");
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            // Comparaison même jour : les shifts de nuit ne sont pas
            // représentables.
            if end <= start {
                errors.push(ShiftField::EndTime, "end time must be after start time");
            }
        }

        if self.recurring && self.weekdays.is_empty() {
            errors.push(
                ShiftField::RecurringDays,
                "please select at least one weekday",
            );
        }

        errors
    }

    /// Valide puis fige le brouillon en enregistrement typé.
    pub fn into_record(self, today: NaiveDate) -> Result<ShiftRecord, ValidationErrors> {
        let errors = self.validate(today);
        if !errors.is_empty() {
            return Err(errors);
        }

        // Après validation, les unwrap ci-dessous sont garantis par les
        // règles de présence.
        let start_date = self.start_date.expect("validated");
        let pattern = if self.recurring {
            ShiftPattern::Recurring {
                start_date,
                end_date: self.end_date,
                days: self.weekdays,
            }
        } else {
            ShiftPattern::Single {
                start_date,
                end_date: self.end_date.expect("validated"),
            }
        };

        Ok(ShiftRecord {
            title: self.title,
            client: self.client,
            carers: self.carers,
            founder_code: self.founder_code,
            call_slot: self.call_slot,
            visit_type: self.visit_type,
            start_time: self.start_time.expect("validated"),
            end_time: self.end_time.expect("validated"),
            pattern,
        })
    }
}
