#![forbid(unsafe_code)]
//! Tournee — cœur métier d'un tableau de bord de rota de soins à
//! domicile (sans rendu, sans transport réseau).
//!
//! - Modèle visites / ressources / shifts ponctuels ou récurrents.
//! - Workflow groupé en 3 étapes (sélection → action → revue).
//! - Validation de formulaire objet entier, erreurs par champ.
//! - Contrôleur de vue synchronisé avec un moteur de timeline externe.
//! - Collaborateurs (rendu, données, mutation, notification) en traits.

pub mod calendar;
pub mod eligibility;
pub mod io;
pub mod mapper;
pub mod model;
pub mod notification;
pub mod storage;
pub mod submit;
pub mod validate;
pub mod workflow;

pub use calendar::{
    format_title, AnchorEngine, CalendarController, CalendarView, DataSource, EventFilters,
    TimelineEngine, ViewGranularity,
};
pub use mapper::{map_all, map_scheduler, MapError, RawScheduler, SchedulerPivot};
pub use model::{
    Board, CalendarEvent, EventSchedule, Resource, ResourceId, ShiftPattern, ShiftRecord, Visit,
    VisitId, VisitStatus,
};
pub use notification::{OutcomeNotifier, SilentNotifier, TextNotifier};
pub use storage::{JsonStorage, Storage};
pub use submit::{
    submit_bulk_action, submit_shift, CreateShiftPayload, FormError, MutationService, ShiftForm,
};
pub use validate::{ShiftDraft, ShiftField, ValidationErrors};
pub use workflow::{
    ActionAvailability, BulkActionPayload, BulkWorkflow, Cancellation, NewCarer, WorkflowAction,
    WorkflowError, WorkflowStep,
};
