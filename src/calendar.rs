//! Contrôleur de vue calendrier : possède l'état (vue, date courante,
//! recherche, sélection de ressources, filtres) et commande le moteur
//! de rendu externe. Après toute navigation, le moteur fait foi pour la
//! date d'ancrage.

use crate::model::{
    Board, CalendarEvent, EventSchedule, Resource, ResourceId, VisitStatus,
};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

/// Vues supportées, identifiants FullCalendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarView {
    ResourceTimelineWeek,
    ResourceTimelineDay,
    DayGridMonth,
    TimeGridDay,
    TimeGridWeek,
}

/// Granularité d'une vue, pour le pas de navigation et le titre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewGranularity {
    Day,
    Week,
    Month,
}

impl CalendarView {
    pub fn as_str(self) -> &'static str {
        match self {
            CalendarView::ResourceTimelineWeek => "resourceTimelineWeek",
            CalendarView::ResourceTimelineDay => "resourceTimelineDay",
            CalendarView::DayGridMonth => "dayGridMonth",
            CalendarView::TimeGridDay => "timeGridDay",
            CalendarView::TimeGridWeek => "timeGridWeek",
        }
    }

    pub fn granularity(self) -> ViewGranularity {
        match self {
            CalendarView::ResourceTimelineWeek | CalendarView::TimeGridWeek => {
                ViewGranularity::Week
            }
            CalendarView::ResourceTimelineDay | CalendarView::TimeGridDay => ViewGranularity::Day,
            CalendarView::DayGridMonth => ViewGranularity::Month,
        }
    }
}

impl std::str::FromStr for CalendarView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resourceTimelineWeek" => Ok(CalendarView::ResourceTimelineWeek),
            "resourceTimelineDay" => Ok(CalendarView::ResourceTimelineDay),
            "dayGridMonth" => Ok(CalendarView::DayGridMonth),
            "timeGridDay" => Ok(CalendarView::TimeGridDay),
            "timeGridWeek" => Ok(CalendarView::TimeGridWeek),
            other => Err(format!("unknown calendar view: {other}")),
        }
    }
}

/// Filtres d'évènements du bandeau. `None` = "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilters {
    pub status: Option<VisitStatus>,
    pub shift_type: Option<String>,
}

/// Moteur de rendu externe, réduit au contrat de synchronisation : le
/// cœur ne lit jamais son état interne au-delà de la date d'ancrage.
pub trait TimelineEngine {
    fn change_view(&mut self, view: CalendarView);
    fn prev(&mut self);
    fn next(&mut self);
    fn today(&mut self);
    fn goto_date(&mut self, date: NaiveDate);
    fn current_date(&self) -> NaiveDate;
}

/// Moteur de référence embarqué : suit l'ancrage comme le ferait le
/// moteur réel (pas de rendu). "Aujourd'hui" est fourni explicitement.
#[derive(Debug, Clone)]
pub struct AnchorEngine {
    view: CalendarView,
    anchor: NaiveDate,
    today: NaiveDate,
}

impl AnchorEngine {
    pub fn new(view: CalendarView, today: NaiveDate) -> Self {
        Self {
            view,
            anchor: snap(today, view.granularity()),
            today,
        }
    }
}

/// Début de période visible pour une granularité donnée (semaine au
/// lundi, comme le calendrier d'origine).
fn snap(date: NaiveDate, granularity: ViewGranularity) -> NaiveDate {
    match granularity {
        ViewGranularity::Day => date,
        ViewGranularity::Week => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
        ViewGranularity::Month => date.with_day(1).unwrap_or(date),
    }
}

impl TimelineEngine for AnchorEngine {
    fn change_view(&mut self, view: CalendarView) {
        self.view = view;
        // Changer de granularité peut déplacer l'ancrage visible.
        self.anchor = snap(self.anchor, view.granularity());
    }

    fn prev(&mut self) {
        self.anchor = match self.view.granularity() {
            ViewGranularity::Day => self.anchor - Duration::days(1),
            ViewGranularity::Week => self.anchor - Duration::days(7),
            ViewGranularity::Month => self
                .anchor
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.anchor),
        };
    }

    fn next(&mut self) {
        self.anchor = match self.view.granularity() {
            ViewGranularity::Day => self.anchor + Duration::days(1),
            ViewGranularity::Week => self.anchor + Duration::days(7),
            ViewGranularity::Month => self
                .anchor
                .checked_add_months(Months::new(1))
                .unwrap_or(self.anchor),
        };
    }

    fn today(&mut self) {
        self.anchor = snap(self.today, self.view.granularity());
    }

    fn goto_date(&mut self, date: NaiveDate) {
        self.anchor = snap(date, self.view.granularity());
    }

    fn current_date(&self) -> NaiveDate {
        self.anchor
    }
}

/// Collaborateur de lecture : listes de ressources et d'évènements,
/// rafraîchies à chaque changement de `(date courante, vue)`.
pub trait DataSource {
    fn resources(&self) -> anyhow::Result<Vec<Resource>>;
    fn events(&self, start: NaiveDate, end: NaiveDate) -> anyhow::Result<Vec<CalendarEvent>>;
}

impl DataSource for Board {
    fn resources(&self) -> anyhow::Result<Vec<Resource>> {
        Ok(self.resources.clone())
    }

    fn events(&self, start: NaiveDate, end: NaiveDate) -> anyhow::Result<Vec<CalendarEvent>> {
        Ok(self
            .visits
            .iter()
            .filter(|v| v.date >= start && v.date <= end)
            .map(|v| CalendarEvent {
                id: format!("visit-{}", v.id.value()),
                title: v.name.clone(),
                resource: v.carer.clone(),
                status: Some(v.status),
                shift_type: v.visit_type.clone(),
                schedule: EventSchedule::Timed {
                    start: NaiveDateTime::new(v.date, v.start),
                    end: NaiveDateTime::new(v.date, v.end),
                },
            })
            .collect())
    }
}

/// Contrôleur de vue. La source de données est injectée à la
/// construction : jamais de singleton global.
pub struct CalendarController<E, S> {
    engine: E,
    source: S,
    view: CalendarView,
    current_date: NaiveDate,
    search: String,
    selected: Vec<ResourceId>,
    filters: EventFilters,
    resources: Vec<Resource>,
    events: Vec<CalendarEvent>,
}

impl<E: TimelineEngine, S: DataSource> CalendarController<E, S> {
    pub fn new(view: CalendarView, mut engine: E, source: S) -> anyhow::Result<Self> {
        engine.change_view(view);
        let current_date = engine.current_date();
        let mut controller = Self {
            engine,
            source,
            view,
            current_date,
            search: String::new(),
            selected: Vec::new(),
            filters: EventFilters::default(),
            resources: Vec::new(),
            events: Vec::new(),
        };
        controller.refresh()?;
        Ok(controller)
    }

    pub fn view(&self) -> CalendarView {
        self.view
    }
    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Plage de requête dérivée de `(date courante, vue)` : la semaine
    /// visible en granularité semaine, le jour seul sinon.
    pub fn fetch_range(&self) -> (NaiveDate, NaiveDate) {
        match self.view.granularity() {
            ViewGranularity::Week => (self.current_date, self.current_date + Duration::days(6)),
            _ => (self.current_date, self.current_date),
        }
    }

    /// Recharge ressources et évènements depuis la source injectée.
    /// Toute recomputation en aval lit ces listes, jamais un instantané
    /// antérieur.
    pub fn refresh(&mut self) -> anyhow::Result<()> {
        let had = std::mem::take(&mut self.resources);
        self.resources = self.source.resources()?;
        let (start, end) = self.fetch_range();
        self.events = self.source.events(start, end)?;
        // La sélection persistée survit à une navigation ; elle repart
        // à "toutes les lignes" quand la liste de ressources change.
        let same_ids = had.len() == self.resources.len()
            && had
                .iter()
                .zip(self.resources.iter())
                .all(|(a, b)| a.id == b.id);
        if !same_ids {
            self.selected = self.resources.iter().map(|r| r.id.clone()).collect();
        }
        Ok(())
    }

    /// Change de vue puis relit l'ancrage : le moteur fait foi, changer
    /// de granularité peut déplacer la date visible.
    pub fn change_view(&mut self, view: CalendarView) -> anyhow::Result<()> {
        self.engine.change_view(view);
        self.view = view;
        self.sync_anchor()
    }

    pub fn go_to_previous(&mut self) -> anyhow::Result<()> {
        self.engine.prev();
        self.sync_anchor()
    }

    pub fn go_to_next(&mut self) -> anyhow::Result<()> {
        self.engine.next();
        self.sync_anchor()
    }

    pub fn go_to_today(&mut self) -> anyhow::Result<()> {
        self.engine.today();
        self.sync_anchor()
    }

    pub fn go_to_date(&mut self, date: NaiveDate) -> anyhow::Result<()> {
        self.engine.goto_date(date);
        self.sync_anchor()
    }

    fn sync_anchor(&mut self) -> anyhow::Result<()> {
        self.current_date = self.engine.current_date();
        self.refresh()
    }

    /// Recherche transitoire du panneau de ressources ; ne touche pas à
    /// la sélection persistée.
    pub fn set_resource_search<T: Into<String>>(&mut self, text: T) {
        self.search = text.into();
    }

    /// Ressources dont le titre ou les initiales contiennent la
    /// recherche, sans tenir compte de la casse.
    pub fn searched_resources(&self) -> Vec<&Resource> {
        let needle = self.search.trim().to_lowercase();
        self.resources
            .iter()
            .filter(|r| {
                r.title.to_lowercase().contains(&needle)
                    || r.initials.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Remplace la sélection persistée (les lignes réellement
    /// affichées), indépendamment du texte de recherche.
    pub fn apply_resource_selection(&mut self, selected: Vec<ResourceId>) {
        self.selected = selected;
    }

    pub fn visible_resources(&self) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|r| self.selected.contains(&r.id))
            .collect()
    }

    pub fn set_event_filters(&mut self, filters: EventFilters) {
        self.filters = filters;
    }

    /// Matrice statut × type : tout si les deux filtres sont "all",
    /// sinon chaque filtre actif doit correspondre.
    pub fn visible_events(&self) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|e| {
                let status_ok = match self.filters.status {
                    None => true,
                    Some(wanted) => e.status == Some(wanted),
                };
                let type_ok = match &self.filters.shift_type {
                    None => true,
                    Some(wanted) => e.shift_type.as_deref() == Some(wanted.as_str()),
                };
                status_ok && type_ok
            })
            .collect()
    }

    /// Titre du bandeau, fonction pure de `(date courante, vue)`.
    pub fn title(&self) -> String {
        format_title(self.current_date, self.view)
    }
}

/// "Month Year" en granularité semaine, "Month Day, Year" sinon.
pub fn format_title(date: NaiveDate, view: CalendarView) -> String {
    match view.granularity() {
        ViewGranularity::Week => date.format("%B %Y").to_string(),
        _ => date.format("%B %-d, %Y").to_string(),
    }
}
