#![forbid(unsafe_code)]
use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use tournee::{
    io,
    calendar::{AnchorEngine, CalendarController, CalendarView, EventFilters},
    mapper::{map_all, RawScheduler},
    model::{weekday_from_code, Board, ResourceId, VisitId},
    notification::TextNotifier,
    storage::{JsonStorage, Storage},
    submit::{submit_bulk_action, submit_shift, CreateShiftPayload, MutationService, ShiftForm},
    validate::ShiftDraft,
    workflow::{BulkActionPayload, BulkWorkflow, WorkflowAction},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de rota de soins (sans backend réel)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du board (ressources + visites)
    #[arg(long, global = true, default_value = "board.json")]
    board: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des ressources (carers/clients) depuis un CSV
    ImportResources {
        #[arg(long)]
        csv: String,
    },

    /// Importer des visites depuis un CSV
    ImportVisits {
        #[arg(long)]
        csv: String,
    },

    /// Lister les visites et optionnellement exporter en évènements
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Valider et soumettre un nouveau shift (ponctuel ou récurrent)
    AddShift {
        #[arg(long)]
        client: String,
        /// liste "id1,id2,..."
        #[arg(long)]
        carers: String,
        #[arg(long, default_value = "")]
        title: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: Option<String>,
        /// YYYY-MM-DD (optionnel si récurrent)
        #[arg(long)]
        end_date: Option<String>,
        /// HH:MM
        #[arg(long)]
        start_time: Option<String>,
        /// HH:MM
        #[arg(long)]
        end_time: Option<String>,
        #[arg(long, default_value_t = false)]
        recurring: bool,
        /// liste "Mon,Tue,..." (récurrent uniquement)
        #[arg(long)]
        days: Option<String>,
        #[arg(long)]
        founder_code: Option<String>,
        #[arg(long)]
        call_slot: Option<String>,
        #[arg(long)]
        visit_type: Option<String>,
    },

    /// Dérouler le workflow groupé sur une sélection de visites
    Bulk {
        /// liste "1,3,..."
        #[arg(long)]
        visits: String,
        /// moveToVacant | reassign | cancel | reverseCancellation
        #[arg(long)]
        action: String,
        /// Motif d'annulation (action cancel)
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        comments: Option<String>,
        /// Carer cible (action reassign)
        #[arg(long)]
        carer: Option<String>,
    },

    /// Mapper une réponse backend (JSON) en évènements affichables
    MapEvents {
        #[arg(long)]
        json: String,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Naviguer dans la vue calendrier et afficher titre + ancrage
    View {
        /// resourceTimelineWeek | resourceTimelineDay | dayGridMonth |
        /// timeGridDay | timeGridWeek
        #[arg(long, default_value = "resourceTimelineWeek")]
        view: String,
        /// Date de départ YYYY-MM-DD (défaut : aujourd'hui)
        #[arg(long)]
        date: Option<String>,
        /// Commandes "prev,next,today,goto:YYYY-MM-DD" séparées par virgules
        #[arg(long)]
        nav: Option<String>,
        /// Filtre de statut (ex. Pending), "all" sinon
        #[arg(long)]
        status: Option<String>,
    },
}

/// Collaborateur de mutation de la CLI : imprime la charge utile telle
/// qu'elle partirait sur le fil.
struct PrintService;

impl MutationService for PrintService {
    fn create_shift(&self, payload: &CreateShiftPayload) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(payload)?);
        Ok(())
    }

    fn apply_bulk_action(&self, payload: &BulkActionPayload) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(payload)?);
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.board)?;
    let mut board = storage.load_or_empty()?;

    let code = match cli.cmd {
        Commands::ImportResources { csv } => {
            let resources = io::import_resources_csv(csv)?;
            board.resources.extend(resources);
            storage.save(&board)?;
            0
        }
        Commands::ImportVisits { csv } => {
            let visits = io::import_visits_csv(csv)?;
            board.visits.extend(visits);
            storage.save(&board)?;
            0
        }
        Commands::List { out_json, out_csv } => {
            use tournee::calendar::DataSource;
            // impression compacte
            for v in &board.visits {
                let carer = v
                    .carer
                    .as_ref()
                    .and_then(|id| board.find_resource(id))
                    .map(|r| r.title.as_str())
                    .unwrap_or("-");
                println!(
                    "{} | {} {} → {} | {} | {}",
                    v.id.value(),
                    v.date,
                    v.start,
                    v.end,
                    v.status.as_str(),
                    carer
                );
            }
            if out_json.is_some() || out_csv.is_some() {
                let (start, end) = visit_span(&board)?;
                let events = board.events(start, end)?;
                if let Some(path) = out_json {
                    io::export_events_json(path, &events)?;
                }
                if let Some(path) = out_csv {
                    io::export_events_csv(path, &events)?;
                }
            }
            0
        }
        Commands::AddShift {
            client,
            carers,
            title,
            start_date,
            end_date,
            start_time,
            end_time,
            recurring,
            days,
            founder_code,
            call_slot,
            visit_type,
        } => {
            let draft = ShiftDraft {
                title,
                client,
                carers: split_list(&carers).into_iter().map(ResourceId::new).collect(),
                founder_code,
                call_slot,
                visit_type,
                start_date: parse_opt_date(start_date.as_deref())?,
                end_date: parse_opt_date(end_date.as_deref())?,
                start_time: parse_opt_time(start_time.as_deref())?,
                end_time: parse_opt_time(end_time.as_deref())?,
                recurring,
                weekdays: parse_days(days.as_deref())?,
            };
            let mut form = ShiftForm::new(draft);
            let today = Utc::now().date_naive();
            match submit_shift(&mut form, today, &PrintService, &TextNotifier) {
                Ok(_) => 0,
                Err(err) => {
                    eprintln!("{err}");
                    2
                }
            }
        }
        Commands::Bulk {
            visits,
            action,
            reason,
            comments,
            carer,
        } => {
            let action = parse_action(&action)?;
            let mut workflow = BulkWorkflow::new(board.visits.clone(), board.resources.clone());
            let run = drive_workflow(&mut workflow, &visits, action, reason, comments, carer);
            match run {
                Ok(()) => {
                    println!(
                        "Review {} | {} | {} visit(s)",
                        workflow.id(),
                        action.label(),
                        workflow.selected_ids().len()
                    );
                    match submit_bulk_action(&mut workflow, &PrintService, &TextNotifier) {
                        Ok(_) => 0,
                        Err(err) => {
                            eprintln!("{err}");
                            2
                        }
                    }
                }
                Err(err) => {
                    eprintln!("{err}");
                    2
                }
            }
        }
        Commands::MapEvents {
            json,
            out_json,
            out_csv,
        } => {
            let data = std::fs::read(&json)?;
            let records: Vec<RawScheduler> = serde_json::from_slice(&data)?;
            let events = map_all(&records);
            println!(
                "Mapped {} event(s) from {} record(s)",
                events.len(),
                records.len()
            );
            for e in &events {
                println!("{} | {}", e.id, e.title);
            }
            if let Some(path) = out_json {
                io::export_events_json(path, &events)?;
            }
            if let Some(path) = out_csv {
                io::export_events_csv(path, &events)?;
            }
            if events.len() < records.len() {
                // Code 2 = WARNING/INCOMPLETE
                2
            } else {
                0
            }
        }
        Commands::View {
            view,
            date,
            nav,
            status,
        } => {
            let view: CalendarView = view.parse().map_err(|e: String| anyhow!(e))?;
            let today = match parse_opt_date(date.as_deref())? {
                Some(d) => d,
                None => Utc::now().date_naive(),
            };
            let engine = AnchorEngine::new(view, today);
            let mut controller = CalendarController::new(view, engine, board.clone())?;
            if let Some(status) = status {
                if status != "all" {
                    controller.set_event_filters(EventFilters {
                        status: Some(status.parse().map_err(|e: String| anyhow!(e))?),
                        shift_type: None,
                    });
                }
            }
            print_anchor(&controller);
            for step in nav.as_deref().map(split_list).unwrap_or_default() {
                match step.as_str() {
                    "prev" => controller.go_to_previous()?,
                    "next" => controller.go_to_next()?,
                    "today" => controller.go_to_today()?,
                    other => {
                        if let Some(raw) = other.strip_prefix("goto:") {
                            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")?;
                            controller.go_to_date(date)?;
                        } else {
                            bail!("unknown nav command: {other}");
                        }
                    }
                }
                print_anchor(&controller);
            }
            0
        }
    };

    std::process::exit(code);
}

fn print_anchor<E: tournee::TimelineEngine, S: tournee::DataSource>(
    controller: &CalendarController<E, S>,
) {
    println!(
        "{} | {} | {} | {} event(s)",
        controller.view().as_str(),
        controller.current_date(),
        controller.title(),
        controller.visible_events().len()
    );
}

fn drive_workflow(
    workflow: &mut BulkWorkflow,
    visits: &str,
    action: WorkflowAction,
    reason: Option<String>,
    comments: Option<String>,
    carer: Option<String>,
) -> Result<()> {
    for raw in split_list(visits) {
        let id: u64 = raw.parse().map_err(|_| anyhow!("invalid visit id: {raw}"))?;
        workflow.toggle_visit(VisitId::new(id))?;
    }
    workflow.next()?;
    workflow.choose_action(action)?;
    if let Some(reason) = reason {
        workflow.set_cancel_reason(reason)?;
    }
    if let Some(comments) = comments {
        workflow.set_cancel_comments(comments)?;
    }
    if let Some(carer) = carer {
        workflow.set_target_carer(ResourceId::new(carer))?;
    }
    workflow.next()?;
    Ok(())
}

fn parse_action(raw: &str) -> Result<WorkflowAction> {
    match raw {
        "moveToVacant" => Ok(WorkflowAction::MoveToVacant),
        "reassign" => Ok(WorkflowAction::Reassign),
        "cancel" => Ok(WorkflowAction::Cancel),
        "reverseCancellation" => Ok(WorkflowAction::ReverseCancellation),
        other => bail!("unknown action: {other}"),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_opt_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| anyhow!("invalid date: {s}"))
    })
    .transpose()
}

fn parse_opt_time(raw: Option<&str>) -> Result<Option<NaiveTime>> {
    raw.map(|s| NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| anyhow!("invalid time: {s}")))
        .transpose()
}

fn parse_days(raw: Option<&str>) -> Result<Vec<chrono::Weekday>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    split_list(raw)
        .into_iter()
        .map(|code| weekday_from_code(&code).ok_or_else(|| anyhow!("invalid weekday: {code}")))
        .collect()
}

fn visit_span(board: &Board) -> Result<(NaiveDate, NaiveDate)> {
    let start = board.visits.iter().map(|v| v.date).min();
    let end = board.visits.iter().map(|v| v.date).max();
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => bail!("no visit in board"),
    }
}
