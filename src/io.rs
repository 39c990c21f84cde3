use crate::model::{CalendarEvent, EventSchedule, Resource, ResourceId, Visit, VisitId};
use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de ressources depuis CSV: header `id,title,initials[,hours][,color]`
pub fn import_resources_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Resource>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let title = rec.get(1).context("missing title")?.trim();
        let initials = rec.get(2).context("missing initials")?.trim();
        if id.is_empty() || title.is_empty() {
            bail!("invalid resource row (empty)");
        }
        let mut resource = Resource {
            id: ResourceId::new(id),
            title: title.to_string(),
            initials: initials.to_string(),
            hours: None,
            color: None,
        };
        if let Some(hours) = rec.get(3) {
            let hours = hours.trim();
            if !hours.is_empty() {
                resource.hours = Some(
                    hours
                        .parse()
                        .with_context(|| format!("invalid hours value for resource {id}"))?,
                );
            }
        }
        if let Some(color) = rec.get(4) {
            let color = color.trim();
            if !color.is_empty() {
                resource.color = Some(color.to_string());
            }
        }
        out.push(resource);
    }
    Ok(out)
}

/// Import de visites depuis CSV:
/// header `id,name,status,date,start,end,location[,carer_id][,visit_type]`
pub fn import_visits_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Visit>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id: u64 = rec
            .get(0)
            .context("missing id")?
            .trim()
            .parse()
            .context("visit id must be numeric")?;
        let name = rec.get(1).context("missing name")?.trim().to_string();
        let status = rec
            .get(2)
            .context("missing status")?
            .trim()
            .parse()
            .map_err(anyhow::Error::msg)?;
        let date = parse_date(rec.get(3).context("missing date")?.trim())?;
        let start = parse_time(rec.get(4).context("missing start")?.trim())?;
        let end = parse_time(rec.get(5).context("missing end")?.trim())?;
        let location = rec.get(6).context("missing location")?.trim().to_string();
        let carer = rec
            .get(7)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ResourceId::new);
        let visit_type = rec
            .get(8)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        out.push(Visit {
            id: VisitId::new(id),
            name,
            status,
            date,
            start,
            end,
            location,
            carer,
            visit_type,
        });
    }
    Ok(out)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

fn parse_time(raw: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("invalid time: {raw}"))
}

/// Export JSON d'une liste d'évènements (jolie mise en forme)
pub fn export_events_json<P: AsRef<Path>>(path: P, events: &[CalendarEvent]) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(events)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des évènements: header `id,title,resource,status,start,end`
pub fn export_events_csv<P: AsRef<Path>>(path: P, events: &[CalendarEvent]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "title", "resource", "status", "start", "end"])?;
    for e in events {
        let resource = e.resource.as_ref().map(|r| r.as_str()).unwrap_or("");
        let status = e.status.map(|s| s.as_str()).unwrap_or("");
        let (start, end) = match &e.schedule {
            EventSchedule::Timed { start, end } => (start.to_string(), end.to_string()),
            EventSchedule::Recurring {
                start_time,
                end_time,
                ..
            } => (start_time.to_string(), end_time.to_string()),
        };
        w.write_record([
            e.id.as_str(),
            e.title.as_str(),
            resource,
            status,
            start.as_str(),
            end.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
