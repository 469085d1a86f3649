//! List command implementation.

use anyhow::{Result, bail};
use clap::Args;
use clinic_core::{RecordFilter, ResourceKind, Route};
use colored::Colorize;
use serde_json::Value;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Resource (doctors, patients, appointments, diagnoses, prescriptions)
    pub kind: ResourceKind,

    /// Only show records containing this text
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only show doctors with this specialisation
    #[arg(long, alias = "specialization")]
    pub specialisation: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ListArgs {
    fn filter(&self) -> Result<RecordFilter> {
        let mut filter = RecordFilter::new();
        if let Some(term) = &self.search {
            filter = filter.search(term);
        }
        if let Some(specialisation) = &self.specialisation {
            if self.kind != ResourceKind::Doctors {
                bail!("--specialisation only applies to doctors");
            }
            filter = filter.specialisation(specialisation);
        }
        Ok(filter)
    }
}

pub async fn run(args: ListArgs, app: &mut App) -> Result<()> {
    let filter = args.filter()?;
    app.navigate(Route::Index(args.kind), None);

    let records = fetch(app, args.kind).await?;
    render(args.kind, filter.apply(args.kind, records), args.pretty)
}

/// Render the collection screen for `kind`.
pub async fn index(app: &mut App, kind: ResourceKind, pretty: bool) -> Result<()> {
    let records = fetch(app, kind).await?;
    render(kind, records, pretty)
}

/// Fetch every record of `kind`.
pub async fn fetch(app: &mut App, kind: ResourceKind) -> Result<Vec<Value>> {
    let ticket = app.ticket();
    let result = app.policy().list(kind).await;
    let body = app.settle(&ticket, result)?;

    Ok(match body {
        Value::Array(records) => records,
        Value::Null => Vec::new(),
        other => vec![other],
    })
}

/// Print one record per line, or a note when there is nothing to show.
pub fn render(kind: ResourceKind, records: Vec<Value>, pretty: bool) -> Result<()> {
    if records.is_empty() {
        eprintln!("{}", format!("No {kind} found.").dimmed());
        return Ok(());
    }

    for record in &records {
        output::record(record, pretty)?;
    }

    Ok(())
}
