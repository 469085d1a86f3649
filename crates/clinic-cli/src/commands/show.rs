//! Show command implementation.

use anyhow::Result;
use clap::Args;
use clinic_core::{ResourceId, ResourceKind, Route};

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Resource (doctors, patients, appointments, diagnoses, prescriptions)
    pub kind: ResourceKind,

    /// Record id
    pub id: ResourceId,
}

pub async fn run(args: ShowArgs, app: &mut App) -> Result<()> {
    app.navigate(Route::Show(args.kind, args.id), None);
    record(app, args.kind, args.id).await
}

/// Render the detail screen for one record.
pub async fn record(app: &mut App, kind: ResourceKind, id: ResourceId) -> Result<()> {
    let ticket = app.ticket();
    let result = app.policy().show(kind, id).await;
    let body = app.settle(&ticket, result)?;

    output::record(&body, true)
}
