//! Delete command implementation.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use clinic_core::search::without;
use clinic_core::{Flash, ResourceId, ResourceKind, Route};

use crate::app::App;
use crate::commands::list;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Resource (doctors, patients, appointments, diagnoses, prescriptions)
    pub kind: ResourceKind,

    /// Record id
    pub id: ResourceId,

    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

pub async fn run(args: DeleteArgs, app: &mut App) -> Result<()> {
    let (kind, id) = (args.kind, args.id);
    app.navigate(Route::Index(kind), None);

    if !args.force {
        eprint!(
            "This will delete {} {}. Continue? [y/N] ",
            kind.singular().to_lowercase(),
            id
        );
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let ticket = app.ticket();
    let result = app.policy().delete(kind, id).await;
    app.settle(&ticket, result)?;

    app.notify(Flash::success(format!(
        "{} deleted successfully",
        kind.singular()
    )));

    // Show the index as it now stands, minus the record just removed.
    let remaining = list::fetch(app, kind).await?;
    list::render(kind, without(remaining, id), false)
}
