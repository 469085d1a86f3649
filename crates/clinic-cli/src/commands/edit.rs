//! Edit command implementation.

use anyhow::Result;
use clap::Args;
use clinic_core::forms::resource_payload;
use clinic_core::{Flash, FormMode, ResourceId, ResourceKind, Route};

use super::FormArgs;
use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Resource (doctors, patients, appointments, diagnoses, prescriptions)
    pub kind: ResourceKind,

    /// Record id
    pub id: ResourceId,

    #[command(flatten)]
    pub form: FormArgs,
}

pub async fn run(args: EditArgs, app: &mut App) -> Result<()> {
    let (kind, id) = (args.kind, args.id);
    app.navigate(Route::Edit(kind, id), None);

    // Only the given fields are validated and sent.
    let input = args.form.to_input()?;
    let payload =
        resource_payload(kind, &input, FormMode::Update).map_err(|errors| app.invalid(errors))?;

    let ticket = app.ticket();
    let result = app.policy().update(kind, id, payload).await;
    let updated = app.settle(&ticket, result)?;

    app.navigate(
        Route::Index(kind),
        Some(Flash::success(format!(
            "{} updated successfully",
            kind.singular()
        ))),
    );
    output::record(&updated, false)
}
