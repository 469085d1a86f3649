//! Create command implementation.

use anyhow::Result;
use clap::Args;
use clinic_core::forms::resource_payload;
use clinic_core::{Flash, FormMode, ResourceKind, Route};

use super::FormArgs;
use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Resource (doctors, patients, appointments, diagnoses, prescriptions)
    pub kind: ResourceKind,

    #[command(flatten)]
    pub form: FormArgs,
}

pub async fn run(args: CreateArgs, app: &mut App) -> Result<()> {
    let kind = args.kind;
    app.navigate(Route::Create(kind), None);

    let input = args.form.to_input()?;
    let payload =
        resource_payload(kind, &input, FormMode::Create).map_err(|errors| app.invalid(errors))?;

    let ticket = app.ticket();
    let result = app.policy().create(kind, payload).await;
    let created = app.settle(&ticket, result)?;

    app.navigate(
        Route::Index(kind),
        Some(Flash::success(format!(
            "{} created successfully",
            kind.singular()
        ))),
    );
    output::record(&created, false)
}
