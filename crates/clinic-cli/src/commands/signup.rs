//! Signup command implementation.

use anyhow::Result;
use clap::Args;
use clinic_core::forms::registration_payload;
use clinic_core::{Flash, FormInput, Route};
use serde_json::Value;

use crate::app::App;

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run(args: SignupArgs, app: &mut App) -> Result<()> {
    app.navigate(Route::Signup, None);

    let mut input = FormInput::new()
        .with("first_name", args.first_name)
        .with("last_name", args.last_name)
        .with("email", args.email);
    if let Some(password) = args.password {
        input.set("password", password);
    }

    let payload = registration_payload(&input).map_err(|errors| app.invalid(errors))?;
    let name = payload["name"].as_str().unwrap_or_default().to_string();

    let ticket = app.ticket();
    let result = app.policy().register(payload).await;
    let created = app.settle(&ticket, result)?;

    let name = created
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or(name);
    app.navigate(
        Route::Login,
        Some(Flash::success(format!("User \"{name}\" created successfully"))),
    );

    Ok(())
}
