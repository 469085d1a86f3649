//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;
use clinic_core::{Flash, Route};

use crate::app::App;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs, app: &mut App) -> Result<()> {
    let was_logged_in = app.session().is_authenticated();

    app.session()
        .logout()
        .await
        .context("Failed to clear stored session")?;

    let message = if was_logged_in {
        "Logged out"
    } else {
        "No active session"
    };
    app.navigate(Route::Home, Some(Flash::success(message)));

    Ok(())
}
