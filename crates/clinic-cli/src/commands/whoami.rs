//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs, app: &mut App) -> Result<()> {
    let user = app
        .session()
        .current_user()
        .context("No active session. Run 'clinic login' first.")?;

    output::field("Email", &user.email);
    if let Some(name) = user.display_name() {
        output::field("Name", &name);
    }

    Ok(())
}
