//! Open command implementation.
//!
//! Maps a front-end path onto the matching screen.

use anyhow::{Context, Result, bail};
use clap::Args;
use clinic_core::{ResourceKind, Route};

use super::{list, show};
use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Path of the screen, e.g. /doctors or /patients/3
    pub path: String,
}

pub async fn run(args: OpenArgs, app: &mut App) -> Result<()> {
    let route: Route = args.path.parse().context("Unknown screen")?;
    app.navigate(route, None);

    match route {
        Route::Home => {
            match app.session().current_user() {
                Some(user) => output::field("Logged in as", &user.email),
                None => output::field("Logged in as", "nobody"),
            }
            for kind in ResourceKind::ALL {
                println!("{}", Route::Index(kind));
            }
            Ok(())
        }
        Route::Index(kind) => list::index(app, kind, false).await,
        Route::Show(kind, id) => show::record(app, kind, id).await,
        Route::Login => bail!("Use 'clinic login --email <EMAIL>' to log in"),
        Route::Signup => bail!("Use 'clinic signup' to register"),
        Route::Create(kind) => bail!("Use 'clinic create {kind} --field NAME=VALUE'"),
        Route::Edit(kind, id) => bail!("Use 'clinic edit {kind} {id} --field NAME=VALUE'"),
    }
}
