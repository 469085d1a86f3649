//! Login command implementation.

use anyhow::Result;
use clap::Args;
use clinic_core::{AuthError, Credentials, Flash, Route};
use colored::Colorize;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, app: &mut App) -> Result<()> {
    app.navigate(Route::Login, None);
    let credentials = Credentials::new(args.email, args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let result = app.session().login(credentials).await;
    let session = match result {
        Ok(session) => session,
        Err(AuthError::MissingCredentials { errors }) => return Err(app.invalid(errors)),
        Err(e) => return Err(app.fail(e.to_string())),
    };

    app.navigate(Route::Home, Some(Flash::success("Logged in successfully")));

    if let Some(user) = session.user() {
        output::field("Email", &user.email);
        if let Some(name) = user.display_name() {
            output::field("Name", &name);
        }
    }

    Ok(())
}
