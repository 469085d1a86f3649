//! Subcommand implementations, one per screen.

mod create;
mod delete;
mod edit;
mod list;
mod login;
mod logout;
mod open;
mod show;
mod signup;
mod whoami;

use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use clinic_core::FormInput;
use serde_json::Value;

use crate::app::App;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the logged-in user
    Whoami(whoami::WhoamiArgs),

    /// Register a new user
    Signup(signup::SignupArgs),

    /// List the records of a resource
    List(list::ListArgs),

    /// Fetch a single record
    Show(show::ShowArgs),

    /// Create a record
    Create(create::CreateArgs),

    /// Update fields of a record
    Edit(edit::EditArgs),

    /// Delete a record
    Delete(delete::DeleteArgs),

    /// Open the screen at a path such as /doctors/3
    Open(open::OpenArgs),
}

pub async fn handle(cmd: Command, app: &mut App) -> Result<()> {
    match cmd {
        Command::Login(args) => login::run(args, app).await,
        Command::Logout(args) => logout::run(args, app).await,
        Command::Whoami(args) => whoami::run(args, app).await,
        Command::Signup(args) => signup::run(args, app).await,
        Command::List(args) => list::run(args, app).await,
        Command::Show(args) => show::run(args, app).await,
        Command::Create(args) => create::run(args, app).await,
        Command::Edit(args) => edit::run(args, app).await,
        Command::Delete(args) => delete::run(args, app).await,
        Command::Open(args) => open::run(args, app).await,
    }
}

/// Form values given on the command line.
#[derive(Args, Debug, Default)]
pub struct FormArgs {
    /// Field value as NAME=VALUE (repeatable)
    #[arg(long = "field", short = 'f', value_name = "NAME=VALUE")]
    pub fields: Vec<String>,

    /// JSON object with field values (use - for stdin)
    #[arg(long)]
    pub json: Option<String>,
}

impl FormArgs {
    /// Merge the JSON object (if any) with the `--field` values, which win.
    pub fn to_input(&self) -> Result<FormInput> {
        let mut input = match &self.json {
            Some(source) => {
                let value = read_json(source)?;
                FormInput::from_value(value).context("Form JSON must be an object")?
            }
            None => FormInput::new(),
        };

        for pair in &self.fields {
            let Some((name, value)) = pair.split_once('=') else {
                bail!("Invalid field '{pair}': expected NAME=VALUE");
            };
            let name = name.trim();
            if name.is_empty() {
                bail!("Invalid field '{pair}': missing name");
            }
            input.set(name, value);
        }

        Ok(input)
    }
}

fn read_json(source: &str) -> Result<Value> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        serde_json::from_str(&buf).context("Invalid JSON from stdin")
    } else {
        let content = std::fs::read_to_string(source).context("Failed to read JSON file")?;
        serde_json::from_str(&content).context("Invalid JSON in file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::forms::resource_payload;
    use clinic_core::{FormMode, ResourceKind};
    use std::io::Write;

    fn args(fields: &[&str], json: Option<String>) -> FormArgs {
        FormArgs {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            json,
        }
    }

    #[test]
    fn fields_override_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"condition": "Flu", "patient_id": 4}}"#).unwrap();

        let input = args(
            &["condition=Cold"],
            Some(file.path().display().to_string()),
        )
        .to_input()
        .unwrap();

        let payload =
            resource_payload(ResourceKind::Diagnoses, &input, FormMode::Update).unwrap();
        assert_eq!(payload["condition"], "Cold");
        assert_eq!(payload["patient_id"], 4);
    }

    #[test]
    fn value_may_contain_equals() {
        let input = args(&["dosage=1 tablet = 5mg"], None).to_input().unwrap();
        let payload =
            resource_payload(ResourceKind::Prescriptions, &input, FormMode::Update).unwrap();
        assert_eq!(payload["dosage"], "1 tablet = 5mg");
    }

    #[test]
    fn malformed_field_is_rejected() {
        assert!(args(&["no-equals"], None).to_input().is_err());
        assert!(args(&["=value"], None).to_input().is_err());
    }

    #[test]
    fn json_must_be_an_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        let err = args(&[], Some(file.path().display().to_string()))
            .to_input()
            .unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }
}
