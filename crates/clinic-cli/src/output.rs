//! Terminal rendering for screens: notifications, labeled fields and records.
//!
//! Records go to stdout as JSON, one per line unless pretty-printed, so they
//! can be piped. Everything addressed to the user goes to stderr, except the
//! success notification, which confirms the command's result.

use anyhow::Result;
use clinic_core::{FieldErrors, Flash, FlashKind};
use colored::{ColoredString, Colorize};
use serde_json::Value;

fn mark(kind: FlashKind) -> ColoredString {
    match kind {
        FlashKind::Success => "✓".green(),
        FlashKind::Error => "✗".red(),
    }
}

fn labeled(label: &str, value: &str) -> String {
    format!("{}: {}", label.dimmed(), value)
}

/// Print a one-shot notification.
pub fn flash(flash: &Flash) {
    match flash.kind {
        FlashKind::Success => println!("{} {}", mark(flash.kind), flash.message),
        FlashKind::Error => eprintln!("{} {}", mark(flash.kind), flash.message),
    }
}

/// Print a form's validation messages under `heading`.
///
/// Form-level messages are shown as errors; the rest are labeled with their
/// field name.
pub fn field_errors(heading: &str, errors: &FieldErrors) {
    eprintln!("{} {}", mark(FlashKind::Error), heading);
    for (name, message) in errors.iter() {
        if name == FieldErrors::FORM {
            eprintln!("{} {}", mark(FlashKind::Error), message);
        } else {
            eprintln!("  {}", labeled(name, message));
        }
    }
}

/// Print a labeled profile field.
pub fn field(label: &str, value: &str) {
    println!("{}", labeled(label, value));
}

/// Print a record as JSON.
pub fn record(record: &Value, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    println!("{json}");
    Ok(())
}
