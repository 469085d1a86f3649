//! Client-side form validation.
//!
//! Forms are checked before anything is sent. A failing form yields
//! [`FieldErrors`] for inline display and no request is issued. A passing
//! form yields the JSON payload for the backend, with only the known fields.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::ResourceKind;

/// Accepted doctor specialisations.
pub const SPECIALISATIONS: [&str; 5] = [
    "Podiatrist",
    "Dermatologist",
    "Pediatrician",
    "Psychiatrist",
    "General Practitioner",
];

/// Field name to message, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Key for messages that belong to the form as a whole.
    pub const FORM: &'static str = "_form";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Read the `errors` value of a 422 response.
    ///
    /// Understands `{field: "msg"}`, `{field: ["msg", ...]}`,
    /// `{field: {message}}` and a list of `{path, message}` issues.
    pub fn from_server(errors: &Value) -> Self {
        let mut fields = FieldErrors::new();
        match errors {
            Value::Object(map) => {
                for (field, value) in map {
                    if let Some(message) = message_of(value) {
                        fields.insert(field, message);
                    }
                }
            }
            Value::Array(issues) => {
                for issue in issues {
                    let Some(message) = issue.get("message").and_then(Value::as_str) else {
                        continue;
                    };
                    let path = issue
                        .get("path")
                        .and_then(Value::as_array)
                        .map(|segments| {
                            segments
                                .iter()
                                .map(|s| match s {
                                    Value::String(s) => s.clone(),
                                    other => other.to_string(),
                                })
                                .collect::<Vec<_>>()
                                .join(".")
                        })
                        .filter(|p| !p.is_empty())
                        .unwrap_or_else(|| Self::FORM.to_string());
                    fields.insert(&path, message);
                }
            }
            Value::String(message) if !message.trim().is_empty() => {
                fields.insert(Self::FORM, message.as_str());
            }
            _ => {}
        }
        fields
    }
}

fn message_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items.iter().filter_map(message_of).collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        Value::Object(map) => map.get("message").and_then(message_of),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Whether a form creates a record or patches one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    /// Every field is required.
    Create,
    /// Only the fields present are checked and sent.
    Update,
}

/// Raw form values as entered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormInput(Map<String, Value>);

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object. Any other value yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// The value of `field` as trimmed text. Numbers are rendered, `null`
    /// counts as absent.
    fn text(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for FormInput
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = FormInput::new();
        for (field, value) in iter {
            input.set(field, value);
        }
        input
    }
}

struct Checker<'a> {
    input: &'a FormInput,
    mode: FormMode,
    errors: FieldErrors,
    payload: Map<String, Value>,
}

impl<'a> Checker<'a> {
    fn new(input: &'a FormInput, mode: FormMode) -> Self {
        Self {
            input,
            mode,
            errors: FieldErrors::new(),
            payload: Map::new(),
        }
    }

    /// A non-empty value, or `None` after recording `message`. Absent fields
    /// are skipped silently when updating.
    fn present(&mut self, field: &str, message: &str) -> Option<String> {
        match self.input.text(field) {
            Some(value) if !value.is_empty() => Some(value),
            None if self.mode == FormMode::Update => None,
            _ => {
                self.errors.insert(field, message);
                None
            }
        }
    }

    fn text(&mut self, field: &str, message: &str) {
        if let Some(value) = self.present(field, message) {
            self.payload.insert(field.to_string(), Value::String(value));
        }
    }

    fn optional_text(&mut self, field: &str) {
        if let Some(value) = self.input.text(field).filter(|v| !v.is_empty()) {
            self.payload.insert(field.to_string(), Value::String(value));
        }
    }

    fn email(&mut self, field: &str, message: &str) {
        if let Some(value) = self.present(field, message) {
            if is_email(&value) {
                self.payload.insert(field.to_string(), Value::String(value));
            } else {
                self.errors.insert(field, message);
            }
        }
    }

    fn positive_int(&mut self, field: &str, message: &str) {
        if let Some(value) = self.present(field, message) {
            match value.parse::<u64>() {
                Ok(n) if n > 0 => {
                    self.payload.insert(field.to_string(), Value::from(n));
                }
                _ => self.errors.insert(field, message),
            }
        }
    }

    fn date(&mut self, field: &str, message: &str) {
        if let Some(value) = self.present(field, message) {
            if NaiveDate::parse_from_str(&value, "%Y-%m-%d").is_ok() {
                self.payload.insert(field.to_string(), Value::String(value));
            } else {
                self.errors.insert(field, "Use the format YYYY-MM-DD");
            }
        }
    }

    fn one_of(&mut self, field: &str, options: &[&str], message: &str) {
        if let Some(value) = self.present(field, message) {
            match options.iter().find(|o| o.eq_ignore_ascii_case(&value)) {
                Some(option) => {
                    self.payload
                        .insert(field.to_string(), Value::String(option.to_string()));
                }
                None => self.errors.insert(field, message),
            }
        }
    }

    fn finish(self) -> Result<Map<String, Value>, FieldErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        if self.mode == FormMode::Update && self.payload.is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert(FieldErrors::FORM, "Nothing to update");
            return Err(errors);
        }
        Ok(self.payload)
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Validate a resource form and build its payload, stamped with the current
/// time.
pub fn resource_payload(
    kind: ResourceKind,
    input: &FormInput,
    mode: FormMode,
) -> Result<Value, FieldErrors> {
    resource_payload_at(kind, input, mode, Utc::now())
}

/// Like [`resource_payload`] with an explicit clock. Creates gain
/// `created_at` and `updated_at`; updates gain `updated_at`.
pub fn resource_payload_at(
    kind: ResourceKind,
    input: &FormInput,
    mode: FormMode,
    now: DateTime<Utc>,
) -> Result<Value, FieldErrors> {
    let mut check = Checker::new(input, mode);

    match kind {
        ResourceKind::Doctors => {
            check.text("first_name", "First name is required");
            check.text("last_name", "Last name is required");
            check.text("email", "Email is required");
            check.text("phone", "Phone number is required");
            check.one_of(
                "specialisation",
                &SPECIALISATIONS,
                "Choose one of: Podiatrist, Dermatologist, Pediatrician, Psychiatrist, General Practitioner",
            );
        }
        ResourceKind::Patients => {
            check.text("first_name", "First name is required");
            check.text("last_name", "Last name is required");
            check.email("email", "Invalid email address");
            check.text("phone", "Phone number is required");
            check.text("address", "Address is required");
            check.date("date_of_birth", "Date of birth is required");
        }
        ResourceKind::Appointments => {
            check.date("appointment_date", "Date is required");
            check.positive_int("doctor_id", "Doctor ID must be a number");
            check.positive_int("patient_id", "Patient ID must be a number");
        }
        ResourceKind::Diagnoses => {
            check.positive_int("patient_id", "Patient ID must be a number");
            check.text("condition", "Condition is required");
            check.date("diagnosis_date", "Diagnosis date is required");
            check.optional_text("diagnosed_with");
        }
        ResourceKind::Prescriptions => {
            check.positive_int("patient_id", "Patient ID is required");
            check.positive_int("doctor_id", "Doctor ID is required");
            check.positive_int("diagnosis_id", "Diagnosis ID is required");
            check.text("medication", "Medication is required");
            check.text("dosage", "Dosage is required");
            check.date("start_date", "Start date is required");
            check.date("end_date", "End date is required");
        }
    }

    let mut payload = check.finish()?;
    let stamp = Value::String(now.to_rfc3339());
    if mode == FormMode::Create {
        payload.insert("created_at".to_string(), stamp.clone());
    }
    payload.insert("updated_at".to_string(), stamp);
    Ok(Value::Object(payload))
}

/// Validate the sign-up form. The payload gains a combined `name`.
pub fn registration_payload(input: &FormInput) -> Result<Value, FieldErrors> {
    let mut check = Checker::new(input, FormMode::Create);
    check.text("first_name", "First name is required");
    check.text("last_name", "Last name is required");
    check.email("email", "Invalid email address");
    check.optional_text("password");

    let mut payload = check.finish()?;
    let name = ["first_name", "last_name"]
        .iter()
        .filter_map(|field| payload.get(*field).and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    payload.insert("name".to_string(), Value::String(name.trim().to_string()));
    Ok(Value::Object(payload))
}
