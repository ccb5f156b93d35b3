use std::fmt;

use serde_json::{Number, Value};

/// First structural mismatch found while walking a value against a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted/bracketed field path, e.g. `body[0].hitMeta.bp`.
    pub path: String,
    /// Human-readable expectation, including its trailing punctuation.
    pub message: String,
    /// The offending value. `None` when the key was missing entirely.
    pub received: Option<Value>,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>, received: Option<&Value>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            received: received.cloned(),
        }
    }

    /// Runtime type tag of the received value.
    pub fn received_type(&self) -> &'static str {
        type_tag(self.received.as_ref())
    }

    pub fn received_display(&self) -> String {
        display_value(self.received.as_ref())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | Received {} [{}].",
            self.path,
            self.message,
            self.received_display(),
            self.received_type()
        )
    }
}

impl std::error::Error for ValidationError {}

/// Render a validation error behind a context prefix.
pub fn format_validation_error(err: &ValidationError, prefix: &str) -> String {
    format!("{}: {}", prefix, err)
}

pub fn type_tag(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Render a value the way a submitter typed it: strings unquoted, integral
/// floats without a fractional part, containers as compact JSON.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => display_number(n),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn display_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
