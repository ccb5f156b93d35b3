//! Deep structural validation of loosely typed JSON input.
//!
//! A value is walked depth-first, left to right, against a [`Schema`]. The
//! first mismatch is returned as a [`ValidationError`] carrying the field path,
//! the expectation and the received value. Nothing is mutated.

mod error;
mod schema;

pub use error::*;
pub use schema::*;

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Do not fail on object keys the schema does not mention.
    pub allow_excess_keys: bool,
}

impl ValidateOptions {
    pub fn allow_excess_keys() -> Self {
        Self {
            allow_excess_keys: true,
        }
    }
}

/// Validate `value` against `schema`. Returns the first error, if any.
pub fn validate(value: &Value, schema: &Schema, options: ValidateOptions) -> Option<ValidationError> {
    validate_at(value, schema, options, "")
}

/// Like [`validate`], but reports paths relative to `root` (e.g. `body[3]`).
pub fn validate_at(
    value: &Value,
    schema: &Schema,
    options: ValidateOptions,
    root: &str,
) -> Option<ValidationError> {
    Walker { options }.node(Some(value), schema, root).err()
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

struct Walker {
    options: ValidateOptions,
}

impl Walker {
    fn node(&self, value: Option<&Value>, schema: &Schema, path: &str) -> Result<(), ValidationError> {
        let fail = || -> Result<(), ValidationError> {
            Err(ValidationError::new(path, schema.expectation(), value))
        };

        match schema {
            Schema::Optional(inner) => match value {
                None => Ok(()),
                Some(_) => self.node(value, inner, path),
            },
            Schema::Nullable(inner) => match value {
                Some(Value::Null) => Ok(()),
                _ => self.node(value, inner, path),
            },
            Schema::Any => match value {
                Some(_) => Ok(()),
                None => fail(),
            },
            Schema::String => match value {
                Some(Value::String(_)) => Ok(()),
                _ => fail(),
            },
            Schema::Number => match value {
                Some(Value::Number(_)) => Ok(()),
                _ => fail(),
            },
            Schema::Boolean => match value {
                Some(Value::Bool(_)) => Ok(()),
                _ => fail(),
            },
            Schema::Null => match value {
                Some(Value::Null) => Ok(()),
                _ => fail(),
            },
            Schema::OneOf(allowed) => match value {
                Some(Value::String(s)) if allowed.iter().any(|a| a == s) => Ok(()),
                _ => fail(),
            },
            Schema::Check(check) => match value {
                Some(v) if (check.test)(v) => Ok(()),
                _ => fail(),
            },
            Schema::Array(inner) => match value {
                Some(Value::Array(items)) => items
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, item)| self.node(Some(item), inner, &index_path(path, i))),
                _ => fail(),
            },
            Schema::Object(fields) => match value {
                Some(Value::Object(map)) => self.object(map, fields, path),
                _ => fail(),
            },
            Schema::Record { keys, value: inner } => match value {
                Some(Value::Object(map)) => self.record(map, keys, inner, path),
                _ => fail(),
            },
        }
    }

    fn object(
        &self,
        map: &Map<String, Value>,
        fields: &[(String, Schema)],
        path: &str,
    ) -> Result<(), ValidationError> {
        for (key, schema) in fields {
            self.node(map.get(key), schema, &child_path(path, key))?;
        }

        if self.options.allow_excess_keys {
            return Ok(());
        }

        let excess: Vec<&str> = map
            .keys()
            .filter(|k| !fields.iter().any(|(name, _)| name == *k))
            .map(String::as_str)
            .collect();

        if excess.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(
                path,
                format!("Unexpected properties in object: {}.", excess.join(", ")),
                Some(&Value::Object(map.clone())),
            ))
        }
    }

    fn record(
        &self,
        map: &Map<String, Value>,
        keys: &[String],
        inner: &Schema,
        path: &str,
    ) -> Result<(), ValidationError> {
        for (key, value) in map {
            if !keys.iter().any(|k| k == key) {
                return Err(ValidationError::new(
                    path,
                    format!("Invalid Key {}. Expected any of {}.", key, keys.join(", ")),
                    Some(value),
                ));
            }

            if let Err(err) = self.node(Some(value), inner, &child_path(path, key)) {
                return Err(ValidationError::new(
                    path,
                    format!(
                        "Key {} had an invalid value of {} [{}].",
                        key,
                        err.received_display(),
                        err.received_type()
                    ),
                    Some(value),
                ));
            }
        }

        Ok(())
    }
}
