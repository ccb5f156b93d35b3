use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Declarative shape a JSON value is checked against.
#[derive(Clone)]
pub enum Schema {
    String,
    Number,
    Boolean,
    Null,
    /// Accepts any present value.
    Any,
    /// A string equal to one of the listed values.
    OneOf(Vec<String>),
    /// An object whose fields are checked in declaration order.
    Object(Vec<(String, Schema)>),
    Array(Box<Schema>),
    /// The field may be absent. A present value must match the inner schema.
    Optional(Box<Schema>),
    /// The value may be `null`.
    Nullable(Box<Schema>),
    Check(Check),
    /// An object whose keys must come from `keys` and whose values all match `value`.
    Record { keys: Vec<String>, value: Box<Schema> },
}

/// Custom predicate with the expectation reported on failure.
#[derive(Clone)]
pub struct Check {
    pub(crate) message: String,
    pub(crate) test: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("message", &self.message).finish()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Null => write!(f, "null"),
            Self::Any => write!(f, "any"),
            Self::OneOf(values) => write!(f, "oneOf{:?}", values),
            Self::Object(fields) => f.debug_map().entries(fields.iter().map(|(k, v)| (k, v))).finish(),
            Self::Array(inner) => write!(f, "[{:?}]", inner),
            Self::Optional(inner) => write!(f, "*{:?}", inner),
            Self::Nullable(inner) => write!(f, "?{:?}", inner),
            Self::Check(check) => write!(f, "check({:?})", check.message),
            Self::Record { keys, value } => write!(f, "record{:?} -> {:?}", keys, value),
        }
    }
}

impl Schema {
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Schema)>) -> Self {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn one_of<S: ToString>(values: impl IntoIterator<Item = S>) -> Self {
        Self::OneOf(values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn array(inner: Schema) -> Self {
        Self::Array(Box::new(inner))
    }

    pub fn record<S: ToString>(keys: impl IntoIterator<Item = S>, value: Schema) -> Self {
        Self::Record {
            keys: keys.into_iter().map(|k| k.to_string()).collect(),
            value: Box::new(value),
        }
    }

    pub fn check(
        message: impl Into<String>,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Check(Check {
            message: message.into(),
            test: Arc::new(test),
        })
    }

    /// Mark this field as optional (may be absent).
    pub fn optional(self) -> Self {
        Self::Optional(Box::new(self))
    }

    /// Allow `null` in place of this schema.
    pub fn nullable(self) -> Self {
        Self::Nullable(Box::new(self))
    }

    pub fn string_length(min: usize, max: usize) -> Self {
        Self::check(
            format!("Expected a string with length between {} and {}.", min, max),
            move |v| {
                v.as_str()
                    .map(|s| (min..=max).contains(&s.chars().count()))
                    .unwrap_or(false)
            },
        )
    }

    /// Integer greater than or equal to zero.
    pub fn positive_integer() -> Self {
        Self::check("Expected a positive integer.", |v| {
            v.as_u64().is_some() || v.as_f64().is_some_and(|f| f >= 0.0 && f.fract() == 0.0)
        })
    }

    /// Integer strictly greater than zero.
    pub fn positive_non_zero_integer() -> Self {
        Self::check("Expected a positive non-zero integer.", |v| {
            v.as_u64().is_some_and(|n| n > 0)
                || v.as_f64().is_some_and(|f| f > 0.0 && f.fract() == 0.0)
        })
    }

    pub fn number_between(min: f64, max: f64) -> Self {
        Self::check(
            format!("Expected a number between {} and {}.", min, max),
            move |v| v.as_f64().is_some_and(|f| f >= min && f <= max),
        )
    }

    pub fn integer_between(min: i64, max: i64) -> Self {
        Self::check(
            format!("Expected an integer between {} and {}.", min, max),
            move |v| v.as_i64().is_some_and(|n| n >= min && n <= max),
        )
    }

    /// Expectation text used when this schema rejects a value.
    pub fn expectation(&self) -> String {
        match self {
            Self::String => "Expected string.".to_string(),
            Self::Number => "Expected number.".to_string(),
            Self::Boolean => "Expected boolean.".to_string(),
            Self::Null => "Expected null.".to_string(),
            Self::Any => "Expected a value.".to_string(),
            Self::OneOf(values) => format!("Expected any of {}.", values.join(", ")),
            Self::Object(_) | Self::Record { .. } => "Expected object.".to_string(),
            Self::Array(_) => "Expected array.".to_string(),
            Self::Optional(inner) | Self::Nullable(inner) => inner.expectation(),
            Self::Check(check) => check.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_of_expectation() {
        let schema = Schema::one_of(["SP", "DP"]);
        assert_eq!(schema.expectation(), "Expected any of SP, DP.");
    }

    #[test]
    fn test_wrappers_keep_inner_expectation() {
        let schema = Schema::Number.nullable().optional();
        assert_eq!(schema.expectation(), "Expected number.");
    }

    #[test]
    fn test_positive_integer_check() {
        let Schema::Check(check) = Schema::positive_integer() else {
            panic!("expected check");
        };
        assert!((check.test)(&json!(0)));
        assert!((check.test)(&json!(10)));
        assert!(!(check.test)(&json!(-1)));
        assert!(!(check.test)(&json!(1.5)));
        assert!(!(check.test)(&json!("1")));
    }

    #[test]
    fn test_string_length_counts_chars() {
        let Schema::Check(check) = Schema::string_length(3, 15) else {
            panic!("expected check");
        };
        assert!((check.test)(&json!("foo")));
        assert!((check.test)(&json!("テスト")));
        assert!(!(check.test)(&json!("1")));
        assert!(!(check.test)(&json!(1)));
    }
}
