//! Field rules and the messages shown for each violation.

use std::fmt;

/// A field's current value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// `None` means the input is empty.
    Number(Option<f64>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => *number,
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(Some(number)) => write!(f, "{}", number),
            FieldValue::Number(None) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
    Required,
    MinLength(usize),
    /// Numbers must have no fractional part.
    Integer,
    Min(f64),
    Max(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldError {
    Required,
    MinLength { required: usize, actual: usize },
    Integer { actual: f64 },
    Min { min: f64, actual: f64 },
    Max { max: f64, actual: f64 },
}

impl FieldRule {
    /// Empty values only ever fail `Required`; the other rules skip them.
    /// A non-finite number counts as empty.
    pub fn check(&self, value: &FieldValue) -> Option<FieldError> {
        match (self, value) {
            (FieldRule::Required, FieldValue::Text(text)) if text.is_empty() => {
                Some(FieldError::Required)
            }
            (FieldRule::Required, FieldValue::Number(None)) => Some(FieldError::Required),
            (FieldRule::Required, FieldValue::Number(Some(actual))) if !actual.is_finite() => {
                Some(FieldError::Required)
            }
            (FieldRule::MinLength(required), FieldValue::Text(text)) => {
                let actual = text.chars().count();
                (actual > 0 && actual < *required).then_some(FieldError::MinLength {
                    required: *required,
                    actual,
                })
            }
            (FieldRule::Integer, FieldValue::Number(Some(actual))) if actual.is_finite() => {
                (actual.fract() != 0.0).then_some(FieldError::Integer { actual: *actual })
            }
            (FieldRule::Min(min), FieldValue::Number(Some(actual))) => {
                (actual.is_nan() || actual < min).then_some(FieldError::Min {
                    min: *min,
                    actual: *actual,
                })
            }
            (FieldRule::Max(max), FieldValue::Number(Some(actual))) => {
                (actual.is_nan() || actual > max).then_some(FieldError::Max {
                    max: *max,
                    actual: *actual,
                })
            }
            _ => None,
        }
    }
}

impl FieldError {
    fn precedence(&self) -> u8 {
        match self {
            FieldError::Required => 0,
            FieldError::MinLength { .. } => 1,
            FieldError::Integer { .. } => 2,
            FieldError::Min { .. } => 3,
            FieldError::Max { .. } => 4,
        }
    }

    pub fn message(&self, field: &str) -> String {
        let label = display_name(field);
        match self {
            FieldError::Required => format!("{} is required", label),
            FieldError::MinLength { required, .. } => {
                format!("{} must be at least {} characters", label, required)
            }
            FieldError::Integer { .. } => format!("{} must be a whole number", label),
            FieldError::Min { min, .. } => {
                format!("{} must be greater than or equal to {}", label, min)
            }
            FieldError::Max { max, .. } => {
                format!("{} must be less than or equal to {}", label, max)
            }
        }
    }
}

/// Picks the error to show when a field fails several rules at once.
pub fn primary_error(errors: &[FieldError]) -> Option<&FieldError> {
    errors.iter().min_by_key(|error| error.precedence())
}

/// Field name with its first character upper-cased.
pub fn display_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
