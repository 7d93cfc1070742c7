//! Validation and coercion of scalar request fields.
//!
//! Every helper names the field in its error so callers can tell which
//! parameter was rejected.

use crate::compute::literal::parse_number;
use crate::error::ValidationError;
use ephemq_types::raw::RawValue;

type Result<T> = std::result::Result<T, ValidationError>;

fn missing(field: &str) -> ValidationError {
    ValidationError::MissingParameter(format!("{} is required", field))
}

fn single_value(field: &str, raw: &RawValue) -> ValidationError {
    ValidationError::TypeMismatch(format!(
        "{} must be a single value, got a {}: {}",
        field,
        raw.kind(),
        raw
    ))
}

/// Validates a required text field.
///
/// Numbers are accepted and rendered as text, since query strings and JSON
/// bodies disagree on whether e.g. a frame name like `"-85000"` is quoted.
///
/// # Examples
///
/// ```
/// use ephemq::compute::validation::require_text;
/// use ephemq_types::raw::RawValue;
///
/// let target = RawValue::text("LUNAR RECONNAISSANCE ORBITER");
/// assert_eq!(require_text("target", Some(&target)).unwrap(), "LUNAR RECONNAISSANCE ORBITER");
/// assert!(require_text("target", None).is_err());
/// ```
pub fn require_text(field: &str, raw: Option<&RawValue>) -> Result<String> {
    match raw.ok_or_else(|| missing(field))? {
        RawValue::Text(s) => Ok(s.clone()),
        RawValue::Number(v) => Ok(v.to_string()),
        other => Err(single_value(field, other)),
    }
}

/// Validates an optional text field, falling back to `default`.
pub fn optional_text(field: &str, raw: Option<&RawValue>, default: &str) -> Result<String> {
    match raw {
        Some(_) => require_text(field, raw),
        None => Ok(default.to_string()),
    }
}

/// Validates a required floating point field.
pub fn require_float(field: &str, raw: Option<&RawValue>) -> Result<f64> {
    let value = match raw.ok_or_else(|| missing(field))? {
        RawValue::Number(v) => *v,
        RawValue::Text(s) => parse_number(field, s)?,
        other => return Err(single_value(field, other)),
    };

    if !value.is_finite() {
        return Err(ValidationError::InvalidValue(format!(
            "{} must be finite, got: {}",
            field, value
        )));
    }
    Ok(value)
}

/// Validates an optional floating point field, falling back to `default`.
pub fn optional_float(field: &str, raw: Option<&RawValue>, default: f64) -> Result<f64> {
    match raw {
        Some(_) => require_float(field, raw),
        None => Ok(default),
    }
}

/// Validates a required integer field.
///
/// # Examples
///
/// ```
/// use ephemq::compute::validation::require_int;
/// use ephemq_types::raw::RawValue;
///
/// assert_eq!(require_int("frameCode", Some(&RawValue::text("-85"))).unwrap(), -85);
/// assert!(require_int("frameCode", Some(&RawValue::from(1.5))).is_err());
/// ```
pub fn require_int(field: &str, raw: Option<&RawValue>) -> Result<i64> {
    let value = require_float(field, raw)?;
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(ValidationError::InvalidValue(format!(
            "{} must be an integer, got: {}",
            field, value
        )));
    }
    Ok(value as i64)
}

/// Validates an optional integer field, falling back to `default`.
pub fn optional_int(field: &str, raw: Option<&RawValue>, default: i64) -> Result<i64> {
    match raw {
        Some(_) => require_int(field, raw),
        None => Ok(default),
    }
}

/// Validates an optional boolean field, falling back to `default`.
///
/// Text is matched case-insensitively against `true`/`false`/`1`/`0`.
pub fn optional_bool(field: &str, raw: Option<&RawValue>, default: bool) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw {
        RawValue::Bool(b) => Ok(*b),
        RawValue::Number(v) if *v == 1.0 => Ok(true),
        RawValue::Number(v) if *v == 0.0 => Ok(false),
        RawValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ValidationError::Parse(format!(
                "{} must be a boolean, got: {}",
                field, s
            ))),
        },
        RawValue::Number(v) => Err(ValidationError::Parse(format!(
            "{} must be a boolean, got: {}",
            field, v
        ))),
        other => Err(single_value(field, other)),
    }
}
