use serde::Serialize;
use serde_json::Value;

use super::record::{as_number, InputRecord};

const VALUE_MIN: f64 = 0.0;
const VALUE_MAX: f64 = 100.0;
const NAME_MIN_CHARS: usize = 2;

/// Field-level rule violations, checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("input must be a record")]
    NotARecord,
    #[error("value must be numeric")]
    ValueNotNumeric,
    #[error("value must be between 0 and 100")]
    ValueOutOfRange,
    #[error("invalid email format")]
    InvalidEmail,
    #[error("name must be at least 2 characters")]
    NameTooShort,
}

/// Pass/fail outcome with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub const SUCCESS_MESSAGE: &'static str = "validation succeeded";
}

impl From<Result<(), ValidationFailure>> for ValidationResult {
    fn from(outcome: Result<(), ValidationFailure>) -> Self {
        match outcome {
            Ok(()) => Self {
                valid: true,
                message: Self::SUCCESS_MESSAGE.to_string(),
            },
            Err(failure) => Self {
                valid: false,
                message: failure.to_string(),
            },
        }
    }
}

/// Check a loosely typed payload, reporting the first rule it breaks.
pub fn validate(input: &Value) -> ValidationResult {
    check(input).into()
}

/// Typed form of [`validate`].
pub fn check(input: &Value) -> Result<(), ValidationFailure> {
    let Value::Object(fields) = input else {
        return Err(ValidationFailure::NotARecord);
    };

    if let Some(raw) = fields.get(InputRecord::VALUE) {
        let value = as_number(raw).ok_or(ValidationFailure::ValueNotNumeric)?;
        if !(VALUE_MIN..=VALUE_MAX).contains(&value) {
            return Err(ValidationFailure::ValueOutOfRange);
        }
    }

    if let Some(raw) = fields.get(InputRecord::EMAIL) {
        match raw.as_str() {
            Some(email) if is_valid_email(email) => {}
            _ => return Err(ValidationFailure::InvalidEmail),
        }
    }

    if let Some(raw) = fields.get(InputRecord::NAME) {
        match raw.as_str() {
            Some(name) if is_valid_name(name) => {}
            _ => return Err(ValidationFailure::NameTooShort),
        }
    }

    Ok(())
}

/// `local@domain.tld`: local from `[A-Za-z0-9._%+-]`, domain from `[A-Za-z0-9.-]`,
/// and a top-level label of at least two ASCII letters.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, host)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || !local.chars().all(is_local_char) {
        return false;
    }

    // The tld has no dots, so it always starts after the last one.
    let Some((domain, tld)) = host.rsplit_once('.') else {
        return false;
    };

    !domain.is_empty()
        && domain.chars().all(is_domain_char)
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= NAME_MIN_CHARS
}

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-')
}

fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-')
}
