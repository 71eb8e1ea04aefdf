use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::models::{scalar_text, ValidatedSubmission, COMPANY_SIZES};

/// Required fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 4] = ["fullName", "email", "companyName", "companySize"];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(&'static str),
    InvalidEmail,
    InvalidCompanySize(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingField(name) => write!(f, "Missing required field: {name}"),
            ValidationError::InvalidEmail => write!(f, "Invalid email format: email"),
            ValidationError::InvalidCompanySize(size) => {
                write!(f, "Invalid company size: {size}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Presence checks only. Fails on the first missing required field.
pub fn validate(payload: &Value) -> Result<ValidatedSubmission, ValidationError> {
    let full_name = required(payload, REQUIRED_FIELDS[0])?;
    let email = required(payload, REQUIRED_FIELDS[1])?;
    let company_name = required(payload, REQUIRED_FIELDS[2])?;
    let company_size = required(payload, REQUIRED_FIELDS[3])?;

    Ok(ValidatedSubmission {
        full_name,
        email,
        company_name,
        phone_number: field(payload, "phoneNumber").unwrap_or_default(),
        job_title: field(payload, "jobTitle").unwrap_or_default(),
        company_size,
        message: field(payload, "message").unwrap_or_default(),
    })
}

/// `validate` plus the format checks the demo form applies client-side.
pub fn validate_strict(payload: &Value) -> Result<ValidatedSubmission, ValidationError> {
    let submission = validate(payload)?;

    if !EMAIL_RE.is_match(&submission.email) {
        return Err(ValidationError::InvalidEmail);
    }

    if !COMPANY_SIZES.contains(&submission.company_size.as_str()) {
        return Err(ValidationError::InvalidCompanySize(
            submission.company_size.clone(),
        ));
    }

    Ok(submission)
}

fn required(payload: &Value, name: &'static str) -> Result<String, ValidationError> {
    field(payload, name)
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(name))
}

/// Read a scalar field as text. Numbers and booleans keep their JSON spelling.
fn field(payload: &Value, name: &str) -> Option<String> {
    payload.get(name).and_then(scalar_text)
}
