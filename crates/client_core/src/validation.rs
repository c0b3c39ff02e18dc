//! Field rules for a submitted client record.
//!
//! Each field is checked independently and reports at most one error; the
//! rules of a field run in declaration order (required, length, pattern) and
//! the first failure wins. All field errors of one submission are returned
//! together.
//!
//! A value that is empty or consists only of whitespace counts as missing and
//! fails the required rule; non-blank values are checked as submitted,
//! without trimming.

use std::sync::LazyLock;

use regex::Regex;
use shared::{
    domain::ClientFields,
    error::{Field, FieldError, FieldErrorKind, ValidationErrors},
};

pub const NAME_MIN_LEN: usize = 2;
pub const PHONE_MIN_LEN: usize = 11;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zА-Яа-яЁё\s]+$").expect("name pattern compiles"));

// HTML living-standard "valid e-mail address" grammar.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

// +7/8 prefix, then 3-3-2-2 digits with optional space/dash separators and an
// optional parenthesized area code.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+7|8)?[\s\-]?\(?[0-9]{3}\)?[\s\-]?[0-9]{3}[\s\-]?[0-9]{2}[\s\-]?[0-9]{2}$")
        .expect("phone pattern compiles")
});

pub fn validate_client(fields: &ClientFields) -> Result<(), ValidationErrors> {
    let errors: Vec<FieldError> = [
        validate_name(&fields.name),
        validate_email(&fields.email),
        validate_phone(&fields.phone),
    ]
    .into_iter()
    .flatten()
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

pub fn validate_name(name: &str) -> Option<FieldError> {
    if is_blank(name) {
        return Some(required(Field::Name));
    }
    if name.chars().count() < NAME_MIN_LEN {
        return Some(FieldError::new(
            Field::Name,
            FieldErrorKind::TooShort,
            "name is too short",
        ));
    }
    if !NAME_RE.is_match(name) {
        return Some(FieldError::new(
            Field::Name,
            FieldErrorKind::InvalidChars,
            "name may contain only letters and spaces",
        ));
    }
    None
}

pub fn validate_email(email: &str) -> Option<FieldError> {
    if is_blank(email) {
        return Some(required(Field::Email));
    }
    if !EMAIL_RE.is_match(email) {
        return Some(FieldError::new(
            Field::Email,
            FieldErrorKind::InvalidFormat,
            "invalid email",
        ));
    }
    None
}

pub fn validate_phone(phone: &str) -> Option<FieldError> {
    if is_blank(phone) {
        return Some(required(Field::Phone));
    }
    if phone.chars().count() < PHONE_MIN_LEN {
        return Some(FieldError::new(
            Field::Phone,
            FieldErrorKind::TooShort,
            format!("phone must contain at least {PHONE_MIN_LEN} characters"),
        ));
    }
    if !PHONE_RE.is_match(phone) {
        return Some(FieldError::new(
            Field::Phone,
            FieldErrorKind::InvalidFormat,
            "enter a valid phone number",
        ));
    }
    None
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn required(field: Field) -> FieldError {
    FieldError::new(field, FieldErrorKind::Required, "required")
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
