//! Form validation for the credentials and task-title inputs.
//!
//! Validators are pure and keep no state between submits. A failed
//! validation returns every offending field at once so the form can show
//! each message next to its input.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::types::Credentials;

pub const EMAIL_REQUIRED: &str = "email required";
pub const EMAIL_INVALID: &str = "invalid email format";
pub const PASSWORD_REQUIRED: &str = "password required";
pub const TITLE_REQUIRED: &str = "title required";

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Form input a message can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Email,
    Password,
    Title,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::Title => "title",
        }
    }
}

/// Field-scoped validation messages. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summary(.0))]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }
}

fn summary(errors: &BTreeMap<Field, &'static str>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {message}", field.as_str()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Normalize and check register/login input.
///
/// The email is trimmed and lowercased; the password is forwarded as typed.
pub fn validate_credentials(email: &str, password: &str) -> Result<Credentials, FieldErrors> {
    let email = email.trim().to_lowercase();
    let mut errors = FieldErrors::default();

    if email.is_empty() {
        errors.insert(Field::Email, EMAIL_REQUIRED);
    } else if !EMAIL_SHAPE.is_match(&email) {
        errors.insert(Field::Email, EMAIL_INVALID);
    }
    if password.trim().is_empty() {
        errors.insert(Field::Password, PASSWORD_REQUIRED);
    }

    if errors.is_empty() {
        Ok(Credentials {
            email,
            password: password.to_string(),
        })
    } else {
        Err(errors)
    }
}

/// Returns the trimmed title.
pub fn validate_title(title: &str) -> Result<String, FieldErrors> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        let mut errors = FieldErrors::default();
        errors.insert(Field::Title, TITLE_REQUIRED);
        return Err(errors);
    }
    Ok(trimmed.to_string())
}
