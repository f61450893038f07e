use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::database::models::account::AccountFields;

/// Body of create and update requests. Every field is optional here so a
/// missing one is reported as a validation message, not a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email format";
pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const FIRST_NAME_LENGTH: &str = "First name must be between 2 and 50 characters";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const LAST_NAME_LENGTH: &str = "Last name must be between 2 and 50 characters";

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;

// local@domain.tld, nothing stricter
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Empty strings count as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn name_length_ok(name: &str) -> bool {
    (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name.chars().count())
}

/// Check an account payload. Errors come back in a fixed order, at most one
/// per field; a missing field skips its format/length rule but never stops
/// the other fields from being checked.
pub fn validate_account(input: &AccountInput) -> Result<AccountFields, Vec<String>> {
    let mut errors = Vec::new();

    let email = present(&input.email);
    match email {
        None => errors.push(EMAIL_REQUIRED.to_string()),
        Some(email) if !is_valid_email(email) => errors.push(EMAIL_INVALID.to_string()),
        Some(_) => {}
    }

    let first_name = present(&input.first_name);
    match first_name {
        None => errors.push(FIRST_NAME_REQUIRED.to_string()),
        Some(name) if !name_length_ok(name) => errors.push(FIRST_NAME_LENGTH.to_string()),
        Some(_) => {}
    }

    let last_name = present(&input.last_name);
    match last_name {
        None => errors.push(LAST_NAME_REQUIRED.to_string()),
        Some(name) if !name_length_ok(name) => errors.push(LAST_NAME_LENGTH.to_string()),
        Some(_) => {}
    }

    match (email, first_name, last_name) {
        (Some(email), Some(first_name), Some(last_name)) if errors.is_empty() => {
            Ok(AccountFields {
                email: email.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            })
        }
        _ => Err(errors),
    }
}
