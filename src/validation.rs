//! Structural checks applied to contact input before it reaches storage.

use std::fmt;

use thiserror::Error;

use crate::database::models::ContactInput;

pub const NAME_MIN_LENGTH: usize = 3;

const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;
const DOMAIN_LABEL_MAX_LENGTH: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Min(usize),
    Email,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required"),
            Rule::Min(n) => write!(f, "min={}", n),
            Rule::Email => write!(f, "email"),
        }
    }
}

/// First field/rule pair that rejected the input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' failed on the '{rule}' rule")]
pub struct ValidationError {
    pub field: &'static str,
    pub rule: Rule,
}

impl ValidationError {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

/// Check name then email, reporting the first failure.
pub fn validate_contact(contact: &ContactInput) -> Result<(), ValidationError> {
    let name = contact.name.trim();
    if name.is_empty() {
        return Err(ValidationError::new("Name", Rule::Required));
    }
    if name.chars().count() < NAME_MIN_LENGTH {
        return Err(ValidationError::new("Name", Rule::Min(NAME_MIN_LENGTH)));
    }

    let email = contact.email.trim();
    if email.is_empty() {
        return Err(ValidationError::new("Email", Rule::Required));
    }
    if !is_valid_email(&contact.email) {
        return Err(ValidationError::new("Email", Rule::Email));
    }

    Ok(())
}

/// Addr-spec syntax check: dot-atom local part, hostname-style domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > EMAIL_MAX_LENGTH {
        return false;
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    local.chars().all(|c| c == '.' || is_atext(c))
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~-".contains(c)
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= DOMAIN_LABEL_MAX_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
