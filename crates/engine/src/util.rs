//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same invariants.

use chrono::{DateTime, Utc};

use crate::{EngineError, ResultEngine};

pub(crate) const WORKSPACE_NAME_MIN: usize = 3;
pub(crate) const WORKSPACE_NAME_MAX: usize = 50;
pub(crate) const CATEGORY_NAME_MAX: usize = 50;

/// Trim and validate a workspace name (3..=50 characters).
pub(crate) fn normalize_workspace_name(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < WORKSPACE_NAME_MIN || len > WORKSPACE_NAME_MAX {
        return Err(EngineError::Validation(format!(
            "workspace name must be between {WORKSPACE_NAME_MIN} and {WORKSPACE_NAME_MAX} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim and validate a category name.
pub(crate) fn normalize_category_name(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(
            "Category name cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > CATEGORY_NAME_MAX {
        return Err(EngineError::Validation(
            "Category name is too long".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Validate an email address: `local@domain.tld`.
///
/// The local part accepts ASCII alphanumerics and `_ . + -`, the domain
/// label accepts alphanumerics and `-`, the remainder after the first dot
/// accepts alphanumerics, `-` and `.`.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let invalid = || EngineError::Validation("Invalid email format".to_string());
    let trimmed = value.trim();

    let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-'))
    {
        return Err(invalid());
    }

    let (label, rest) = domain.split_once('.').ok_or_else(invalid)?;
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid());
    }
    if rest.is_empty()
        || !rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.'))
    {
        return Err(invalid());
    }

    Ok(trimmed.to_string())
}

/// Current time, never earlier than `previous`.
pub(crate) fn monotonic_now(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous)
}
