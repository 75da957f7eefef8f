//! Internal helpers for record validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! input normalization so the store and the restore path enforce the same
//! invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Generate a fresh transaction id.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidPerson(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Drop repeated names, keeping the first occurrence.
pub(crate) fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_text_is_trimmed_or_dropped() {
        assert_eq!(normalize_optional_text(Some("  Food ")), Some("Food".to_string()));
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(normalize_optional_text(None), None);
    }

    #[test]
    fn dedup_preserves_first_occurrence() {
        let names = vec!["Bob".to_string(), "Alice".to_string(), "Bob".to_string()];
        assert_eq!(dedup_names(names), vec!["Bob".to_string(), "Alice".to_string()]);
    }
}
