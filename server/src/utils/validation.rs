//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen for reasonable UX on names, notes and addresses;
//! the document store has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu item, customer, category, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes and special instructions (order note, delivery instructions)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, M-PESA receipt codes
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Street / city / landmark fields of a delivery address
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Collect a batch of validation errors into a single AppError.
///
/// Returns `Ok(())` when the list is empty, a single `Validation` for one
/// failure, and `MultiValidation` for several so the response carries the
/// full `errors` list.
pub fn collect_errors(mut errors: Vec<String>) -> Result<(), AppError> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(AppError::Validation(errors.remove(0))),
        _ => Err(AppError::MultiValidation(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_text_is_rejected() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Chapati", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn overlong_optional_text_is_rejected() {
        let long = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert!(validate_optional_text(&long, "notes", MAX_NOTE_LEN).is_err());
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
    }

    #[test]
    fn multiple_errors_become_a_list() {
        let err = collect_errors(vec!["a".into(), "b".into()]).unwrap_err();
        assert!(matches!(err, AppError::MultiValidation(ref v) if v.len() == 2));
    }
}
