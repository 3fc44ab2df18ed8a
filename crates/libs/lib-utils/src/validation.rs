//! # Validation Utilities
//!
//! Field-level checks used by the HTML forms. Messages follow the wording
//! users already know from classic form libraries.

/// Validate that a field was filled in.
pub fn validate_required(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("This field is required.".to_string())
    } else {
        Ok(())
    }
}

/// Validate that the character count lies within `min..=max`.
pub fn validate_length_range(value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        Err(format!("Field must be between {} and {} characters long.", min, max))
    } else {
        Ok(())
    }
}

/// Validate that a field matches another one (e.g. password confirmation).
pub fn validate_equal(value: &str, other: &str, other_name: &str) -> Result<(), String> {
    if value == other {
        Ok(())
    } else {
        Err(format!("Field must be equal to {}.", other_name))
    }
}
