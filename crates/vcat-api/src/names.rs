//! Reference name validation.
//!
//! Valid reference names:
//! - Must be non-empty
//! - Must start with an ASCII letter
//! - May only contain ASCII letters, digits, `.`, `/`, `_` and `-`
//! - Must not contain `..` or `//`
//! - Must not end with `.` or `/`

use crate::error::{ApiError, Result};

fn invalid(name: &str, reason: impl Into<String>) -> ApiError {
    ApiError::InvalidReferenceName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a reference name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use vcat_api::names::validate_reference_name;
///
/// assert!(validate_reference_name("main").is_ok());
/// assert!(validate_reference_name("feature/auth").is_ok());
/// assert!(validate_reference_name("").is_err());
/// assert!(validate_reference_name("bad..name").is_err());
/// ```
pub fn validate_reference_name(name: &str) -> Result<()> {
    let Some(first) = name.chars().next() else {
        return Err(invalid(name, "reference name must not be empty"));
    };

    if !first.is_ascii_alphabetic() {
        return Err(invalid(name, "must start with a letter"));
    }

    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '_' | '-')))
    {
        return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
    }

    if name.contains("..") {
        return Err(invalid(name, "must not contain '..'"));
    }

    if name.contains("//") {
        return Err(invalid(name, "must not contain consecutive slashes '//'"));
    }

    if name.ends_with('.') || name.ends_with('/') {
        return Err(invalid(name, "must not end with '.' or '/'"));
    }

    Ok(())
}
