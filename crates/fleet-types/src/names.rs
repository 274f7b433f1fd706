//! Validation for lot names and shop locations.
//!
//! Both end up as file names under the data directory, so they must be
//! safe single path components:
//! - Must be non-empty
//! - Must not contain whitespace, path separators, `:`, `*`, `?`, `,`
//! - Must not contain `..`
//! - Must not start with `.`

use crate::error::TypeError;

/// Characters that are forbidden anywhere in a lot name or location.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '/', '\\', ':', '*', '?', ','];

/// Validate a lot name.
///
/// ```
/// use fleet_types::validate_lot_name;
///
/// assert!(validate_lot_name("north").is_ok());
/// assert!(validate_lot_name("overflow-2").is_ok());
/// assert!(validate_lot_name("").is_err());
/// assert!(validate_lot_name("../etc").is_err());
/// ```
pub fn validate_lot_name(name: &str) -> Result<(), TypeError> {
    validate_component("lot", name)
}

/// Validate a shop location. Same rules as lot names.
pub fn validate_location(name: &str) -> Result<(), TypeError> {
    validate_component("location", name)
}

fn validate_component(kind: &'static str, name: &str) -> Result<(), TypeError> {
    let invalid = |reason: String| TypeError::InvalidName {
        kind,
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("must not be empty".into()));
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(invalid(format!("contains forbidden character: {ch:?}")));
        }
    }

    if name.contains("..") {
        return Err(invalid("must not contain '..'".into()));
    }

    if name.starts_with('.') {
        return Err(invalid("must not start with '.'".into()));
    }

    Ok(())
}
