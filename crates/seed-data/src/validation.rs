//! Scenario name validation.
//!
//! Scenario names double as dump file stems (`<name>_seeds.json`), so they
//! are restricted to characters that are safe in file names on every
//! platform.
//!
//! # Validation Rules
//!
//! - Length between 1 and [`SCENARIO_NAME_MAX`] characters
//! - Allowed characters: ASCII letters, digits, underscores and hyphens

/// Maximum allowed length for a scenario name.
pub const SCENARIO_NAME_MAX: usize = 128;

/// Validates a scenario name.
///
/// # Examples
///
/// ```
/// use seed_data::is_valid_scenario_name;
///
/// assert!(is_valid_scenario_name("existing_user_get_operations"));
/// assert!(is_valid_scenario_name("smoke-2"));
/// assert!(!is_valid_scenario_name(""));
/// assert!(!is_valid_scenario_name("../etc"));
/// assert!(!is_valid_scenario_name("with space"));
/// ```
#[must_use]
pub fn is_valid_scenario_name(name: &str) -> bool {
    scenario_name_violation(name).is_none()
}

/// Describes why `name` is not a valid scenario name.
pub(crate) fn scenario_name_violation(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name must not be empty");
    }
    if name.len() > SCENARIO_NAME_MAX {
        return Some("name is too long");
    }
    if !name.chars().all(is_valid_scenario_name_char) {
        return Some("name may only contain ASCII letters, digits, '_' and '-'");
    }
    None
}

const fn is_valid_scenario_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
