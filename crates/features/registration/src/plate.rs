//! Korean license-plate validation.

use crate::messages;
use regex::Regex;
use std::sync::LazyLock;
use vreg_domain::model::ValidationResult;

// ASCII classes on purpose: `\d` would also accept non-ASCII digits.
static PLATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2,3}[가-힣][0-9]{4}$").expect("plate regex is valid")
});

const MIN_LEN: usize = 7;
const MAX_LEN: usize = 8;

/// Normalizes and validates plate numbers such as `12가3456` or `123가4567`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlateValidator;

impl PlateValidator {
    /// Strips all whitespace from `raw` and checks it against the plate format.
    #[must_use]
    pub fn validate(raw: &str) -> ValidationResult {
        let normalized = normalize(raw);

        let len = normalized.chars().count();
        if !(MIN_LEN..=MAX_LEN).contains(&len) {
            return ValidationResult::invalid(normalized, messages::PLATE_LENGTH);
        }

        if !PLATE_PATTERN.is_match(&normalized) {
            return ValidationResult::invalid(normalized, messages::PLATE_FORMAT);
        }

        ValidationResult::valid(normalized)
    }
}

/// `raw` without any whitespace, inner whitespace included.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}
