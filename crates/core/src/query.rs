//! Helpers shared by the read-only filters of every service.

use crate::error::{ShopError, ShopResult, require_non_empty};

/// Case-insensitive substring match.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Validates a search term and returns it trimmed.
pub fn search_term<'a>(field: &str, term: &'a str) -> ShopResult<&'a str> {
    require_non_empty(field, term)?;
    Ok(term.trim())
}

/// Fails when `min > max`.
pub fn require_range<T: PartialOrd + core::fmt::Display>(field: &str, min: T, max: T) -> ShopResult<()> {
    if min > max {
        return Err(ShopError::validation(format!(
            "{field} range is inverted (min {min} > max {max})"
        )));
    }
    Ok(())
}
