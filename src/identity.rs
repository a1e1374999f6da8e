//! Dish identity normalization
//!
//! Dishes may be recorded under a compound name (`"牛肉面 | beef noodle"`)
//! or the bare canonical form (`"牛肉面"`). The canonical identity is the
//! portion before the first `" | "` separator, trimmed.

/// Separator between a canonical dish name and its alternate name
pub const ALTERNATE_NAME_SEPARATOR: &str = " | ";

/// Reduce a raw dish label to its canonical identity.
///
/// Pure and total: every input maps to exactly one canonical identity, and
/// applying `canonical` twice is the same as applying it once.
pub fn canonical(raw: &str) -> &str {
    match raw.find(ALTERNATE_NAME_SEPARATOR) {
        Some(index) => raw[..index].trim(),
        None => raw.trim(),
    }
}
