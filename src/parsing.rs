//! Handle parsing and normalization utilities.
//!
//! Handles reach the service in several spellings (`@Alice`, `alice`,
//! ` alice `). These helpers turn them into a single canonical form used for
//! cache keys and search queries.

/// Normalizes a handle: trims whitespace, strips one leading `@`, lowercases.
///
/// Twitter handles are case-insensitive, so `@Alice` and `alice` map to the
/// same key.
pub fn normalize_handle(handle: &str) -> String {
    let trimmed = handle.trim();
    trimmed
        .strip_prefix('@')
        .unwrap_or(trimmed)
        .to_lowercase()
}

/// Checks whether `handle` (with or without a leading `@`) is a valid Twitter handle.
///
/// Valid handles are 1 to 15 ASCII letters, digits or underscores.
///
/// # Example
///
/// ```rust
/// use replytree::parsing::is_valid_handle;
///
/// assert!(is_valid_handle("@alice_01"));
/// assert!(!is_valid_handle("not a handle"));
/// ```
pub fn is_valid_handle(handle: &str) -> bool {
    let re = match regex::Regex::new(r"^@?[A-Za-z0-9_]{1,15}$") {
        Ok(re) => re,
        Err(_) => return false,
    };
    re.is_match(handle.trim())
}

/// Builds the mention search query for a handle: `"@" + handle`.
///
/// The query is not URL-escaped here; the HTTP client escapes it when
/// building the request URL.
pub fn mention_query(handle: &str) -> String {
    format!("@{}", normalize_handle(handle))
}
