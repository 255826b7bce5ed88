// Convert free-text locations into the ZIP key used for every market lookup.
// Keep it SIMPLE: US 5-digit ZIPs only, first match wins.

use once_cell::sync::Lazy;
use regex::Regex;

// ASCII word boundaries: non-ASCII letters next to the digits still count as a boundary
static ZIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{5}(?-u:\b)").expect("ZIP pattern is valid")
});

/// Return the first standalone 5-digit run in `location`.
///
/// The run must be bounded by a non-word character or the string edge on both
/// sides, so "78701-1234" yields "78701" while "123456" and "A78701" yield nothing.
pub fn extract_zip(location: &str) -> Option<String> {
    ZIP_RE.find(location).map(|m| m.as_str().to_string())
}
