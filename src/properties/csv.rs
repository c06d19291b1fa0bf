//! Comma-separated list encoding used by multi-valued properties

/// Splits a CSV property value into trimmed, non-blank entries.
///
/// ```
/// use scanbridge::properties::csv::split;
///
/// assert_eq!(split(Some(" src , ,test ")), vec!["src", "test"]);
/// assert!(split(None).is_empty());
/// ```
pub fn split(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins entries with `,` in order. Entries are not filtered.
pub fn join<S: AsRef<str>>(entries: &[S]) -> String {
    entries
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}
