//! Comma-separated label lists
//!
//! Users type edge labels as `"knows, likes"`. Merged render edges join their
//! labels with [`LABEL_JOINER`], so parsing and joining are inverse for labels
//! that contain no commas.

/// Separator used when joining merged labels into a title
pub const LABEL_JOINER: &str = ", ";

/// Split raw label input on commas, trimming each item
///
/// Empty items are kept so callers can decide whether to reject them.
#[must_use]
pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',').map(|label| label.trim().to_string()).collect()
}

/// Join labels into a display title
#[must_use]
pub fn join_labels<S: AsRef<str>>(labels: &[S]) -> String {
    labels
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(LABEL_JOINER)
}
