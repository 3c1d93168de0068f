//! Join-key canonicalization.
//!
//! Reference codes and extracted codes carry arbitrary surface punctuation
//! ("47.21-1-02", "4721-1/02", "4721102"). Matching happens on the
//! digits-only form.

/// Strip every non-digit character. Pure and total; idempotent by
/// construction. An input with no digits yields the empty string.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
