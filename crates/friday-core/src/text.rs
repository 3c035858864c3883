// crates/friday-core/src/text.rs

/// Convert a string into a folded key suitable for comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Łódź` -> `Lodz`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use friday_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("San José"), "san jose");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Compares two strings for equality after Unicode folding and normalization.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a.trim()) == fold_key(b.trim())
}

/// Length of a query as the user sees it: trimmed, in characters.
pub fn query_len(q: &str) -> usize {
    q.trim().chars().count()
}

/// `true` when `q` has at least `min_chars` characters after trimming.
#[inline]
pub fn is_searchable(q: &str, min_chars: usize) -> bool {
    query_len(q) >= min_chars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_case() {
        assert!(equals_folded("Zürich", "zurich"));
        assert!(equals_folded(" München ", "MUNCHEN"));
        assert!(!equals_folded("Seattle", "Tacoma"));
    }

    #[test]
    fn query_length_counts_characters_not_bytes() {
        assert_eq!(query_len("  é "), 1);
        assert!(!is_searchable("é", 2));
        assert!(is_searchable("éa", 2));
        assert!(!is_searchable("   ", 2));
    }
}
