//! Text canonicalization shared by queries, journal names and lexicon phrases.

/// Lowercase, replace everything outside `[a-z0-9\s-]` with a space, collapse
/// whitespace runs and trim.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_case() {
        assert_eq!(
            normalize("Journal of Agricultural & Resource Economics"),
            "journal of agricultural resource economics"
        );
        assert_eq!(normalize("U.S.-China  trade"), "u s -china trade");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  a\t\tb \n c  "), "a b c");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_non_ascii_letters_become_spaces() {
        assert_eq!(normalize("Économie Appliquée"), "conomie appliqu e");
    }
}
