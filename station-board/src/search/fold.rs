//! Text folding for case- and diacritic-insensitive comparison.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold text for matching: decompose, strip combining marks, lowercase.
///
/// "Hämeenlinna" and "HAMEENLINNA" fold to the same string. Letters that
/// have no canonical decomposition (such as `ø`) are only lowercased.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases() {
        assert_eq!(fold("Central"), "central");
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(fold("Hämeenlinna"), "hameenlinna");
        assert_eq!(fold("Málaga"), "malaga");
        assert_eq!(fold("Zürich HB"), "zurich hb");
    }

    #[test]
    fn precomposed_and_decomposed_agree() {
        assert_eq!(fold("caf\u{e9}"), fold("cafe\u{301}"));
    }

    #[test]
    fn empty() {
        assert_eq!(fold(""), "");
    }
}
