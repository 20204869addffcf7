//! Product matching against the controlled vocabulary.
//!
//! Matching is containment with whole-word boundaries on both sides:
//! a vocabulary entry inside free text only counts when it is not
//! glued to surrounding word characters, so `facet` never matches
//! inside `facetin`. Entries are tried in fixed vocabulary order and
//! the first hit wins; there is no best-match scoring.

use icsr_standards::{ProductVocabulary, normalize_name};

/// Matches a free-text drug name against the vocabulary.
///
/// Returns the canonical product key of the first whole-word hit, or
/// `None` when nothing in the vocabulary occurs in the name.
pub fn match_product<'a>(vocabulary: &'a ProductVocabulary, name: &str) -> Option<&'a str> {
    let haystack = normalize_name(name);
    if haystack.is_empty() {
        return None;
    }
    vocabulary
        .entries()
        .iter()
        .find(|entry| contains_whole_word(&haystack, &entry.normalized))
        .map(|entry| entry.key.as_str())
}

/// Whole-word containment over normalized text.
///
/// Word characters are alphanumerics; spaces, `+` and `-` act as
/// boundaries (they are exactly what normalization leaves between
/// words).
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut search_from = 0;
    while let Some(offset) = haystack[search_from..].find(needle) {
        let begin = search_from + offset;
        let end = begin + needle.len();
        let left_bounded = haystack[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let right_bounded = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if left_bounded && right_bounded {
            return true;
        }
        // advance one full character to stay on a utf-8 boundary
        let step = haystack[begin..].chars().next().map_or(1, char::len_utf8);
        search_from = begin + step;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> ProductVocabulary {
        ProductVocabulary::from_entries([
            ("Facet", false),
            ("Facetin", false),
            ("Zolid Plus", true),
        ])
    }

    #[test]
    fn exact_name_matches() {
        assert_eq!(match_product(&vocabulary(), "Facetin"), Some("Facetin"));
    }

    #[test]
    fn match_ignores_case_and_punctuation() {
        assert_eq!(
            match_product(&vocabulary(), "FACETIN(R) 500mg tab."),
            Some("Facetin")
        );
        assert_eq!(
            match_product(&vocabulary(), "tablet zolid, plus coated"),
            Some("Zolid Plus")
        );
    }

    #[test]
    fn substring_without_word_boundary_does_not_match() {
        // "Facet" must not fire inside "Facetinol"
        assert_eq!(match_product(&vocabulary(), "Facetinol"), None);
    }

    #[test]
    fn first_vocabulary_entry_wins_ties() {
        // both "Facet" and "Facetin" occur; vocabulary order decides
        assert_eq!(
            match_product(&vocabulary(), "facet and facetin combo"),
            Some("Facet")
        );
    }

    #[test]
    fn unmatched_name_is_none() {
        assert_eq!(match_product(&vocabulary(), "Paracetamol"), None);
        assert_eq!(match_product(&vocabulary(), ""), None);
    }

    #[test]
    fn combination_separator_is_a_boundary() {
        assert_eq!(
            match_product(&vocabulary(), "Facetin+Ibuprofen"),
            Some("Facetin")
        );
    }
}
