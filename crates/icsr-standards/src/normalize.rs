//! Name normalization shared by every reference-table lookup.
//!
//! Product names and event terms arrive with inconsistent casing and
//! punctuation. All table keys and all lookup inputs pass through
//! [`normalize_name`] so that the two sides always agree.

/// Normalizes a free-text name for vocabulary matching.
///
/// Lowercases, replaces every character outside letters, digits,
/// whitespace, `+` and `-` with a space, then collapses whitespace
/// runs. `+` and `-` are preserved because they separate the parts of
/// combination-drug names. Idempotent.
pub fn normalize_name(raw: &str) -> String {
    let mapped: String = raw
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || c == '+' || c == '-' {
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
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize_name("FACETIN(R) 500mg."), "facetin r 500mg");
    }

    #[test]
    fn preserves_combination_separators() {
        assert_eq!(
            normalize_name("Amoxicillin + Clavulanate"),
            "amoxicillin + clavulanate"
        );
        assert_eq!(normalize_name("Co-trimoxazole"), "co-trimoxazole");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize_name("  a   b\t c "), "a b c");
    }

    #[test]
    fn is_idempotent() {
        let once = normalize_name("Some/Product, Name!");
        assert_eq!(normalize_name(&once), once);
    }
}
