//! Morphological variant expansion for single-word keywords.

/// Suffixes tried when expanding a keyword into variants.
const VARIANT_SUFFIXES: [&str; 8] = ["s", "es", "ed", "ing", "al", "ally", "ity", "ities"];

/// Expands a word into itself plus simple suffixed forms.
///
/// Each suffix is appended to the word as written and, when the word ends
/// in `e`, to the stem with that `e` dropped ("analyse" also yields
/// "analysing"). The word itself comes first and duplicates are removed,
/// keeping the earliest occurrence.
pub fn word_variants(word: &str) -> Vec<String> {
    let mut variants = vec![word.to_string()];
    let stem = word.strip_suffix('e');
    for suffix in VARIANT_SUFFIXES {
        push_unique(&mut variants, format!("{word}{suffix}"));
        if let Some(stem) = stem {
            push_unique(&mut variants, format!("{stem}{suffix}"));
        }
    }
    variants
}

/// Appends `candidate` unless it is already present.
fn push_unique(variants: &mut Vec<String>, candidate: String) {
    if !variants.contains(&candidate) {
        variants.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_itself_comes_first() {
        let variants = word_variants("fox");
        assert_eq!(variants[0], "fox");
    }

    #[test]
    fn plain_word_gets_each_suffix() {
        let variants = word_variants("fox");
        for suffix in ["s", "es", "ed", "ing", "al", "ally", "ity", "ities"] {
            assert!(variants.contains(&format!("fox{suffix}")), "missing fox{suffix}");
        }
        assert_eq!(variants.len(), 9);
    }

    #[test]
    fn trailing_e_adds_stemmed_forms() {
        let variants = word_variants("rate");
        assert!(variants.contains(&"rates".to_string()));
        assert!(variants.contains(&"rated".to_string()));
        assert!(variants.contains(&"rating".to_string()));
        // Unstemmed forms are kept as well.
        assert!(variants.contains(&"rateing".to_string()));
    }

    #[test]
    fn duplicates_are_dropped() {
        // "rate"+"s" and "rat"+"es" both give "rates".
        let variants = word_variants("rate");
        let rates = variants.iter().filter(|v| v.as_str() == "rates").count();
        assert_eq!(rates, 1);
    }

    #[test]
    fn empty_word_still_yields_suffixes() {
        let variants = word_variants("");
        assert_eq!(variants[0], "");
        assert!(variants.contains(&"ing".to_string()));
    }
}
