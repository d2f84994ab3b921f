//! Token similarity scoring.
//!
//! Similarity is derived from Levenshtein edit distance, normalized to
//! `1 - distance / max(len)` so that identical strings score 1.0 and
//! entirely different strings score 0.0. Lengths and distances are
//! counted in characters, not bytes.

/// Levenshtein edit distance between two strings, counted in characters.
///
/// Uses the two-row dynamic programming form, so memory is linear in the
/// length of `b`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr: Vec<usize> = vec![0; b_chars.len() + 1];

    for (i, a_ch) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// Similarity ratio in `[0.0, 1.0]`: `1 - edit_distance / max(char count)`.
///
/// Two empty strings are identical and score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let ratio = 1.0 - edit_distance(a, b) as f64 / max_len as f64;
    ratio.max(0.0)
}

/// Case-aware string equality. The insensitive form lowercases both sides.
pub fn equals(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

/// Tests whether `token` matches `target` at the given similarity threshold.
///
/// A threshold of zero or below collapses to plain equality: similarity is
/// never negative, so every token would otherwise pass. For insensitive
/// comparisons the similarity is computed over lowercased forms.
pub fn fuzzy_matches(token: &str, target: &str, threshold: f64, case_sensitive: bool) -> bool {
    if threshold <= 0.0 {
        return equals(token, target, case_sensitive);
    }
    if case_sensitive {
        similarity(token, target) >= threshold
    } else {
        similarity(&token.to_lowercase(), &target.to_lowercase()) >= threshold
    }
}
