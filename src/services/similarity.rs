//! String and set similarity kernels.
//!
//! These are intentionally weak heuristics: they detect blatant structural
//! drift between consecutive plans, not semantic equivalence. They live in
//! one module so a stronger replacement (e.g. a secondary model call) has
//! a single seam to plug into.

use std::collections::{HashMap, HashSet};

/// Bigram similarity above this counts as a fuzzy match in decision reuse.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// Jaccard similarity of two string collections, case-insensitive.
///
/// `|A ∩ B| / |A ∪ B|`. Both empty is perfect agreement (1.0); exactly one
/// empty is total disagreement (0.0).
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<String> = a.iter().map(|s| s.to_lowercase()).collect();
    let set_b: HashSet<String> = b.iter().map(|s| s.to_lowercase()).collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

/// Dice-like bigram similarity of two strings, case-insensitive.
///
/// Equal strings score 1.0; a string shorter than two characters scores
/// 0.0 against anything unequal. Otherwise:
/// `2 * Σ min(count_a(g), count_b(g)) / (|a| + |b| - 2)` over bigrams `g`,
/// where `|a| + |b| - 2` is the total bigram count of both strings.
pub fn bigram_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }

    let chars_a: Vec<char> = a.chars().collect();
    let chars_b: Vec<char> = b.chars().collect();
    if chars_a.len() < 2 || chars_b.len() < 2 {
        return 0.0;
    }

    let counts_a = bigram_counts(&chars_a);
    let counts_b = bigram_counts(&chars_b);

    let shared: usize = counts_a
        .iter()
        .map(|(bigram, count)| count.min(counts_b.get(bigram).unwrap_or(&0)))
        .sum();

    let total_bigrams = chars_a.len() + chars_b.len() - 2;
    2.0 * shared as f64 / total_bigrams as f64
}

fn bigram_counts(chars: &[char]) -> HashMap<(char, char), usize> {
    let mut counts = HashMap::new();
    for pair in chars.windows(2) {
        *counts.entry((pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jaccard_empty_cases() {
        let empty: Vec<String> = vec![];
        let some = vec!["a".to_string()];
        assert_eq!(jaccard(&empty, &empty), 1.0);
        assert_eq!(jaccard(&empty, &some), 0.0);
        assert_eq!(jaccard(&some, &empty), 0.0);
    }

    #[test]
    fn test_jaccard_overlap() {
        let a = vec!["x".to_string(), "y".to_string()];
        let b = vec!["y".to_string(), "z".to_string()];
        // intersection {y}, union {x, y, z}
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_jaccard_is_case_insensitive() {
        let a = vec!["Ship X".to_string()];
        let b = vec!["ship x".to_string()];
        assert_eq!(jaccard(&a, &b), 1.0);
    }

    #[test]
    fn test_bigram_equal_strings() {
        assert_eq!(bigram_similarity("refactor", "refactor"), 1.0);
        assert_eq!(bigram_similarity("Refactor", "refactor"), 1.0);
    }

    #[test]
    fn test_bigram_short_strings() {
        assert_eq!(bigram_similarity("a", "abc"), 0.0);
        assert_eq!(bigram_similarity("ab", "x"), 0.0);
        // Two equal one-char strings hit the equality fast path.
        assert_eq!(bigram_similarity("a", "a"), 1.0);
    }

    #[test]
    fn test_bigram_disjoint() {
        assert_eq!(bigram_similarity("abab", "cdcd"), 0.0);
    }

    #[test]
    fn test_bigram_partial_overlap() {
        // "night" and "nacht" share bigrams {ht}; 3 + 4 bigrams total.
        let sim = bigram_similarity("night", "nacht");
        assert!((sim - 2.0 / 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_bigram_near_identical_clears_threshold() {
        let sim = bigram_similarity(
            "implement the login endpoint",
            "implement the login endpoints",
        );
        assert!(
            sim > FUZZY_MATCH_THRESHOLD,
            "near-identical task text should fuzzy-match, got {sim}"
        );
    }
}
