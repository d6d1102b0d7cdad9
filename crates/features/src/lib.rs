//! Feature extraction for reject-reason matching.
//!
//! Provides pure functions used by the classifier:
//! - Text normalization
//! - Bigram generation
//! - Dice coefficient similarity (unique-set and multiset variants)
//! - Phrase containment

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How bigrams are counted when computing the Dice coefficient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BigramMode {
    /// Each distinct bigram counts once.
    #[default]
    Unique,
    /// Repeated bigrams count as often as they occur.
    Multiset,
}

/// Normalize a reject reason for comparison.
///
/// Lowercase only: whitespace and punctuation are left as the caller gave them.
pub fn normalize_reason(text: &str) -> String {
    text.to_lowercase()
}

/// Generate overlapping character bigrams.
///
/// Whitespace is part of the text and produces bigrams like `"o "`.
/// Text shorter than two characters has no bigrams.
pub fn bigrams(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(2).map(|w| w.iter().collect()).collect()
}

/// Dice coefficient over the distinct bigrams of each string.
///
/// `2 * |A ∩ B| / (|A| + |B|)`. Returns 0.0 when either side has no bigrams.
pub fn dice_coefficient(a: &str, b: &str) -> f32 {
    let left: HashSet<String> = bigrams(a).into_iter().collect();
    let right: HashSet<String> = bigrams(b).into_iter().collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    (2 * shared) as f32 / (left.len() + right.len()) as f32
}

/// Dice coefficient over bigram multisets.
///
/// A bigram occurring twice on one side can only pair with two occurrences
/// on the other.
pub fn dice_coefficient_multiset(a: &str, b: &str) -> f32 {
    let left = bigrams(a);
    let right = bigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let mut remaining: HashMap<&str, usize> = HashMap::new();
    for pair in &right {
        *remaining.entry(pair.as_str()).or_insert(0) += 1;
    }

    let mut shared = 0usize;
    for pair in &left {
        if let Some(count) = remaining.get_mut(pair.as_str()) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f32 / (left.len() + right.len()) as f32
}

/// Similarity between two already-normalized strings.
pub fn similarity(a: &str, b: &str, mode: BigramMode) -> f32 {
    match mode {
        BigramMode::Unique => dice_coefficient(a, b),
        BigramMode::Multiset => dice_coefficient_multiset(a, b),
    }
}

/// Check whether `phrase` occurs verbatim inside `text`.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    !phrase.is_empty() && text.contains(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_normalize_reason() {
        assert_eq!(normalize_reason("Photo of ID Card"), "photo of id card");
        // No trimming or punctuation stripping
        assert_eq!(normalize_reason("  Blurry!  "), "  blurry!  ");
    }

    #[test]
    fn test_bigrams() {
        assert_eq!(bigrams("NIKE"), vec!["NI", "IK", "KE"]);
        assert_eq!(bigrams("a b"), vec!["a ", " b"]);
        assert!(bigrams("a").is_empty());
        assert!(bigrams("").is_empty());
    }

    #[test]
    fn test_bigrams_unicode() {
        assert_eq!(bigrams("héé"), vec!["hé", "éé"]);
    }

    #[test]
    fn test_dice_identical() {
        assert!(approx(dice_coefficient("night", "night"), 1.0));
        assert!(approx(dice_coefficient_multiset("night", "night"), 1.0));
    }

    #[test]
    fn test_dice_disjoint() {
        assert_eq!(dice_coefficient("abc", "xyz"), 0.0);
        assert_eq!(dice_coefficient_multiset("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_dice_classic_example() {
        // ni ig gh ht vs na ac ch ht: one shared bigram
        assert!(approx(dice_coefficient("night", "nacht"), 0.25));
        assert!(approx(dice_coefficient_multiset("night", "nacht"), 0.25));
    }

    #[test]
    fn test_dice_short_strings() {
        assert_eq!(dice_coefficient("", ""), 0.0);
        assert_eq!(dice_coefficient("a", "a"), 0.0);
        assert_eq!(dice_coefficient("a", "ab"), 0.0);
        assert_eq!(dice_coefficient_multiset("", "abc"), 0.0);
        assert!(approx(dice_coefficient("ab", "ab"), 1.0));
    }

    #[test]
    fn test_unique_vs_multiset() {
        // "aaa" has bigrams [aa, aa]; "aa" has [aa]
        assert!(approx(dice_coefficient("aa", "aaa"), 1.0));
        assert!(approx(dice_coefficient_multiset("aa", "aaa"), 2.0 / 3.0));
    }

    #[test]
    fn test_dice_symmetric() {
        let a = "vehicle photo and registration certificate mismatch";
        let b = "vehicle photo already registered";
        assert!(approx(dice_coefficient(a, b), dice_coefficient(b, a)));
        assert!(approx(
            dice_coefficient_multiset(a, b),
            dice_coefficient_multiset(b, a)
        ));
    }

    #[test]
    fn test_transposed_letters() {
        let score = dice_coefficient("vehicle color msimatch", "vehicle color mismatch");
        assert!(approx(score, 18.0 / 21.0), "score was {score}");
    }

    #[test]
    fn test_similarity_dispatch() {
        assert!(approx(similarity("aa", "aaa", BigramMode::Unique), 1.0));
        assert!(approx(similarity("aa", "aaa", BigramMode::Multiset), 2.0 / 3.0));
    }

    #[test]
    fn test_contains_phrase() {
        assert!(contains_phrase("photo of id card is blurry", "photo of id card"));
        assert!(!contains_phrase("photo of id", "photo of id card"));
        assert!(!contains_phrase("anything", ""));
    }
}
