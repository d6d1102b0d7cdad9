//! Reject-reason classification.
//!
//! Matches a free-text reject reason against the phrase catalog and flags
//! every document category it implicates. A phrase matches when it occurs
//! verbatim in the lowercased reason, or when the bigram similarity between
//! the reason and the phrase reaches the configured threshold.

use serde::{Deserialize, Serialize};
use shinra_catalog::PhraseCatalog;
use shinra_features::{contains_phrase, normalize_reason, similarity, BigramMode};
use shinra_model::{Category, Classification};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Threshold must be within 0.0..=1.0, got {0}")]
    ThresholdOutOfRange(f32),
}

/// Configuration for the classifier.
///
/// Built through `Default` and the validating `with_*` setters only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifierConfig {
    /// Minimum similarity for a phrase to match
    pub threshold: f32,
    /// Bigram counting used for similarity
    pub bigram_mode: BigramMode,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            bigram_mode: BigramMode::Unique,
        }
    }
}

impl ClassifierConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn with_bigram_mode(mut self, mode: BigramMode) -> Self {
        self.bigram_mode = mode;
        self
    }
}

/// The phrase that implicated a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTrace {
    pub category: Category,
    pub phrase: String,
    /// Similarity between the normalized reason and the phrase
    pub score: f32,
    /// Whether the phrase occurs verbatim in the reason
    pub substring: bool,
}

/// Classifies reject reasons against a phrase catalog.
///
/// Holds only immutable state, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    catalog: &'a PhraseCatalog,
    config: ClassifierConfig,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(PhraseCatalog::builtin(), ClassifierConfig::default())
    }
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: &'a PhraseCatalog, config: ClassifierConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &PhraseCatalog {
        self.catalog
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a single reject reason.
    ///
    /// Empty input implicates nothing.
    pub fn classify(&self, reason: &str) -> Classification {
        let mut result = Classification::none();
        if reason.is_empty() {
            return result;
        }

        let normalized = normalize_reason(reason);
        for category in Category::ALL {
            if let Some(hit) = self.first_match(&normalized, category) {
                tracing::trace!(
                    category = category.key(),
                    phrase = %hit.phrase,
                    score = hit.score,
                    substring = hit.substring,
                    "Phrase matched"
                );
                result.set(category, true);
            }
        }

        result
    }

    /// Classify a dynamically typed reason.
    ///
    /// Only JSON strings are classified; null, numbers, arrays and objects
    /// yield the all-false result.
    pub fn classify_value(&self, reason: &serde_json::Value) -> Classification {
        match reason.as_str() {
            Some(text) => self.classify(text),
            None => Classification::none(),
        }
    }

    /// Classify every reason and OR the results per category.
    ///
    /// Every reason is classified even once all categories are implicated.
    pub fn classify_batch<I, S>(&self, reasons: I) -> Classification
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut count = 0usize;
        let aggregate: Classification = reasons
            .into_iter()
            .map(|reason| {
                count += 1;
                self.classify(reason.as_ref())
            })
            .collect();
        tracing::debug!(reasons = count, "Classified batch");
        aggregate
    }

    /// Report the first matching phrase of each implicated category.
    pub fn explain_match(&self, reason: &str) -> Vec<MatchTrace> {
        if reason.is_empty() {
            return Vec::new();
        }
        let normalized = normalize_reason(reason);
        Category::ALL
            .into_iter()
            .filter_map(|category| self.first_match(&normalized, category))
            .collect()
    }

    fn first_match(&self, normalized: &str, category: Category) -> Option<MatchTrace> {
        self.catalog.phrases(category).iter().find_map(|phrase| {
            let score = similarity(normalized, phrase, self.config.bigram_mode);
            let substring = contains_phrase(normalized, phrase);
            (score >= self.config.threshold || substring).then(|| MatchTrace {
                category,
                phrase: phrase.clone(),
                score,
                substring,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flags(registration_doc: bool, vehicle_doc: bool, id_card_doc: bool) -> Classification {
        Classification {
            registration_doc,
            vehicle_doc,
            id_card_doc,
        }
    }

    #[test]
    fn test_empty_reason() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(""), Classification::none());
        assert!(classifier.explain_match("").is_empty());
    }

    #[test]
    fn test_non_string_values() {
        let classifier = Classifier::default();
        for value in [
            serde_json::Value::Null,
            serde_json::json!(123),
            serde_json::json!(true),
            serde_json::json!(["photo of id card"]),
            serde_json::json!({"reason": "photo of id card"}),
            serde_json::json!(""),
        ] {
            assert_eq!(classifier.classify_value(&value), Classification::none());
        }
        assert_eq!(
            classifier.classify_value(&serde_json::json!("Photo of ID Card is blurry")),
            flags(false, false, true)
        );
    }

    #[test]
    fn test_id_card_blurry() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("Photo of ID Card is blurry"), flags(false, false, true));
    }

    #[test]
    fn test_photocopy_of_registration() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("Photocopy of registration"), flags(true, false, false));
    }

    #[test]
    fn test_multiple_categories() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify("Vehicle photo and registration certificate mismatch"),
            flags(true, true, false)
        );
    }

    #[test]
    fn test_unrelated_reason() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("payment failed"), Classification::none());
    }

    #[test]
    fn test_typo_still_matches() {
        let classifier = Classifier::default();
        assert!(classifier.classify("vehicle color msimatch").vehicle_doc);
        assert!(classifier.classify("ID card expird").id_card_doc);
    }

    #[test]
    fn test_explain_match_reports_first_phrase() {
        let classifier = Classifier::default();
        let traces = classifier.explain_match("Photo of ID Card is blurry");
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].category, Category::IdCardDoc);
        assert_eq!(traces[0].phrase, "photo of id card");
        assert!(traces[0].substring);
    }

    #[test]
    fn test_explain_match_by_similarity() {
        let classifier = Classifier::default();
        let traces = classifier.explain_match("vehicle color msimatch");
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].category, Category::VehicleDoc);
        assert_eq!(traces[0].phrase, "vehicle color mismatch");
        assert!(!traces[0].substring);
        assert!(traces[0].score >= 0.6, "score was {}", traces[0].score);
        assert!(traces[0].score < 1.0);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(ClassifierConfig::default().with_threshold(0.75).is_ok());
        assert!(matches!(
            ClassifierConfig::default().with_threshold(1.5),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));
        assert!(ClassifierConfig::default().with_threshold(f32::NAN).is_err());
    }

    #[test]
    fn test_threshold_one_keeps_substring_matches() {
        let config = ClassifierConfig::default().with_threshold(1.0).unwrap();
        let classifier = Classifier::new(PhraseCatalog::builtin(), config);
        assert_eq!(classifier.classify("Photocopy of registration"), Classification::none());
        assert!(classifier.classify("Sent a photo of id card from 2010").id_card_doc);
    }

    #[test]
    fn test_multiset_mode_is_stricter() {
        let config = ClassifierConfig::default().with_bigram_mode(BigramMode::Multiset);
        let classifier = Classifier::new(PhraseCatalog::builtin(), config);
        let result = classifier.classify("Vehicle photo and registration certificate mismatch");
        assert!(result.registration_doc);
        assert!(!result.vehicle_doc);
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = PhraseCatalog::new(
            vec!["stnk expired".into()],
            vec!["plate covered".into()],
            vec!["ktp blurry".into()],
        )
        .unwrap();
        let classifier = Classifier::new(&catalog, ClassifierConfig::default());
        assert_eq!(classifier.classify("KTP BLURRY"), flags(false, false, true));
        assert_eq!(classifier.classify("Photo of ID Card is blurry"), Classification::none());
    }
}
