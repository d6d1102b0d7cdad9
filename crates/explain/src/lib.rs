//! Report generation for reject-reason analysis.
//!
//! Turns pasted reject reasons into per-line results and renders them as
//! category badges suitable for display in a terminal or web interface.

use serde::{Deserialize, Serialize, Serializer};
use shinra_classify::Classifier;
use shinra_model::{BadgeState, Category, Classification};
use std::collections::HashMap;
use std::fmt;

/// Sample reject reasons covering every category.
pub const EXAMPLE_REASONS: &[&str] = &[
    "Registration certificate does not match",
    "License plate number in vehicle front photo is different",
    "Vehicle photo is not the same vehicle",
    "Photocopy of registration",
    "Photo of ID Card is blurry",
    "Registration certificate and ID Card do not match",
    "Vehicle photo and registration certificate mismatch",
];

/// A rendered category badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub category: Category,
    pub label: String,
    pub state: BadgeState,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.state)
    }
}

/// Render one badge per category, in category order.
pub fn render_badges(analysis: &Classification) -> Vec<Badge> {
    Category::ALL
        .into_iter()
        .map(|category| Badge {
            category,
            label: category.label().to_string(),
            state: BadgeState::from(analysis.get(category)),
        })
        .collect()
}

/// Split pasted text into reasons: one per line, trimmed, blanks dropped.
pub fn split_reasons(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Result for one reason line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub reason: String,
    pub analysis: Classification,
}

/// Per-reason results keyed by the literal reason text.
///
/// Inserting a reason that is already present replaces its result but keeps
/// its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReasonReport {
    results: Vec<ReportEntry>,
    index: HashMap<String, usize>,
}

impl ReasonReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reason: impl Into<String>, analysis: Classification) {
        let reason = reason.into();
        match self.index.get(&reason).copied() {
            Some(position) => {
                tracing::debug!(reason = %reason, "Duplicate reason, keeping latest result");
                self.results[position].analysis = analysis;
            }
            None => {
                self.index.insert(reason.clone(), self.results.len());
                self.results.push(ReportEntry { reason, analysis });
            }
        }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.results
    }

    pub fn get(&self, reason: &str) -> Option<&Classification> {
        self.index
            .get(reason)
            .map(|&position| &self.results[position].analysis)
    }

    /// Whether any reason implicates each category.
    ///
    /// Folded from the current entries, so an overwritten result can clear a
    /// flag.
    pub fn conclusion(&self) -> Classification {
        self.results.iter().map(|e| e.analysis).collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl Serialize for ReasonReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            results: &'a [ReportEntry],
            conclusion: Classification,
        }

        Wire {
            results: &self.results,
            conclusion: self.conclusion(),
        }
        .serialize(serializer)
    }
}

/// Classify every non-blank line of `text`.
pub fn analyze_text(classifier: &Classifier<'_>, text: &str) -> ReasonReport {
    let mut report = ReasonReport::new();
    for reason in split_reasons(text) {
        report.insert(reason, classifier.classify(reason));
    }
    tracing::debug!(reasons = report.len(), "Analyzed reject reasons");
    report
}

/// Render a report as plain text.
pub fn render_report(report: &ReasonReport) -> String {
    if report.is_empty() {
        return "No reject reasons to analyze.".to_string();
    }

    let mut out = String::new();
    for entry in report.entries() {
        out.push_str(&entry.reason);
        out.push('\n');
        for badge in render_badges(&entry.analysis) {
            out.push_str(&format!("  [{}]\n", badge));
        }
    }

    out.push_str("\nConclusion: ");
    out.push_str(&summarize(&report.conclusion()));
    out.push('\n');
    out
}

/// One-line summary of which documents need an update.
pub fn summarize(analysis: &Classification) -> String {
    let labels: Vec<_> = analysis.implicated().map(|c| c.label()).collect();
    if labels.is_empty() {
        "No documents need an update.".to_string()
    } else {
        format!("Needs update: {}", labels.join(", "))
    }
}
