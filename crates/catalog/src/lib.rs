//! Reference phrase catalog.
//!
//! Holds the ordered match phrases for each [`Category`]. The built-in
//! catalog is constructed once per process and never mutated; alternative
//! catalogs can be loaded from JSON files for tuning.

use shinra_model::Category;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No phrases for category: {0}")]
    EmptyCategory(Category),
    #[error("Blank phrase in category: {0}")]
    EmptyPhrase(Category),
}

const REGISTRATION_PHRASES: &[&str] = &[
    "registration certificate not valid",
    "invalid registration document",
    "photo of registration document",
    "edited registration document",
    "scan of registration document",
    "mismatched registration data",
];

const VEHICLE_PHRASES: &[&str] = &[
    "vehicle photo not valid",
    "vehicle does not match",
    "front view vehicle photo",
    "side view vehicle photo",
    "license plate number mismatch",
    "vehicle color mismatch",
    "vehicle wheel count mismatch",
    "vehicle photo already registered",
    "different vehicle photo",
];

const ID_CARD_PHRASES: &[&str] = &[
    "id card not valid",
    "photo of id card",
    "id card does not match",
    "id card expired",
    "id card scan not clear",
    "id card already used",
];

/// Ordered reference phrases per category.
///
/// Phrases are stored lowercase. Order only decides which phrase is reported
/// as the first hit; any single match implicates the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseCatalog {
    registration_doc: Vec<String>,
    vehicle_doc: Vec<String>,
    id_card_doc: Vec<String>,
}

impl PhraseCatalog {
    /// The built-in catalog, shared for the lifetime of the process.
    pub fn builtin() -> &'static PhraseCatalog {
        static BUILTIN: OnceLock<PhraseCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| Self {
            registration_doc: to_owned(REGISTRATION_PHRASES),
            vehicle_doc: to_owned(VEHICLE_PHRASES),
            id_card_doc: to_owned(ID_CARD_PHRASES),
        })
    }

    /// Build a catalog from explicit phrase lists.
    ///
    /// Phrases are trimmed and lowercased. Every category needs at least one
    /// non-blank phrase.
    pub fn new(
        registration_doc: Vec<String>,
        vehicle_doc: Vec<String>,
        id_card_doc: Vec<String>,
    ) -> Result<Self, CatalogError> {
        Self {
            registration_doc,
            vehicle_doc,
            id_card_doc,
        }
        .normalized()
    }

    /// Parse a catalog from JSON:
    /// `{"registrationDoc": [...], "vehicleDoc": [...], "idCardDoc": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: PhraseCatalog = serde_json::from_str(json)?;
        raw.normalized()
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), phrases = catalog.len(), "Loaded phrase catalog");
        Ok(catalog)
    }

    /// Phrases for a category, in evaluation order.
    pub fn phrases(&self, category: Category) -> &[String] {
        match category {
            Category::RegistrationDoc => &self.registration_doc,
            Category::VehicleDoc => &self.vehicle_doc,
            Category::IdCardDoc => &self.id_card_doc,
        }
    }

    /// Total number of phrases across all categories.
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.phrases(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn normalized(mut self) -> Result<Self, CatalogError> {
        for category in Category::ALL {
            let phrases = match category {
                Category::RegistrationDoc => &mut self.registration_doc,
                Category::VehicleDoc => &mut self.vehicle_doc,
                Category::IdCardDoc => &mut self.id_card_doc,
            };
            if phrases.is_empty() {
                return Err(CatalogError::EmptyCategory(category));
            }
            for phrase in phrases.iter_mut() {
                let cleaned = phrase.trim().to_lowercase();
                if cleaned.is_empty() {
                    return Err(CatalogError::EmptyPhrase(category));
                }
                *phrase = cleaned;
            }
        }
        Ok(self)
    }
}

impl Default for PhraseCatalog {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn to_owned(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}
