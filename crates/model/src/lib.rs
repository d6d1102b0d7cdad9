//! Core domain model for Shinra reject-reason analysis.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `Category`: The three document categories a reject reason can implicate
//! - `Classification`: Per-category "needs update" flags for one reason (or a batch)
//! - `BadgeState`: The two display states of a category badge

use serde::{Deserialize, Serialize};
use std::fmt;

/// A document category that a reject reason may implicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Vehicle registration certificate (STNK, permit)
    RegistrationDoc,
    /// Vehicle photos (front, side, plate, color)
    VehicleDoc,
    /// Owner identity card
    IdCardDoc,
}

impl Category {
    /// All categories, in catalog evaluation order.
    pub const ALL: [Category; 3] = [Self::RegistrationDoc, Self::VehicleDoc, Self::IdCardDoc];

    /// Wire key used in JSON output and catalog files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::RegistrationDoc => "registrationDoc",
            Self::VehicleDoc => "vehicleDoc",
            Self::IdCardDoc => "idCardDoc",
        }
    }

    /// Get a human-readable label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RegistrationDoc => "Registration Document",
            Self::VehicleDoc => "Vehicle Document",
            Self::IdCardDoc => "ID Card",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which categories a reject reason implicates.
///
/// Always carries all three flags. The same shape doubles as the aggregate
/// over a batch of reasons, where each flag is the OR of the per-reason flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub registration_doc: bool,
    pub vehicle_doc: bool,
    pub id_card_doc: bool,
}

impl Classification {
    /// The all-false result. Identity element of [`Classification::merge`].
    pub const fn none() -> Self {
        Self {
            registration_doc: false,
            vehicle_doc: false,
            id_card_doc: false,
        }
    }

    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::RegistrationDoc => self.registration_doc,
            Category::VehicleDoc => self.vehicle_doc,
            Category::IdCardDoc => self.id_card_doc,
        }
    }

    pub fn set(&mut self, category: Category, value: bool) {
        match category {
            Category::RegistrationDoc => self.registration_doc = value,
            Category::VehicleDoc => self.vehicle_doc = value,
            Category::IdCardDoc => self.id_card_doc = value,
        }
    }

    /// Per-category logical OR.
    pub fn merge(self, other: Self) -> Self {
        Self {
            registration_doc: self.registration_doc || other.registration_doc,
            vehicle_doc: self.vehicle_doc || other.vehicle_doc,
            id_card_doc: self.id_card_doc || other.id_card_doc,
        }
    }

    /// Categories flagged as needing an update, in category order.
    pub fn implicated(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| self.get(*c))
    }

    /// Whether any category is implicated.
    pub fn any(&self) -> bool {
        self.registration_doc || self.vehicle_doc || self.id_card_doc
    }
}

impl FromIterator<Classification> for Classification {
    fn from_iter<I: IntoIterator<Item = Classification>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::merge)
    }
}

/// Display state of a category badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeState {
    NeedsUpdate,
    Ok,
}

impl BadgeState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NeedsUpdate => "Needs Update",
            Self::Ok => "OK",
        }
    }
}

impl From<bool> for BadgeState {
    fn from(needs_update: bool) -> Self {
        if needs_update {
            Self::NeedsUpdate
        } else {
            Self::Ok
        }
    }
}

impl fmt::Display for BadgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
