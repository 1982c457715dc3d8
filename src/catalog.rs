//! Pattern catalog: the fixed detection rules behind interpretation.
//!
//! Each rule maps a set of lowercase synonyms to one element category and its
//! display attributes. Rule order is significant: the interpreter emits
//! elements in catalog order, never in the order terms appear in the text.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use crate::model::{Category, Icon};

/// One detection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRule {
    pub category: Category,
    /// Lowercase terms; any one of them occurring as a substring is a hit.
    pub synonyms: &'static [&'static str],
    pub color: &'static str,
    pub icon: Icon,
    /// Default classification label for detected elements.
    pub classification: &'static str,
}

impl PatternRule {
    /// Whether any synonym occurs in already-lowercased text.
    #[must_use]
    pub fn matches(&self, normalized: &str) -> bool {
        self.synonyms.iter().any(|s| normalized.contains(s))
    }
}

/// The standard rule set, Portuguese and English terms side by side.
pub const STANDARD_RULES: [PatternRule; 7] = [
    PatternRule {
        category: Category::Body,
        synonyms: &["corpo", "cadáver", "vítima", "morto", "body", "corpse", "victim", "deceased"],
        color: "#1e90ff",
        icon: Icon::User,
        classification: "primary evidence",
    },
    PatternRule {
        category: Category::Weapon,
        synonyms: &[
            "arma", "pistola", "revólver", "faca", "facão", "weapon", "gun", "pistol", "revolver", "knife",
        ],
        color: "#dc143c",
        icon: Icon::Zap,
        classification: "physical evidence",
    },
    PatternRule {
        category: Category::Blood,
        synonyms: &["sangue", "mancha", "poça", "blood", "stain", "puddle"],
        color: "#8b0000",
        icon: Icon::Droplet,
        classification: "biological trace",
    },
    PatternRule {
        category: Category::Footprint,
        synonyms: &["pegada", "pisada", "rastro", "footprint", "shoeprint", "track"],
        color: "#8b4513",
        icon: Icon::Footprints,
        classification: "trace evidence",
    },
    PatternRule {
        category: Category::AccessPoint,
        synonyms: &["porta", "janela", "entrada", "door", "window", "entrance"],
        color: "#4a5568",
        icon: Icon::Door,
        classification: "entry point",
    },
    PatternRule {
        category: Category::Furniture,
        synonyms: &["mesa", "cadeira", "sofá", "móvel", "table", "chair", "sofa", "couch"],
        color: "#2d3748",
        icon: Icon::Box,
        classification: "environment",
    },
    PatternRule {
        category: Category::Room,
        synonyms: &["cozinha", "banheiro", "quarto", "sala", "kitchen", "bathroom", "bedroom", "living room"],
        color: "#4a5568",
        icon: Icon::Home,
        classification: "location",
    },
];

/// An ordered set of detection rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    rules: Vec<PatternRule>,
}

impl Catalog {
    /// Build a catalog from rules in the order elements should be emitted.
    #[must_use]
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// The standard forensic rule set.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(STANDARD_RULES.to_vec())
    }

    #[must_use]
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Rule for a category, if the catalog has one.
    #[must_use]
    pub fn rule_for(&self, category: Category) -> Option<&PatternRule> {
        self.rules.iter().find(|r| r.category == category)
    }

    /// Rules whose synonyms occur in `text`, in catalog order.
    #[must_use]
    pub fn detect(&self, text: &str) -> Vec<&PatternRule> {
        let normalized = normalize(text);
        self.rules.iter().filter(|r| r.matches(&normalized)).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lowercase the input for matching.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}
