//! Confidence estimation and the three-tier presentation band.
//!
//! A score is attached to one graph snapshot and only gates presentation
//! (how strongly the preview invites the user to review or edit). It is never
//! stored on elements or connections.

#[cfg(test)]
#[path = "confidence_test.rs"]
mod confidence_test;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{CONFIDENCE_HIGH, CONFIDENCE_MEDIUM, VISION_CONFIDENCE};
use crate::model::{Category, SceneGraph};

/// A scalar in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    /// Clamp into `[0, 1]`; NaN becomes zero.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() { Self(0.0) } else { Self(value.clamp(0.0, 1.0)) }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Rounded percentage for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }

    #[must_use]
    pub fn band(self) -> ConfidenceBand {
        if self.0 >= CONFIDENCE_HIGH {
            ConfidenceBand::High
        } else if self.0 >= CONFIDENCE_MEDIUM {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Presentation tier chosen from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Where the description (and possibly its score) came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfidenceSource {
    /// A collaborator already produced a score.
    Supplied(f64),
    /// Elements came through an image-analysis channel with no score of its own.
    Vision,
    /// Typed or extracted text.
    Text,
}

/// Estimate a score for `graph`.
///
/// `Supplied` is clamped, `Vision` samples the high band, and `Text` is a
/// pure function of how many catalog elements the graph holds.
pub fn estimate<R: Rng + ?Sized>(graph: &SceneGraph, source: ConfidenceSource, rng: &mut R) -> ConfidenceScore {
    match source {
        ConfidenceSource::Supplied(value) => ConfidenceScore::new(value),
        ConfidenceSource::Vision => ConfidenceScore::new(rng.random_range(VISION_CONFIDENCE.0..=VISION_CONFIDENCE.1)),
        ConfidenceSource::Text => text_confidence(graph),
    }
}

/// 0 for an empty graph, else `0.5 + 0.1` per detected element, capped at 1.
#[must_use]
pub fn text_confidence(graph: &SceneGraph) -> ConfidenceScore {
    let detected = graph
        .elements
        .iter()
        .filter(|e| e.category != Category::Custom)
        .count();
    if detected == 0 {
        return ConfidenceScore::new(0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let score = 0.5 + 0.1 * detected as f64;
    ConfidenceScore::new(score)
}
