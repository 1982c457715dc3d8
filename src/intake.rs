//! Intake adapters: turn what the input layer hands over into a description.
//!
//! File reading, OCR, and image classification happen outside this crate.
//! These helpers only shape the text those collaborators produce and pick
//! the confidence source that goes with each channel.

#[cfg(test)]
#[path = "intake_test.rs"]
mod intake_test;

use serde::{Deserialize, Serialize};

use crate::catalog::normalize;
use crate::confidence::ConfidenceSource;

/// Description used when OCR returned nothing for an image.
pub const IMAGE_FALLBACK_DESCRIPTION: &str = "Visual analysis of the image identified elements in the scene.";

const SUMMARY_PENDING: &str = "Analysis in progress - elements will be mapped in the visualization";

/// Keyword groups behind the document summary line.
const SUMMARY_HINTS: [(&[&str], &str); 4] = [
    (&["corpo", "vítima", "body", "victim"], "Victim identified"),
    (&["arma", "disparo", "weapon", "gun", "shot"], "Firearm present"),
    (&["sangue", "mancha", "blood", "stain"], "Blood traces"),
    (&["porta", "janela", "door", "window"], "Access points"),
];

/// Where a description came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Intake {
    /// Typed straight into the form.
    Typed { text: String },
    /// Raw text extracted from an uploaded document.
    Document { text: String },
    /// OCR text plus classifier labels for an uploaded image.
    Image {
        ocr_text: String,
        labels: Vec<String>,
        /// Classifier confidence, when the collaborator reported one.
        confidence: Option<f64>,
    },
}

impl Intake {
    #[must_use]
    pub fn typed(text: impl Into<String>) -> Self {
        Self::Typed { text: text.into() }
    }

    /// The description to interpret and the matching confidence source.
    #[must_use]
    pub fn resolve(self) -> (String, ConfidenceSource) {
        match self {
            Self::Typed { text } => (text, ConfidenceSource::Text),
            Self::Document { text } => (clean_document_text(&text), ConfidenceSource::Text),
            Self::Image { ocr_text, labels, confidence } => {
                let source = confidence.map_or(ConfidenceSource::Vision, ConfidenceSource::Supplied);
                (compose_image_description(&ocr_text, &labels), source)
            }
        }
    }
}

/// Strip leading junk before the first word and collapse whitespace runs.
#[must_use]
pub fn clean_document_text(raw: &str) -> String {
    let body = raw.trim_start_matches(|c: char| !c.is_alphanumeric());
    body.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// OCR text (or a fallback sentence) followed by the detected labels.
#[must_use]
pub fn compose_image_description(ocr_text: &str, labels: &[String]) -> String {
    let base = match ocr_text.trim() {
        "" => IMAGE_FALLBACK_DESCRIPTION,
        text => text,
    };
    let labels: Vec<&str> = labels.iter().map(|l| l.as_str().trim()).filter(|l| !l.is_empty()).collect();
    if labels.is_empty() {
        base.to_owned()
    } else {
        format!("{base} Detected elements: {}.", labels.join(", "))
    }
}

/// One-line summary shown next to an uploaded document.
#[must_use]
pub fn summarize_document(text: &str) -> String {
    let normalized = normalize(text);
    let found: Vec<&str> = SUMMARY_HINTS
        .iter()
        .filter(|(words, _)| words.iter().any(|w| normalized.contains(w)))
        .map(|(_, label)| *label)
        .collect();
    if found.is_empty() {
        SUMMARY_PENDING.to_owned()
    } else {
        format!("Elements identified: {}", found.join(", "))
    }
}
