//! Scene interpreter: free-form description → `SceneGraph`.
//!
//! DESIGN
//! ======
//! Detection is a declarative substring match against the pattern catalog;
//! each matching rule yields exactly one element, in catalog order. Adjacent
//! elements are linked by a coin flip, a placeholder for real spatial
//! reasoning. All randomness (positions and coin flips) comes from the
//! caller's `Rng`, so a seeded generator makes the output reproducible.
//!
//! ERROR HANDLING
//! ==============
//! Empty or whitespace-only text is rejected with `EmptyInput`. Text that
//! matches nothing is not an error: it yields an element-less graph with the
//! inconclusive title and narrative.

#[cfg(test)]
#[path = "interpret_test.rs"]
mod interpret_test;

use rand::Rng;
use tracing::debug;

use crate::catalog::{Catalog, PatternRule};
use crate::consts::{CONNECTION_COLOR, CONNECTION_PROBABILITY, SPAWN_X, SPAWN_Y};
use crate::error::ErrorCode;
use crate::model::{Position, SceneConnection, SceneElement, SceneGraph};

/// Title of a graph with at least one element.
pub const TITLE_ANALYZED: &str = "Crime Scene Analyzed";

/// Title of a graph with no elements.
pub const TITLE_INCONCLUSIVE: &str = "Inconclusive Analysis";

/// Narrative of a graph with no elements.
pub const NARRATIVE_INCONCLUSIVE: &str =
    "Insufficient description for forensic analysis. Please provide more details about the scene.";

const NARRATIVE_CLOSING: &str = "The evidence suggests an investigative pattern that requires detailed analysis.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpretError {
    #[error("scene description is empty")]
    EmptyInput,
}

impl ErrorCode for InterpretError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "E_EMPTY_INPUT",
        }
    }
}

/// Rule-based interpreter bound to one catalog.
#[derive(Debug, Clone)]
pub struct Interpreter {
    catalog: Catalog,
    connection_probability: f64,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Catalog::standard())
    }
}

impl Interpreter {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog, connection_probability: CONNECTION_PROBABILITY }
    }

    /// Override the adjacent-pair connection chance. Clamped to `[0, 1]`;
    /// NaN falls back to the default.
    #[must_use]
    pub fn with_connection_probability(mut self, probability: f64) -> Self {
        self.connection_probability = if probability.is_nan() {
            CONNECTION_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn connection_probability(&self) -> f64 {
        self.connection_probability
    }

    /// Interpret a description into a fresh scene graph.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError::EmptyInput`] when `text` is empty or only whitespace.
    pub fn interpret<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<SceneGraph, InterpretError> {
        if text.trim().is_empty() {
            return Err(InterpretError::EmptyInput);
        }

        let elements: Vec<SceneElement> = self
            .catalog
            .detect(text)
            .into_iter()
            .map(|rule| detected_element(rule, random_position(rng)))
            .collect();

        let connections = self.infer_connections(&elements, rng);

        let graph = if elements.is_empty() {
            SceneGraph {
                elements,
                connections,
                narrative: NARRATIVE_INCONCLUSIVE.to_owned(),
                title: TITLE_INCONCLUSIVE.to_owned(),
            }
        } else {
            let narrative = narrative_for(&elements);
            SceneGraph { elements, connections, narrative, title: TITLE_ANALYZED.to_owned() }
        };

        debug!(
            text_len = text.len(),
            elements = graph.elements.len(),
            connections = graph.connections.len(),
            "interpreted scene description"
        );
        Ok(graph)
    }

    /// Flip one coin per adjacent pair, in emission order.
    fn infer_connections<R: Rng + ?Sized>(&self, elements: &[SceneElement], rng: &mut R) -> Vec<SceneConnection> {
        elements
            .windows(2)
            .filter_map(|pair| {
                if rng.random_bool(self.connection_probability) {
                    Some(spatial_relation(&pair[0], &pair[1]))
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Uniform random position inside the spawn area.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R) -> Position {
    Position::new(rng.random_range(SPAWN_X.0..=SPAWN_X.1), rng.random_range(SPAWN_Y.0..=SPAWN_Y.1))
}

/// Forensic narrative for a non-empty element list.
#[must_use]
pub fn narrative_for(elements: &[SceneElement]) -> String {
    let sentences = elements
        .iter()
        .map(|e| format!("{} located in a strategic position", e.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Forensic analysis identified {} key elements in the scene. {sentences}. {NARRATIVE_CLOSING}",
        elements.len()
    )
}

fn detected_element(rule: &PatternRule, position: Position) -> SceneElement {
    let name = rule.category.label().to_owned();
    SceneElement {
        tooltip: format!("{name} found at the scene"),
        name,
        category: rule.category,
        color: rule.color.to_owned(),
        position,
        classification: rule.classification.to_owned(),
        icon: rule.icon,
    }
}

fn spatial_relation(a: &SceneElement, b: &SceneElement) -> SceneConnection {
    SceneConnection {
        from: a.name.clone(),
        to: b.name.clone(),
        color: CONNECTION_COLOR.to_owned(),
        description: format!("spatial relation between {} and {}", a.name, b.name),
    }
}
