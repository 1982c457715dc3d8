//! Preview/edit controller: review and adjust a graph before it is rendered.
//!
//! DESIGN
//! ======
//! The controller keeps the interpreter's output as a pristine snapshot and a
//! separate working copy. Edits only ever touch the working copy, through the
//! graph's own invariant-preserving mutators, so the working copy is
//! consistent after every call. `commit` hands the working copy over as the
//! new canonical graph and leaves edit mode; `cancel_edit` throws edits away.
//!
//! Invalid edits (blank or duplicate names, out-of-range indices) are no-ops
//! that report `false`; nothing here returns an error or panics.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use rand::Rng;
use tracing::debug;

use crate::confidence::ConfidenceScore;
use crate::consts::{MANUAL_CLASSIFICATION, MANUAL_ELEMENT_COLOR};
use crate::interpret::random_position;
use crate::model::{Category, Icon, SceneElement, SceneGraph};

/// Working copy of a graph awaiting approval.
#[derive(Debug, Clone)]
pub struct PreviewEditor {
    snapshot: SceneGraph,
    working: SceneGraph,
    confidence: ConfidenceScore,
    editing: bool,
}

impl PreviewEditor {
    #[must_use]
    pub fn new(graph: SceneGraph, confidence: ConfidenceScore) -> Self {
        Self { working: graph.clone(), snapshot: graph, confidence, editing: false }
    }

    /// The graph as it currently stands, edits included.
    #[must_use]
    pub fn graph(&self) -> &SceneGraph {
        &self.working
    }

    /// The graph as the interpreter returned it.
    #[must_use]
    pub fn snapshot(&self) -> &SceneGraph {
        &self.snapshot
    }

    #[must_use]
    pub fn confidence(&self) -> ConfidenceScore {
        self.confidence
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Whether the working copy differs from the snapshot.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.working != self.snapshot
    }

    pub fn begin_edit(&mut self) {
        self.editing = true;
    }

    /// Discard edits and leave edit mode.
    pub fn cancel_edit(&mut self) {
        self.working = self.snapshot.clone();
        self.editing = false;
    }

    /// Append a hand-made element at a random position.
    ///
    /// Returns `false` without touching the graph when `name` is blank or
    /// already used. A blank `classification` gets the default label.
    pub fn add_element<R: Rng + ?Sized>(&mut self, name: &str, classification: &str, rng: &mut R) -> bool {
        let name = name.trim();
        if name.is_empty() {
            debug!("preview: ignoring element with empty name");
            return false;
        }
        let classification = match classification.trim() {
            "" => MANUAL_CLASSIFICATION,
            given => given,
        };
        let element = SceneElement {
            name: name.to_owned(),
            category: Category::Custom,
            color: MANUAL_ELEMENT_COLOR.to_owned(),
            position: random_position(rng),
            tooltip: format!("{name} manually added"),
            classification: classification.to_owned(),
            icon: Icon::Marker,
        };
        let added = self.working.push_element(element);
        if added {
            debug!(%name, elements = self.working.elements.len(), "preview: element added");
        } else {
            debug!(%name, "preview: ignoring duplicate element name");
        }
        added
    }

    /// Remove the element at `index` and every connection touching it.
    /// Returns `false` when the index is out of range.
    pub fn remove_element(&mut self, index: usize) -> bool {
        let before = self.working.connections.len();
        match self.working.remove_element(index) {
            Some(removed) => {
                debug!(
                    name = %removed.name,
                    dropped_connections = before - self.working.connections.len(),
                    "preview: element removed"
                );
                true
            }
            None => {
                debug!(index, len = self.working.elements.len(), "preview: ignoring out-of-range removal");
                false
            }
        }
    }

    /// Leave edit mode and return the working copy as the canonical graph.
    /// The snapshot is advanced to the committed graph.
    pub fn commit(&mut self) -> SceneGraph {
        self.editing = false;
        self.snapshot = self.working.clone();
        self.working.clone()
    }

    /// Accept the graph as it stands. Pending edits are kept if any exist.
    pub fn approve(&mut self) -> SceneGraph {
        self.commit()
    }
}
