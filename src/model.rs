//! Scene model: elements, connections, and the graph that owns them.
//!
//! This module defines the data the interpreter produces and the renderer
//! consumes (`SceneGraph`, `SceneElement`, `SceneConnection`), along with the
//! closed set of element categories and their render hints.
//!
//! Element names are the join key for connections, so the graph keeps two
//! invariants: names are unique, and every connection endpoint names an
//! element that exists. The mutators here (`push_element`, `remove_element`)
//! preserve both; `validate` reports any violation in graphs that arrive
//! from elsewhere.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// The kind of a scene element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// A body or victim.
    Body,
    /// Firearm, blade, or other weapon.
    Weapon,
    /// Blood stains, pools, or trails.
    Blood,
    /// Footprints and tracks.
    Footprint,
    /// Doors, windows, and other ways in or out.
    AccessPoint,
    /// Tables, chairs, sofas.
    Furniture,
    /// A named room.
    Room,
    /// Anything added by hand.
    Custom,
}

impl Category {
    /// Every category, in catalog order with `Custom` last.
    pub const ALL: [Self; 8] = [
        Self::Body,
        Self::Weapon,
        Self::Blood,
        Self::Footprint,
        Self::AccessPoint,
        Self::Furniture,
        Self::Room,
        Self::Custom,
    ];

    /// Capitalized display name, also used as the element name on detection.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Body => "Body",
            Self::Weapon => "Weapon",
            Self::Blood => "Blood",
            Self::Footprint => "Footprint",
            Self::AccessPoint => "Access point",
            Self::Furniture => "Furniture",
            Self::Room => "Room",
            Self::Custom => "Custom",
        }
    }

    /// Wire name (matches the serde representation).
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Weapon => "weapon",
            Self::Blood => "blood",
            Self::Footprint => "footprint",
            Self::AccessPoint => "access-point",
            Self::Furniture => "furniture",
            Self::Room => "room",
            Self::Custom => "custom",
        }
    }

    /// Parse a wire name. Unknown names return `None`.
    #[must_use]
    pub fn from_slug(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.slug() == raw)
    }

    /// Glyph drawn in the middle of the node.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Body => "👤",
            Self::Weapon => "🔫",
            Self::Blood => "🩸",
            Self::Footprint => "👣",
            Self::AccessPoint => "🚪",
            Self::Furniture => "🪑",
            Self::Room => "🏠",
            Self::Custom => "📍",
        }
    }

    /// Node radius in scene units.
    #[must_use]
    pub fn radius(self) -> f64 {
        match self {
            Self::Body => 20.0,
            Self::Weapon | Self::Furniture | Self::Custom => 16.0,
            Self::Blood => 14.0,
            Self::Footprint => 12.0,
            Self::AccessPoint => 18.0,
            Self::Room => 22.0,
        }
    }
}

/// Icon tag handed to the renderer's icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    User,
    Zap,
    Droplet,
    Footprints,
    Door,
    Box,
    Home,
    Marker,
}

/// A point on the scene canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether the point lies on the reference canvas.
    #[must_use]
    pub fn in_canvas(self) -> bool {
        (0.0..=CANVAS_WIDTH).contains(&self.x) && (0.0..=CANVAS_HEIGHT).contains(&self.y)
    }

    /// Coordinates rounded to whole units, as shown in reports.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rounded(self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

/// A typed, positioned entity in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    /// Unique within its graph; connections refer to elements by name.
    pub name: String,
    pub category: Category,
    /// CSS colour string.
    pub color: String,
    pub position: Position,
    pub tooltip: String,
    /// Free-text label such as "primary evidence".
    pub classification: String,
    pub icon: Icon,
}

/// A directed, described relation between two named elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConnection {
    pub from: String,
    pub to: String,
    pub color: String,
    pub description: String,
}

impl SceneConnection {
    /// Whether either endpoint is `name`.
    #[must_use]
    pub fn touches(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }
}

/// The structured result of one interpretation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneGraph {
    /// Insertion order is detection order.
    pub elements: Vec<SceneElement>,
    pub connections: Vec<SceneConnection>,
    pub narrative: String,
    pub title: String,
}

/// A consistency violation found by [`SceneGraph::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// Two or more elements share this name.
    DuplicateName(String),
    /// Connection at this index names an endpoint that doesn't exist.
    DanglingConnection { index: usize, missing: String },
}

impl SceneGraph {
    /// True when no elements were detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up an element by name.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Whether an element with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.element(name).is_some()
    }

    /// Position of the named element, if present.
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<Position> {
        self.element(name).map(|e| e.position)
    }

    /// Append an element. Returns `false` (and leaves the graph untouched)
    /// when the name is already taken.
    pub fn push_element(&mut self, element: SceneElement) -> bool {
        if self.contains(&element.name) {
            return false;
        }
        self.elements.push(element);
        true
    }

    /// Remove the element at `index` along with every connection that
    /// references it. Out-of-range indices return `None`.
    pub fn remove_element(&mut self, index: usize) -> Option<SceneElement> {
        if index >= self.elements.len() {
            return None;
        }
        let removed = self.elements.remove(index);
        self.connections.retain(|c| !c.touches(&removed.name));
        Some(removed)
    }

    /// Report duplicate names and dangling connections.
    #[must_use]
    pub fn validate(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for e in &self.elements {
            if !seen.insert(e.name.as_str()) && reported.insert(e.name.as_str()) {
                issues.push(GraphIssue::DuplicateName(e.name.clone()));
            }
        }
        for (index, c) in self.connections.iter().enumerate() {
            for end in [&c.from, &c.to] {
                if !seen.contains(end.as_str()) {
                    issues.push(GraphIssue::DanglingConnection { index, missing: end.clone() });
                }
            }
        }
        issues
    }

    /// True when `validate` finds nothing.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.validate().is_empty()
    }
}
