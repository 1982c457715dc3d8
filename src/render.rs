//! Render state machine: animation phase, hover, selection, and filters.
//!
//! The machine owns the canonical graph once it is committed and derives a
//! [`SceneView`] from it on demand. Rendering never mutates the graph; only
//! the derived visibility and emphasis flags change.
//!
//! Phases run `Idle → Appearing → Connected → Interactive`. Submitting a graph
//! resets to `Idle`, bumps the generation, enters `Appearing`, and hands back a
//! [`PhaseTimer`] for the driver to schedule. When the timer fires the driver
//! calls [`RenderMachine::advance`]; a timer from an older generation is
//! ignored, so a superseded graph can never move the current one forward.
//!
//! Hover, selection, and filters are orthogonal to the phase and live from
//! `Appearing` onwards.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::consts::{APPEAR_DELAY_MS, APPEAR_STAGGER_MS, CONNECT_DELAY_MS, HOVER_SCALE};
use crate::model::{Category, Position, SceneGraph};

/// Animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No graph.
    #[default]
    Idle,
    /// Elements scaling in; connections hidden.
    Appearing,
    /// Connections unlocked.
    Connected,
    /// Steady state.
    Interactive,
}

/// Which categories are rendered.
///
/// An empty active set is deliberately not representable as "all" or
/// "nothing": callers pick one explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Only these categories.
    Only(BTreeSet<Category>),
    /// Hide every element.
    Nothing,
}

impl CategoryFilter {
    /// Apply the filter-panel convention: no active categories means show all.
    #[must_use]
    pub fn from_categories<I: IntoIterator<Item = Category>>(categories: I) -> Self {
        let set: BTreeSet<Category> = categories.into_iter().collect();
        if set.is_empty() { Self::All } else { Self::Only(set) }
    }

    #[must_use]
    pub fn passes(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(&category),
            Self::Nothing => false,
        }
    }

    /// Flip one category the way a filter-panel button does. Turning off the
    /// last active category falls back to `All`.
    #[must_use]
    pub fn toggled(&self, category: Category) -> Self {
        match self {
            Self::All | Self::Nothing => Self::Only(BTreeSet::from([category])),
            Self::Only(set) => {
                let mut set = set.clone();
                if !set.remove(&category) {
                    set.insert(category);
                }
                Self::from_categories(set)
            }
        }
    }
}

/// Delays that drive the phase sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTimings {
    /// Offset before the first element starts appearing.
    pub appear: Duration,
    /// Time spent in `Appearing` before connections are drawn.
    pub connect: Duration,
    /// Per-element stagger within `Appearing`.
    pub stagger: Duration,
}

impl Default for RenderTimings {
    fn default() -> Self {
        Self {
            appear: Duration::from_millis(APPEAR_DELAY_MS),
            connect: Duration::from_millis(CONNECT_DELAY_MS),
            stagger: Duration::from_millis(APPEAR_STAGGER_MS),
        }
    }
}

/// A phase advance the driver must schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimer {
    /// Graph generation this timer belongs to.
    pub generation: u64,
    pub delay: Duration,
    /// Phase the machine enters when the timer fires.
    pub target: Phase,
}

/// Derived render state for one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementView {
    pub name: String,
    pub category: Category,
    pub color: String,
    pub position: Position,
    pub tooltip: String,
    pub glyph: &'static str,
    pub radius: f64,
    pub visible: bool,
    pub hovered: bool,
    pub selected: bool,
    /// 0 before appearing, [`HOVER_SCALE`] while hovered, 1 otherwise.
    pub scale: f64,
    pub glow: bool,
    /// When this element's appear animation starts, relative to commit.
    pub appear_delay_ms: u64,
}

/// Derived render state for one connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionView {
    pub from: String,
    pub to: String,
    pub color: String,
    pub description: String,
    /// `None` when the endpoint is missing from the graph.
    pub from_position: Option<Position>,
    pub to_position: Option<Position>,
    pub visible: bool,
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub name: String,
    pub color: String,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    pub phase: Phase,
    pub generation: u64,
    pub title: String,
    pub elements: Vec<ElementView>,
    pub connections: Vec<ConnectionView>,
    pub legend: Vec<LegendEntry>,
    pub element_count: usize,
    pub connection_count: usize,
}

impl SceneView {
    /// The visible elements, in graph order.
    pub fn visible_elements(&self) -> impl Iterator<Item = &ElementView> {
        self.elements.iter().filter(|e| e.visible)
    }

    /// The visible connections, in graph order.
    pub fn visible_connections(&self) -> impl Iterator<Item = &ConnectionView> {
        self.connections.iter().filter(|c| c.visible)
    }
}

/// The render state machine.
#[derive(Debug, Clone, Default)]
pub struct RenderMachine {
    graph: Option<SceneGraph>,
    phase: Phase,
    generation: u64,
    hovered: Option<String>,
    selected: Option<String>,
    filter: CategoryFilter,
    timings: RenderTimings,
}

impl RenderMachine {
    #[must_use]
    pub fn new(timings: RenderTimings) -> Self {
        Self { timings, ..Self::default() }
    }

    // --- Queries ---

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn graph(&self) -> Option<&SceneGraph> {
        self.graph.as_ref()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    #[must_use]
    pub fn timings(&self) -> RenderTimings {
        self.timings
    }

    // --- Lifecycle ---

    /// Make `graph` canonical and restart the phase sequence.
    ///
    /// Any timer handed out before this call is now stale.
    pub fn submit(&mut self, graph: SceneGraph) -> PhaseTimer {
        self.reset();
        debug!(
            generation = self.generation,
            elements = graph.elements.len(),
            connections = graph.connections.len(),
            "render: graph submitted"
        );
        self.graph = Some(graph);
        self.phase = Phase::Appearing;
        PhaseTimer { generation: self.generation, delay: self.timings.connect, target: Phase::Connected }
    }

    /// Apply a fired timer. Returns the phases entered, in order; empty when
    /// the timer is stale or the machine is not waiting on it.
    pub fn advance(&mut self, timer: PhaseTimer) -> Vec<Phase> {
        if timer.generation != self.generation {
            debug!(timer = timer.generation, current = self.generation, "render: ignoring stale phase timer");
            return Vec::new();
        }
        if self.phase != Phase::Appearing || timer.target != Phase::Connected {
            debug!(phase = ?self.phase, target = ?timer.target, "render: ignoring unexpected phase timer");
            return Vec::new();
        }
        // Connected hands over to Interactive with no delay.
        self.phase = Phase::Interactive;
        debug!(generation = self.generation, "render: connections unlocked");
        vec![Phase::Connected, Phase::Interactive]
    }

    /// Drop the graph and invalidate outstanding timers.
    pub fn unmount(&mut self) {
        self.reset();
        debug!(generation = self.generation, "render: unmounted");
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.graph = None;
        self.hovered = None;
        self.selected = None;
    }

    // --- Interaction ---

    /// Set or clear the emphasized element. Returns `false` when ignored
    /// (no graph, or the name isn't shown under the current filter).
    pub fn hover(&mut self, name: Option<&str>) -> bool {
        if self.phase == Phase::Idle {
            return false;
        }
        match name {
            None => {
                self.hovered = None;
                true
            }
            Some(name) if self.is_shown(name) => {
                self.hovered = Some(name.to_owned());
                true
            }
            Some(_) => false,
        }
    }

    /// Toggle selection of `name`; selecting the selected element clears it.
    /// Elements hidden by the filter can't be selected. Returns the selection
    /// afterwards.
    pub fn select(&mut self, name: &str) -> Option<&str> {
        if self.phase != Phase::Idle && self.is_shown(name) {
            if self.selected.as_deref() == Some(name) {
                self.selected = None;
            } else {
                self.selected = Some(name.to_owned());
            }
        }
        self.selected.as_deref()
    }

    /// Replace the active filter. Filters survive graph changes. Hover and
    /// selection on elements the new filter hides are cleared.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        debug!(?filter, "render: filter changed");
        self.filter = filter;
        if self.hovered.as_deref().is_some_and(|name| !self.is_shown(name)) {
            self.hovered = None;
        }
        if self.selected.as_deref().is_some_and(|name| !self.is_shown(name)) {
            self.selected = None;
        }
    }

    fn is_shown(&self, name: &str) -> bool {
        self.graph
            .as_ref()
            .and_then(|g| g.element(name))
            .is_some_and(|e| self.filter.passes(e.category))
    }

    // --- Derived view ---

    /// Compute the frame for the current state.
    #[must_use]
    pub fn view(&self) -> SceneView {
        let Some(graph) = &self.graph else {
            return SceneView {
                phase: self.phase,
                generation: self.generation,
                title: String::new(),
                elements: Vec::new(),
                connections: Vec::new(),
                legend: Vec::new(),
                element_count: 0,
                connection_count: 0,
            };
        };

        let appeared = self.phase >= Phase::Appearing;
        let stagger_ms = duration_ms(self.timings.stagger);
        let appear_ms = duration_ms(self.timings.appear);

        let elements: Vec<ElementView> = graph
            .elements
            .iter()
            .zip(0u64..)
            .map(|(e, index)| {
                let hovered = self.hovered.as_deref() == Some(e.name.as_str());
                let scale = match (appeared, hovered) {
                    (false, _) => 0.0,
                    (true, true) => HOVER_SCALE,
                    (true, false) => 1.0,
                };
                ElementView {
                    name: e.name.clone(),
                    category: e.category,
                    color: e.color.clone(),
                    position: e.position,
                    tooltip: e.tooltip.clone(),
                    glyph: e.category.glyph(),
                    radius: e.category.radius(),
                    visible: self.filter.passes(e.category),
                    hovered,
                    selected: self.selected.as_deref() == Some(e.name.as_str()),
                    scale,
                    glow: hovered,
                    appear_delay_ms: appear_ms.saturating_add(index.saturating_mul(stagger_ms)),
                }
            })
            .collect();

        let connected = self.phase >= Phase::Connected;
        let connections = graph
            .connections
            .iter()
            .map(|c| {
                let endpoint = |name: &str| elements.iter().find(|e| e.name == name);
                let (from, to) = (endpoint(&c.from), endpoint(&c.to));
                let visible = connected && from.is_some_and(|e| e.visible) && to.is_some_and(|e| e.visible);
                ConnectionView {
                    from: c.from.clone(),
                    to: c.to.clone(),
                    color: c.color.clone(),
                    description: c.description.clone(),
                    from_position: from.map(|e| e.position),
                    to_position: to.map(|e| e.position),
                    visible,
                }
            })
            .collect();

        let legend = graph
            .elements
            .iter()
            .map(|e| LegendEntry { name: e.name.clone(), color: e.color.clone() })
            .collect();

        SceneView {
            phase: self.phase,
            generation: self.generation,
            title: graph.title.clone(),
            elements,
            connections,
            legend,
            element_count: graph.elements.len(),
            connection_count: graph.connections.len(),
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
