//! Shared numeric and display constants for the scene engine.

// ── Canvas ──────────────────────────────────────────────────────

/// Width of the reference canvas in scene units.
pub const CANVAS_WIDTH: f64 = 600.0;

/// Height of the reference canvas in scene units.
pub const CANVAS_HEIGHT: f64 = 400.0;

/// Inclusive x range for randomly placed elements.
pub const SPAWN_X: (f64, f64) = (100.0, 500.0);

/// Inclusive y range for randomly placed elements.
pub const SPAWN_Y: (f64, f64) = (100.0, 400.0);

// ── Interpretation ──────────────────────────────────────────────

/// Chance that two adjacent detected elements get a connection.
pub const CONNECTION_PROBABILITY: f64 = 0.5;

/// Colour used for every inferred connection.
pub const CONNECTION_COLOR: &str = "#ff4500";

/// Colour for elements added by hand in the preview editor.
pub const MANUAL_ELEMENT_COLOR: &str = "#6366f1";

/// Classification given to hand-added elements when the caller leaves it blank.
pub const MANUAL_CLASSIFICATION: &str = "complementary evidence";

// ── Timing ──────────────────────────────────────────────────────

/// Delay of each simulated processing stage, in milliseconds.
pub const STAGE_DELAY_MS: u64 = 500;

/// Delay between commit and the first element appearing.
pub const APPEAR_DELAY_MS: u64 = 100;

/// Delay between elements appearing and connections being drawn.
pub const CONNECT_DELAY_MS: u64 = 800;

/// Per-element stagger of the appear animation.
pub const APPEAR_STAGGER_MS: u64 = 100;

// ── Emphasis ────────────────────────────────────────────────────

/// Scale applied to the hovered element.
pub const HOVER_SCALE: f64 = 1.1;

// ── Confidence ──────────────────────────────────────────────────

/// Lower bound of the "high" confidence band.
pub const CONFIDENCE_HIGH: f64 = 0.8;

/// Lower bound of the "medium" confidence band.
pub const CONFIDENCE_MEDIUM: f64 = 0.6;

/// Range sampled for confidence reported by a vision channel.
pub const VISION_CONFIDENCE: (f64, f64) = (0.7, 1.0);
