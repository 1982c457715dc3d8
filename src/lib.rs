//! Scene interpretation and interactive rendering for forensic descriptions.
//!
//! A free-form description goes through the rule-based interpreter and comes
//! out as a [`model::SceneGraph`]: typed, positioned elements, the relations
//! between them, a narrative, and a title. The graph can be reviewed and
//! edited in a preview before it is committed to the render state machine,
//! which animates it in and tracks hover, selection, and category filters.
//! Drawing, narration, PDF layout, and file/OCR intake stay with the host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Ordered detection rules (synonyms → category, colour, icon) |
//! | [`interpret`] | Description → `SceneGraph`, with injected randomness |
//! | [`model`] | Elements, connections, graphs, and their invariants |
//! | [`confidence`] | Confidence score and the three presentation bands |
//! | [`preview`] | Snapshot plus working copy for review and edits |
//! | [`render`] | Phase machine, hover/select/filter, derived per-frame view |
//! | [`session`] | Single-task event loop wiring everything to timers |
//! | [`intake`] | Shaping typed, document, and image-derived text |
//! | [`report`] | Plain-text body for the PDF exporter |
//! | [`config`] | Environment-driven settings |
//! | [`error`] | Grepable error codes |
//! | [`consts`] | Canvas extent, delays, colours, thresholds |

pub mod catalog;
pub mod confidence;
pub mod config;
pub mod consts;
pub mod error;
pub mod intake;
pub mod interpret;
pub mod model;
pub mod preview;
pub mod render;
pub mod report;
pub mod session;

#[cfg(test)]
mod test_support;
