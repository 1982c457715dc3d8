//! Shared test doubles.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::model::{Category, Icon, Position, SceneConnection, SceneElement, SceneGraph};

/// Generator that returns the same word forever.
///
/// `ConstRng(0)` wins every coin flip and draws range minimums;
/// `ConstRng(u64::MAX)` loses every flip.
pub struct ConstRng(pub u64);

impl rand::RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        (self.0 >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for (i, b) in dst.iter_mut().enumerate() {
            *b = self.0.to_le_bytes()[i % 8];
        }
    }
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn element(name: &str, category: Category) -> SceneElement {
    SceneElement {
        name: name.to_owned(),
        category,
        color: "#123456".to_owned(),
        position: Position::new(150.0, 150.0),
        tooltip: format!("{name} tooltip"),
        classification: "test".to_owned(),
        icon: Icon::Marker,
    }
}

pub fn connection(from: &str, to: &str) -> SceneConnection {
    SceneConnection {
        from: from.to_owned(),
        to: to.to_owned(),
        color: "#ff4500".to_owned(),
        description: format!("spatial relation between {from} and {to}"),
    }
}

/// Body → Weapon → Blood chain with both links present.
pub fn sample_graph() -> SceneGraph {
    SceneGraph {
        elements: vec![
            element("Body", Category::Body),
            element("Weapon", Category::Weapon),
            element("Blood", Category::Blood),
        ],
        connections: vec![connection("Body", "Weapon"), connection("Weapon", "Blood")],
        narrative: "sample narrative".to_owned(),
        title: "Crime Scene Analyzed".to_owned(),
    }
}
