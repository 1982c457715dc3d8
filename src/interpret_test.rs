use super::*;
use crate::model::{Category, Icon};
use crate::test_support::{ConstRng, seeded};

fn names(graph: &SceneGraph) -> Vec<&str> {
    graph.elements.iter().map(|e| e.name.as_str()).collect()
}

// =============================================================================
// DETECTION
// =============================================================================

#[test]
fn english_scene_yields_five_elements_in_catalog_order() {
    let interpreter = Interpreter::default();
    let graph = interpreter
        .interpret("Body found next to a sofa with blood leading to the kitchen; front door open", &mut seeded(7))
        .unwrap();

    assert_eq!(names(&graph), vec!["Body", "Blood", "Access point", "Furniture", "Room"]);
    let categories: Vec<Category> = graph.elements.iter().map(|e| e.category).collect();
    assert_eq!(categories, vec![
        Category::Body,
        Category::Blood,
        Category::AccessPoint,
        Category::Furniture,
        Category::Room,
    ]);
    assert_eq!(graph.title, TITLE_ANALYZED);
    for name in names(&graph) {
        assert!(graph.narrative.contains(name), "narrative missing {name}");
    }
}

#[test]
fn repeated_keywords_produce_one_element() {
    let graph = Interpreter::default()
        .interpret("blood by the door, blood on the window, blood everywhere", &mut seeded(1))
        .unwrap();
    assert_eq!(names(&graph), vec!["Blood", "Access point"]);
}

#[test]
fn detected_element_carries_rule_attributes() {
    let graph = Interpreter::default().interpret("a knife", &mut seeded(3)).unwrap();
    let weapon = &graph.elements[0];
    assert_eq!(weapon.name, "Weapon");
    assert_eq!(weapon.category, Category::Weapon);
    assert_eq!(weapon.color, "#dc143c");
    assert_eq!(weapon.icon, Icon::Zap);
    assert_eq!(weapon.tooltip, "Weapon found at the scene");
    assert_eq!(weapon.classification, "physical evidence");
}

// =============================================================================
// INCONCLUSIVE / INVALID
// =============================================================================

#[test]
fn unmatched_text_is_inconclusive() {
    let graph = Interpreter::default()
        .interpret("nothing to see here at all", &mut seeded(1))
        .unwrap();
    assert!(graph.elements.is_empty());
    assert!(graph.connections.is_empty());
    assert_eq!(graph.title, TITLE_INCONCLUSIVE);
    assert_eq!(graph.narrative, NARRATIVE_INCONCLUSIVE);
}

#[test]
fn empty_text_is_rejected() {
    let err = Interpreter::default().interpret("", &mut seeded(1)).unwrap_err();
    assert_eq!(err, InterpretError::EmptyInput);
    assert_eq!(err.error_code(), "E_EMPTY_INPUT");
}

#[test]
fn whitespace_text_is_rejected() {
    let result = Interpreter::default().interpret("  \n\t ", &mut seeded(1));
    assert_eq!(result, Err(InterpretError::EmptyInput));
}

// =============================================================================
// CONNECTIONS
// =============================================================================

const FULL_SCENE: &str = "victim, gun, blood, footprint, window, chair, bedroom";

#[test]
fn winning_every_flip_links_each_adjacent_pair() {
    let graph = Interpreter::default().interpret(FULL_SCENE, &mut ConstRng(0)).unwrap();
    assert_eq!(graph.elements.len(), 7);
    assert_eq!(graph.connections.len(), 6);
    for (i, c) in graph.connections.iter().enumerate() {
        assert_eq!(c.from, graph.elements[i].name);
        assert_eq!(c.to, graph.elements[i + 1].name);
        assert_eq!(c.color, "#ff4500");
        assert_eq!(c.description, format!("spatial relation between {} and {}", c.from, c.to));
    }
}

#[test]
fn losing_every_flip_links_nothing() {
    let graph = Interpreter::default().interpret(FULL_SCENE, &mut ConstRng(u64::MAX)).unwrap();
    assert_eq!(graph.elements.len(), 7);
    assert!(graph.connections.is_empty());
}

#[test]
fn probability_override_is_clamped() {
    let always = Interpreter::default().with_connection_probability(3.0);
    assert_eq!(always.connection_probability(), 1.0);
    let graph = always.interpret(FULL_SCENE, &mut seeded(11)).unwrap();
    assert_eq!(graph.connections.len(), 6);

    let never = Interpreter::default().with_connection_probability(-1.0);
    let graph = never.interpret(FULL_SCENE, &mut seeded(11)).unwrap();
    assert!(graph.connections.is_empty());

    let nan = Interpreter::default().with_connection_probability(f64::NAN);
    assert_eq!(nan.connection_probability(), CONNECTION_PROBABILITY);
}

#[test]
fn connections_never_dangle() {
    let interpreter = Interpreter::default();
    for seed in 0..64 {
        let graph = interpreter.interpret(FULL_SCENE, &mut seeded(seed)).unwrap();
        assert!(graph.is_consistent(), "seed {seed} produced {:?}", graph.validate());
    }
}

// =============================================================================
// RANDOMNESS
// =============================================================================

#[test]
fn same_seed_same_graph() {
    let interpreter = Interpreter::default();
    let a = interpreter.interpret(FULL_SCENE, &mut seeded(42)).unwrap();
    let b = interpreter.interpret(FULL_SCENE, &mut seeded(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn positions_stay_in_spawn_area() {
    let interpreter = Interpreter::default();
    for seed in 0..32 {
        let graph = interpreter.interpret(FULL_SCENE, &mut seeded(seed)).unwrap();
        for e in &graph.elements {
            assert!((SPAWN_X.0..=SPAWN_X.1).contains(&e.position.x));
            assert!((SPAWN_Y.0..=SPAWN_Y.1).contains(&e.position.y));
            assert!(e.position.in_canvas());
        }
    }
}

// =============================================================================
// NARRATIVE
// =============================================================================

#[test]
fn narrative_template() {
    let graph = Interpreter::default().interpret("corpse and a pistol", &mut seeded(5)).unwrap();
    assert_eq!(
        graph.narrative,
        "Forensic analysis identified 2 key elements in the scene. Body located in a strategic position, \
         Weapon located in a strategic position. The evidence suggests an investigative pattern that \
         requires detailed analysis."
    );
}

#[test]
fn narrative_single_element() {
    let graph = Interpreter::default().interpret("a puddle", &mut seeded(5)).unwrap();
    assert_eq!(
        graph.narrative,
        "Forensic analysis identified 1 key elements in the scene. Blood located in a strategic position. \
         The evidence suggests an investigative pattern that requires detailed analysis."
    );
}
