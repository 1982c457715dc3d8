use super::*;
use crate::interpret::Interpreter;
use crate::test_support::{connection, sample_graph, seeded};

fn editor() -> PreviewEditor {
    PreviewEditor::new(sample_graph(), ConfidenceScore::new(0.9))
}

#[test]
fn new_editor_is_clean_and_not_editing() {
    let ed = editor();
    assert!(!ed.is_editing());
    assert!(!ed.is_dirty());
    assert_eq!(ed.graph(), ed.snapshot());
    assert_eq!(ed.confidence().value(), 0.9);
}

#[test]
fn add_element_appends_custom_element() {
    let mut ed = editor();
    ed.begin_edit();
    assert!(ed.add_element("Fingerprint", "", &mut seeded(1)));

    let added = ed.graph().elements.last().unwrap();
    assert_eq!(added.name, "Fingerprint");
    assert_eq!(added.category, Category::Custom);
    assert_eq!(added.color, "#6366f1");
    assert_eq!(added.tooltip, "Fingerprint manually added");
    assert_eq!(added.classification, "complementary evidence");
    assert_eq!(added.icon, Icon::Marker);
    assert!((100.0..=500.0).contains(&added.position.x));
    assert!((100.0..=400.0).contains(&added.position.y));
    assert!(ed.is_dirty());
}

#[test]
fn add_element_keeps_given_classification() {
    let mut ed = editor();
    assert!(ed.add_element("Casing", "ballistic evidence", &mut seeded(1)));
    assert_eq!(ed.graph().elements[3].classification, "ballistic evidence");
}

#[test]
fn add_element_with_blank_name_is_noop() {
    let mut ed = editor();
    assert!(!ed.add_element("", "x", &mut seeded(1)));
    assert!(!ed.add_element("   ", "x", &mut seeded(1)));
    assert!(!ed.is_dirty());
}

#[test]
fn add_element_with_duplicate_name_is_noop() {
    let mut ed = editor();
    assert!(!ed.add_element("Body", "", &mut seeded(1)));
    assert_eq!(ed.graph().elements.len(), 3);
}

#[test]
fn remove_element_cascades() {
    let mut ed = editor();
    assert!(ed.remove_element(1));
    let g = ed.graph();
    assert_eq!(g.elements.len(), 2);
    assert!(g.connections.is_empty());
    assert!(g.is_consistent());
}

#[test]
fn remove_element_keeps_unrelated_connections() {
    let mut g = sample_graph();
    g.connections.push(connection("Body", "Blood"));
    let mut ed = PreviewEditor::new(g, ConfidenceScore::new(0.5));
    assert!(ed.remove_element(1));
    assert_eq!(ed.graph().connections, vec![connection("Body", "Blood")]);
}

#[test]
fn remove_element_out_of_range_is_noop() {
    let mut ed = editor();
    assert!(!ed.remove_element(3));
    assert!(!ed.remove_element(usize::MAX));
    assert_eq!(ed.graph(), &sample_graph());
}

#[test]
fn add_then_remove_restores_element_count() {
    let graph = Interpreter::default()
        .with_connection_probability(1.0)
        .interpret("Body found next to a sofa with blood leading to the kitchen; front door open", &mut seeded(2))
        .unwrap();
    let before = graph.elements.len();
    let mut ed = PreviewEditor::new(graph, ConfidenceScore::new(0.9));
    ed.begin_edit();

    assert!(ed.add_element("Fingerprint", "", &mut seeded(3)));
    assert_eq!(ed.graph().elements.len(), before + 1);

    let index = ed.graph().elements.iter().position(|e| e.name == "Fingerprint").unwrap();
    assert!(ed.remove_element(index));
    assert_eq!(ed.graph().elements.len(), before);
    assert!(ed.graph().connections.iter().all(|c| !c.touches("Fingerprint")));
    assert!(ed.graph().is_consistent());
}

#[test]
fn cancel_edit_restores_snapshot() {
    let mut ed = editor();
    ed.begin_edit();
    ed.remove_element(0);
    ed.add_element("Glove", "", &mut seeded(4));
    ed.cancel_edit();
    assert!(!ed.is_editing());
    assert_eq!(ed.graph(), &sample_graph());
}

#[test]
fn commit_returns_working_copy_and_ends_edit_mode() {
    let mut ed = editor();
    ed.begin_edit();
    ed.remove_element(2);
    let committed = ed.commit();
    assert!(!ed.is_editing());
    assert!(!ed.is_dirty());
    assert_eq!(committed.elements.len(), 2);
    assert_eq!(ed.snapshot(), &committed);
}

#[test]
fn approve_without_edits_returns_original() {
    let mut ed = editor();
    assert_eq!(ed.approve(), sample_graph());
}

#[test]
fn invariant_holds_after_every_mutation() {
    let mut ed = editor();
    let mut rng = seeded(10);

    ed.add_element("A", "", &mut rng);
    assert!(ed.graph().is_consistent());
    ed.remove_element(0);
    assert!(ed.graph().is_consistent());
    ed.add_element("B", "", &mut rng);
    assert!(ed.graph().is_consistent());
    ed.remove_element(1);
    assert!(ed.graph().is_consistent());
    ed.remove_element(9);
    assert!(ed.graph().is_consistent());
    assert_eq!(ed.graph().elements.len(), 3);
}
