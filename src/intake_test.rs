use super::*;

#[test]
fn clean_document_text_collapses_whitespace() {
    let raw = "\n\n  ---\n\nThe body was found\n\n\n\nnear the   door.\t\n";
    assert_eq!(clean_document_text(raw), "The body was found near the door.");
}

#[test]
fn clean_document_text_of_blank_is_empty() {
    assert_eq!(clean_document_text(" \n\t "), "");
    assert_eq!(clean_document_text("***"), "");
}

#[test]
fn image_description_appends_labels() {
    let labels = vec!["body".to_owned(), "weapon".to_owned()];
    assert_eq!(
        compose_image_description("Victim marked with an X.", &labels),
        "Victim marked with an X. Detected elements: body, weapon."
    );
}

#[test]
fn image_description_falls_back_without_ocr() {
    assert_eq!(compose_image_description("  ", &[]), IMAGE_FALLBACK_DESCRIPTION);
    assert_eq!(
        compose_image_description("", &["blood".to_owned(), " ".to_owned()]),
        "Visual analysis of the image identified elements in the scene. Detected elements: blood."
    );
}

#[test]
fn typed_resolves_to_text_confidence() {
    let (text, source) = Intake::typed("body in the kitchen").resolve();
    assert_eq!(text, "body in the kitchen");
    assert_eq!(source, ConfidenceSource::Text);
}

#[test]
fn document_is_cleaned() {
    let (text, source) = Intake::Document { text: "  body \n\n near  door ".to_owned() }.resolve();
    assert_eq!(text, "body near door");
    assert_eq!(source, ConfidenceSource::Text);
}

#[test]
fn image_uses_supplied_confidence_when_present() {
    let intake = Intake::Image { ocr_text: String::new(), labels: vec!["blood".to_owned()], confidence: Some(0.91) };
    let (_, source) = intake.resolve();
    assert_eq!(source, ConfidenceSource::Supplied(0.91));

    let intake = Intake::Image { ocr_text: String::new(), labels: Vec::new(), confidence: None };
    let (_, source) = intake.resolve();
    assert_eq!(source, ConfidenceSource::Vision);
}

#[test]
fn document_summary_lists_hints() {
    assert_eq!(
        summarize_document("The VICTIM lay by the window; a stain on the rug."),
        "Elements identified: Victim identified, Blood traces, Access points"
    );
    assert_eq!(
        summarize_document("nothing of note"),
        "Analysis in progress - elements will be mapped in the visualization"
    );
}

#[test]
fn intake_deserializes_tagged() {
    let intake: Intake = serde_json::from_str(r#"{"kind":"typed","text":"blood"}"#).unwrap();
    assert_eq!(intake, Intake::typed("blood"));
}
