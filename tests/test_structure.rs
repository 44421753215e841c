//! Integration tests for structured document assembly.

use doc_structure::structure::{DocumentElement, StructureBuilder};
use doc_structure::{DocumentClassifier, ListPattern, TextElement};

// ============================================================================
// Helper Functions
// ============================================================================

fn build(elements: &[TextElement]) -> doc_structure::StructuredDocument {
    let results = DocumentClassifier::new().classify(elements);
    StructureBuilder::new().build(elements, &results)
}

fn mock_recipe() -> Vec<TextElement> {
    vec![
        TextElement::new("Pancakes", 24.0).bold(),
        TextElement::new(
            "A simple recipe for a weekend breakfast. It takes about twenty minutes to prepare.",
            12.0,
        ),
        TextElement::new("Ingredients:", 12.0).bold(),
        TextElement::new("• Flour", 12.0),
        TextElement::new("• Milk", 12.0),
        TextElement::new("– whole or skimmed", 12.0),
        TextElement::new("• Eggs", 12.0),
        TextElement::new("Method", 18.0).bold(),
        TextElement::new("1. Whisk everything together", 12.0),
        TextElement::new("2. Fry in a hot pan", 12.0),
    ]
}

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn test_recipe_structure() {
    let document = build(&mock_recipe());

    assert_eq!(document.metadata.heading_count, 3);
    assert_eq!(document.metadata.paragraph_count, 1);
    assert_eq!(document.metadata.list_count, 2);
    assert_eq!(document.metadata.element_count, 6);

    assert!(matches!(
        &document.elements[0],
        DocumentElement::Heading { level: 1, text, .. } if text == "Pancakes"
    ));
}

#[test]
fn test_bullets_merge_and_nest() {
    let document = build(&mock_recipe());

    let lists: Vec<&DocumentElement> = document
        .elements
        .iter()
        .filter(|e| matches!(e, DocumentElement::List { .. }))
        .collect();

    let DocumentElement::List { ordered, items, pattern } = lists[0] else {
        panic!("expected list");
    };
    assert!(!*ordered);
    assert_eq!(*pattern, ListPattern::Bullet);
    let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, ["Flour", "Milk", "Eggs"]);
    assert!(items[1].nested.is_some());

    let DocumentElement::List { ordered, items, .. } = lists[1] else {
        panic!("expected list");
    };
    assert!(*ordered);
    assert_eq!(items[0].marker, "1.");
    assert_eq!(items[1].text, "Fry in a hot pan");
}

#[test]
fn test_bundled_list_with_header_line() {
    let elements = vec![
        TextElement::new("1. Introduction", 18.0).bold(),
        TextElement::new(
            "This is a long paragraph with several sentences. It continues here. And ends here.",
            12.0,
        ),
        TextElement::new("Heading:", 12.0).with_lines(["Heading:", "• A", "• B", "• C"]),
    ];
    let document = build(&elements);

    assert_eq!(document.metadata.list_count, 1);
    assert!(document
        .elements
        .iter()
        .any(|e| matches!(e, DocumentElement::Paragraph { text, .. } if text == "Heading:")));
}

#[test]
fn test_plain_text_export() {
    let document = build(&mock_recipe());
    let text = document.to_plain_text();

    assert!(text.starts_with("Pancakes\n"));
    assert!(text.contains("• Flour\n"));
    assert!(text.contains("  – whole or skimmed\n"));
    assert!(text.contains("2. Fry in a hot pan\n"));
}

#[test]
fn test_json_export_is_tagged() {
    let document = build(&mock_recipe());
    let json = document.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["elements"][0]["type"], "heading");
    assert_eq!(value["metadata"]["list_count"], 2);
}

#[test]
fn test_empty_document() {
    let document = build(&[]);

    assert!(document.elements.is_empty());
    assert_eq!(document.metadata.element_count, 0);
    assert_eq!(document.to_plain_text(), "");
}
