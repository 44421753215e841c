//! Structured document assembly.
//!
//! Turns a classified element sequence into semantic content nodes (headings,
//! paragraphs, lists with nested items, images, tables, formulas) that a
//! document writer can render directly.
//!
//! # Usage
//!
//! ```
//! use doc_structure::structure::{DocumentElement, StructureBuilder};
//! use doc_structure::{DocumentClassifier, TextElement};
//!
//! let elements = vec![
//!     TextElement::new("Ingredients", 18.0),
//!     TextElement::new("• Flour", 12.0),
//!     TextElement::new("• Sugar", 12.0),
//! ];
//! let results = DocumentClassifier::new().classify(&elements);
//! let document = StructureBuilder::new().build(&elements, &results);
//!
//! for element in &document.elements {
//!     match element {
//!         DocumentElement::Heading { level, text, .. } => println!("H{}: {}", level, text),
//!         DocumentElement::List { items, ordered, .. } => {
//!             println!("{} with {} items", if *ordered { "OL" } else { "UL" }, items.len());
//!         },
//!         _ => {},
//!     }
//! }
//! assert_eq!(document.metadata.list_count, 1);
//! ```

use crate::classification::document_analyzer::DocumentMetrics;
use crate::classification::patterns::{embedded_marker_positions, parse_leading_marker};
use crate::classification::result::{
    ClassificationResult, ClassificationType, ListPattern, ListType,
};
use crate::classification::subheading::level_for_ratio;
use crate::config::MetricsConfig;
use crate::element::TextElement;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A structured document with semantic elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredDocument {
    /// Document elements in reading order
    pub elements: Vec<DocumentElement>,

    /// Metadata
    pub metadata: DocumentMetadata,
}

/// Document element types with semantic meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DocumentElement {
    /// Heading element
    #[serde(rename = "heading")]
    Heading {
        /// Heading level (1-5, where 1 is largest)
        level: u8,
        /// Text content
        text: String,
        /// Text styling
        style: TextStyle,
    },

    /// Paragraph element
    #[serde(rename = "paragraph")]
    Paragraph {
        /// Text content
        text: String,
        /// Text styling
        style: TextStyle,
    },

    /// List element (ordered or unordered)
    #[serde(rename = "list")]
    List {
        /// Whether the list is ordered (numbered) or unordered (bullets)
        ordered: bool,
        /// Marker family of the first item
        pattern: ListPattern,
        /// List items
        items: Vec<ListItem>,
    },

    /// Image element
    #[serde(rename = "image")]
    Image {
        /// Caption or alternative text
        text: String,
    },

    /// Table element
    #[serde(rename = "table")]
    Table {
        /// Raw table text
        text: String,
    },

    /// Formula element
    #[serde(rename = "formula")]
    Formula {
        /// Raw formula text
        text: String,
    },
}

/// List item with optional nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item text without its marker
    pub text: String,
    /// Marker as written
    pub marker: String,
    /// Nested list (if any)
    pub nested: Option<Box<DocumentElement>>,
}

/// Text styling information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points
    pub font_size: f32,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            bold: false,
            italic: false,
        }
    }
}

impl TextStyle {
    fn from_element(element: &TextElement, metrics: &DocumentMetrics) -> Self {
        Self {
            font_size: metrics.effective_font_size(element.font_size),
            bold: element.is_bold,
            italic: element.is_italic,
        }
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Total number of elements
    pub element_count: usize,
    /// Number of headings
    pub heading_count: usize,
    /// Number of paragraphs
    pub paragraph_count: usize,
    /// Number of lists
    pub list_count: usize,
    /// Number of images
    pub image_count: usize,
    /// Number of tables
    pub table_count: usize,
    /// Number of formulas
    pub formula_count: usize,
}

/// A list item before nesting is resolved.
#[derive(Debug, Clone)]
struct FlatItem {
    text: String,
    marker: String,
    pattern: ListPattern,
    level: u8,
}

impl FlatItem {
    /// Read an item from text that starts with a marker.
    fn parse(text: &str) -> Option<Self> {
        let marker = parse_leading_marker(text)?;
        let body = text
            .strip_prefix(marker.marker.as_str())
            .unwrap_or(text)
            .trim()
            .to_string();
        Some(Self {
            text: body,
            marker: marker.marker,
            pattern: marker.pattern,
            level: marker.level,
        })
    }

    /// Continue the item with an unmarked line.
    fn append(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(line);
    }
}

/// Split text at its embedded markers into the leading text and the items.
fn split_embedded_items(text: &str) -> (String, Vec<FlatItem>) {
    let mut starts: Vec<usize> = embedded_marker_positions(text)
        .into_iter()
        .map(|(start, _)| start)
        .collect();
    starts.sort_unstable();
    starts.dedup();

    let Some(&first) = starts.first() else {
        return (text.to_string(), Vec::new());
    };

    let mut items: Vec<FlatItem> = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let segment = text[start..end].trim();
        match (FlatItem::parse(segment), items.last_mut()) {
            (Some(item), _) => items.push(item),
            (None, Some(previous)) => previous.append(segment),
            (None, None) => {},
        }
    }

    (text[..first].trim().to_string(), items)
}

/// A list being collected from consecutive list elements.
#[derive(Debug)]
struct PendingList {
    ordered: bool,
    pattern: ListPattern,
    items: Vec<FlatItem>,
}

/// Builds a [`StructuredDocument`] from elements and their classification.
#[derive(Debug, Clone, Default)]
pub struct StructureBuilder {
    metrics_config: MetricsConfig,
}

impl StructureBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given metrics settings when [`build`](Self::build) computes
    /// document metrics.
    pub fn with_metrics_config(mut self, config: MetricsConfig) -> Self {
        self.metrics_config = config;
        self
    }

    /// Assemble the document, computing its metrics first.
    ///
    /// `results` must be parallel to `elements`; surplus entries on either
    /// side are ignored. Degraded results and empty text elements are
    /// skipped.
    pub fn build(
        &self,
        elements: &[TextElement],
        results: &[ClassificationResult],
    ) -> StructuredDocument {
        let metrics = DocumentMetrics::analyze_with_config(elements, &self.metrics_config);
        self.build_with_metrics(elements, results, &metrics)
    }

    /// Assemble the document with the metrics the classification used.
    ///
    /// Fallback heading levels and text styles are derived from `metrics`.
    pub fn build_with_metrics(
        &self,
        elements: &[TextElement],
        results: &[ClassificationResult],
        metrics: &DocumentMetrics,
    ) -> StructuredDocument {
        if elements.len() != results.len() {
            log::warn!(
                "Element/result count mismatch ({} vs {}), extra entries ignored",
                elements.len(),
                results.len()
            );
        }

        let metrics = metrics.sanitized();
        let mut output = Vec::new();
        let mut pending: Option<PendingList> = None;

        for (element, result) in elements.iter().zip(results) {
            if result.is_error() {
                log::debug!("Skipping degraded result for {:?}", element.trimmed_text());
                continue;
            }

            if result.is(ClassificationType::List) {
                self.push_list_element(element, result, &metrics, &mut pending, &mut output);
                continue;
            }

            flush_list(&mut pending, &mut output);

            let text = element.trimmed_text().to_string();
            let node = match result.classification_type {
                ClassificationType::Image => DocumentElement::Image { text },
                ClassificationType::Table => DocumentElement::Table { text },
                ClassificationType::Formula => DocumentElement::Formula { text },
                _ if text.is_empty() => continue,
                ClassificationType::Heading | ClassificationType::Subheading => {
                    let level = result.heading_level.unwrap_or_else(|| {
                        level_for_ratio(metrics.font_size_ratio(element.font_size))
                    });
                    DocumentElement::Heading {
                        level,
                        text,
                        style: TextStyle::from_element(element, &metrics),
                    }
                },
                _ => DocumentElement::Paragraph {
                    text,
                    style: TextStyle::from_element(element, &metrics),
                },
            };
            output.push(node);
        }

        flush_list(&mut pending, &mut output);

        let metadata = calculate_metadata(&output);
        StructuredDocument {
            elements: output,
            metadata,
        }
    }

    /// Split a list element into items, merging with the pending list when
    /// the kind matches.
    fn push_list_element(
        &self,
        element: &TextElement,
        result: &ClassificationResult,
        metrics: &DocumentMetrics,
        pending: &mut Option<PendingList>,
        output: &mut Vec<DocumentElement>,
    ) {
        let lines: Vec<&str> = if element.lines.len() >= 2 {
            element.lines.iter().map(|line| line.text.as_str()).collect()
        } else {
            vec![element.text.as_str()]
        };

        let mut intro: Vec<&str> = Vec::new();
        let mut items: Vec<FlatItem> = Vec::new();
        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match FlatItem::parse(trimmed) {
                Some(item) => items.push(item),
                None => match items.last_mut() {
                    Some(previous) => previous.append(trimmed),
                    None => intro.push(trimmed),
                },
            }
        }

        let mut intro_text = intro.join(" ");

        // Embedded markers: text before the first marker is the introduction
        if items.is_empty() {
            let (head, embedded) = split_embedded_items(&intro_text);
            if embedded.is_empty() {
                let info = result.list.as_ref();
                items.push(FlatItem {
                    text: std::mem::take(&mut intro_text),
                    marker: String::new(),
                    pattern: info.map_or(ListPattern::Bullet, |l| l.pattern),
                    level: info.map_or(0, |l| l.level),
                });
            } else {
                items = embedded;
                intro_text = head;
            }
        }

        if !intro_text.is_empty() {
            flush_list(pending, output);
            output.push(DocumentElement::Paragraph {
                text: intro_text,
                style: TextStyle::from_element(element, metrics),
            });
        }

        let Some(first_pattern) = items.first().map(|item| item.pattern) else {
            return;
        };
        let ordered = result.list.as_ref().map_or_else(
            || first_pattern != ListPattern::Bullet,
            |l| l.list_type == ListType::Ordered,
        );

        match pending {
            Some(list) if list.ordered == ordered => list.items.extend(items),
            _ => {
                flush_list(pending, output);
                *pending = Some(PendingList {
                    ordered,
                    pattern: first_pattern,
                    items,
                });
            },
        }
    }
}

/// Emit the pending list, nesting deeper items under their predecessor.
fn flush_list(pending: &mut Option<PendingList>, output: &mut Vec<DocumentElement>) {
    let Some(list) = pending.take() else {
        return;
    };

    let top_level = list.items.iter().map(|item| item.level).min().unwrap_or(0);
    let mut items: Vec<ListItem> = Vec::new();

    for flat in list.items {
        let item = ListItem {
            text: flat.text,
            marker: flat.marker,
            nested: None,
        };

        let parent = if flat.level > top_level { items.last_mut() } else { None };
        match parent {
            Some(parent) => {
                let nested = parent.nested.get_or_insert_with(|| {
                    Box::new(DocumentElement::List {
                        ordered: flat.pattern != ListPattern::Bullet,
                        pattern: flat.pattern,
                        items: Vec::new(),
                    })
                });
                if let DocumentElement::List { items, .. } = nested.as_mut() {
                    items.push(item);
                }
            },
            None => items.push(item),
        }
    }

    output.push(DocumentElement::List {
        ordered: list.ordered,
        pattern: list.pattern,
        items,
    });
}

fn calculate_metadata(elements: &[DocumentElement]) -> DocumentMetadata {
    let mut metadata = DocumentMetadata {
        element_count: elements.len(),
        ..DocumentMetadata::default()
    };

    for element in elements {
        match element {
            DocumentElement::Heading { .. } => metadata.heading_count += 1,
            DocumentElement::Paragraph { .. } => metadata.paragraph_count += 1,
            DocumentElement::List { .. } => metadata.list_count += 1,
            DocumentElement::Image { .. } => metadata.image_count += 1,
            DocumentElement::Table { .. } => metadata.table_count += 1,
            DocumentElement::Formula { .. } => metadata.formula_count += 1,
        }
    }

    metadata
}

impl StructuredDocument {
    /// Convert to plain text.
    pub fn to_plain_text(&self) -> String {
        let mut text = String::new();

        for element in &self.elements {
            match element {
                DocumentElement::Heading { text: t, .. } => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(t);
                    text.push('\n');
                },
                DocumentElement::Paragraph { text: t, .. } => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(t);
                    text.push('\n');
                },
                DocumentElement::List { items, .. } => write_list_items(&mut text, items, 0),
                DocumentElement::Image { text: t } => {
                    text.push_str(&format!("[image: {}]\n", t));
                },
                DocumentElement::Table { text: t } | DocumentElement::Formula { text: t } => {
                    text.push_str(t);
                    text.push('\n');
                },
            }
        }

        text
    }

    /// Export to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn write_list_items(out: &mut String, items: &[ListItem], depth: usize) {
    for item in items {
        out.push_str(&"  ".repeat(depth));
        if !item.marker.is_empty() {
            out.push_str(&item.marker);
            out.push(' ');
        }
        out.push_str(&item.text);
        out.push('\n');
        if let Some(nested) = &item.nested {
            if let DocumentElement::List { items, .. } = nested.as_ref() {
                write_list_items(out, items, depth + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_result(marker: &str, pattern: ListPattern) -> ClassificationResult {
        let marker = parse_leading_marker(&format!("{} x", marker)).unwrap();
        assert_eq!(marker.pattern, pattern);
        ClassificationResult::new(ClassificationType::List, 0.9, "leading-marker")
            .with_list(marker.to_list_info())
    }

    fn paragraph_result() -> ClassificationResult {
        ClassificationResult::new(ClassificationType::Paragraph, 0.7, "weighted-consensus")
    }

    #[test]
    fn test_consecutive_items_merge() {
        let elements = vec![
            TextElement::new("• Flour", 12.0),
            TextElement::new("• Sugar", 12.0),
            TextElement::new("Mix well.", 12.0),
        ];
        let results = vec![
            list_result("•", ListPattern::Bullet),
            list_result("•", ListPattern::Bullet),
            paragraph_result(),
        ];

        let document = StructureBuilder::new().build(&elements, &results);
        assert_eq!(document.metadata.list_count, 1);
        assert_eq!(document.metadata.paragraph_count, 1);

        match &document.elements[0] {
            DocumentElement::List { ordered, items, .. } => {
                assert!(!ordered);
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].text, "Flour");
                assert_eq!(items[1].marker, "•");
            },
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_kind_change_starts_new_list() {
        let elements = vec![TextElement::new("• One", 12.0), TextElement::new("1. Two", 12.0)];
        let results = vec![
            list_result("•", ListPattern::Bullet),
            list_result("1.", ListPattern::Numbered),
        ];

        let document = StructureBuilder::new().build(&elements, &results);
        assert_eq!(document.metadata.list_count, 2);
    }

    #[test]
    fn test_multi_line_element_expands() {
        let element = TextElement::new("Heading:", 12.0).with_lines([
            "Heading:",
            "• A",
            "– a1",
            "continued",
            "• B",
        ]);
        let results = vec![list_result("•", ListPattern::Bullet)];

        let document = StructureBuilder::new().build(&[element], &results);
        assert_eq!(document.elements.len(), 2);
        assert!(matches!(
            &document.elements[0],
            DocumentElement::Paragraph { text, .. } if text == "Heading:"
        ));

        let DocumentElement::List { items, .. } = &document.elements[1] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].text, "B");

        let Some(nested) = &items[0].nested else {
            panic!("expected nested list");
        };
        let DocumentElement::List { items: nested_items, .. } = nested.as_ref() else {
            panic!("expected nested list");
        };
        assert_eq!(nested_items[0].text, "a1 continued");
    }

    #[test]
    fn test_embedded_marker_splits_introduction() {
        let elements = vec![TextElement::new("Steps: 1. open the lid", 12.0)];
        let results = vec![list_result("1.", ListPattern::Numbered)];

        let document = StructureBuilder::new().build(&elements, &results);
        assert_eq!(document.elements.len(), 2);
        assert!(matches!(
            &document.elements[0],
            DocumentElement::Paragraph { text, .. } if text == "Steps:"
        ));

        let DocumentElement::List { ordered, items, .. } = &document.elements[1] else {
            panic!("expected list");
        };
        assert!(*ordered);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].marker, "1.");
        assert_eq!(items[0].text, "open the lid");
        assert_eq!(document.to_plain_text(), "Steps:\n1. open the lid\n");
    }

    #[test]
    fn test_embedded_bullets_become_items() {
        let elements = vec![TextElement::new("You need • flour • eggs", 12.0)];
        let results = vec![list_result("•", ListPattern::Bullet)];

        let document = StructureBuilder::new().build(&elements, &results);
        let DocumentElement::List { items, .. } = &document.elements[1] else {
            panic!("expected list");
        };
        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, ["flour", "eggs"]);
    }

    #[test]
    fn test_build_with_metrics_uses_given_base() {
        let elements = vec![
            TextElement::new("Title", 16.0),
            TextElement::new("Body text here.", 16.0),
        ];
        let results = vec![
            ClassificationResult::new(ClassificationType::Heading, 0.9, "weighted-rules"),
            paragraph_result(),
        ];
        let metrics = DocumentMetrics {
            base_font_size: 8.0,
            ..DocumentMetrics::default()
        };

        let computed = StructureBuilder::new().build(&elements, &results);
        let given = StructureBuilder::new().build_with_metrics(&elements, &results, &metrics);

        let level = |document: &StructuredDocument| match &document.elements[0] {
            DocumentElement::Heading { level, .. } => *level,
            other => panic!("expected heading, got {:?}", other),
        };
        assert_eq!(level(&computed), level_for_ratio(1.0));
        assert_eq!(level(&given), level_for_ratio(2.0));
        assert_ne!(level(&computed), level(&given));
    }

    #[test]
    fn test_heading_level_fallback() {
        let elements = vec![
            TextElement::new("Title", 24.0),
            TextElement::new("Body text here.", 12.0),
        ];
        let results = vec![
            ClassificationResult::new(ClassificationType::Heading, 0.9, "weighted-rules"),
            paragraph_result(),
        ];

        let document = StructureBuilder::new().build(&elements, &results);
        assert!(matches!(document.elements[0], DocumentElement::Heading { level: 1, .. }));
    }

    #[test]
    fn test_degraded_and_empty_skipped() {
        let elements = vec![
            TextElement::new("kept", 12.0),
            TextElement::new("  ", 12.0),
            TextElement::new("x", 12.0),
        ];
        let results = vec![
            paragraph_result(),
            paragraph_result(),
            ClassificationResult::error(ClassificationType::Paragraph),
        ];

        let document = StructureBuilder::new().build(&elements, &results);
        assert_eq!(document.metadata.element_count, 1);
    }

    #[test]
    fn test_plain_text_and_json() {
        let elements = vec![TextElement::new("Intro", 20.0), TextElement::new("• A", 12.0)];
        let results = vec![
            ClassificationResult::new(ClassificationType::Heading, 0.9, "weighted-rules")
                .with_heading_level(1),
            list_result("•", ListPattern::Bullet),
        ];

        let document = StructureBuilder::new().build(&elements, &results);
        assert_eq!(document.to_plain_text(), "Intro\n• A\n");

        let json = document.to_json().unwrap();
        assert!(json.contains("\"type\": \"heading\""));
        assert!(json.contains("\"type\": \"list\""));
    }
}
