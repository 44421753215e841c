//! Text element input types.
//!
//! A [`TextElement`] is one unit of extracted content (a paragraph, a heading
//! line, a bundle of list lines) together with the layout annotations the
//! extraction stage measured for it. Elements arrive in reading order and are
//! never mutated by the classifiers.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Pre-assigned content tag set by the extraction stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementTag {
    /// Ordinary text (the default when no tag is given)
    Text,
    /// Pre-identified image placeholder
    Image,
    /// Pre-identified table
    Table,
    /// Pre-identified formula
    Formula,
}

/// One visual line inside a multi-line element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineRecord {
    /// Line text
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
}

impl LineRecord {
    /// Create a line record.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A text element with its layout annotations.
///
/// Field names follow camelCase on the wire so records produced by the
/// extraction stage deserialize directly. A `null` field reads as its
/// default, and an unrecognized `type` reads as untagged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextElement {
    /// Element text
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// Font size in points (non-positive or non-finite values are treated as unknown)
    #[serde(deserialize_with = "null_as_default")]
    pub font_size: f32,
    /// Bold text
    #[serde(deserialize_with = "null_as_default")]
    pub is_bold: bool,
    /// Italic text
    #[serde(deserialize_with = "null_as_default")]
    pub is_italic: bool,
    /// Vertical space before the next element
    pub gap_after: Option<f32>,
    /// Sub-line records, used for multi-line list detection
    #[serde(deserialize_with = "null_as_default")]
    pub lines: Vec<LineRecord>,
    /// Pre-assigned tag
    #[serde(
        rename = "type",
        deserialize_with = "lenient_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub element_type: Option<ElementTag>,

    /// Caller hint: first element of the document
    #[serde(deserialize_with = "null_as_default")]
    pub is_first: bool,
    /// Caller hint: previous element was a heading
    #[serde(deserialize_with = "null_as_default")]
    pub prev_was_heading: bool,
    /// Caller hint: previous element was a list
    #[serde(deserialize_with = "null_as_default")]
    pub prev_was_list: bool,
    /// Caller hint: next element is a list
    #[serde(deserialize_with = "null_as_default")]
    pub next_is_list: bool,
    /// Caller hint: this element is followed by list items
    #[serde(deserialize_with = "null_as_default")]
    pub followed_by_list: bool,
    /// Caller hint: this element introduces a list
    #[serde(deserialize_with = "null_as_default")]
    pub is_list_heading: bool,
}

impl TextElement {
    /// Create an unstyled element.
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            ..Self::default()
        }
    }

    /// Read an element from a raw JSON record.
    ///
    /// `index` is only used for the error message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidElement`] if the record is not an object or a
    /// field has the wrong type.
    pub fn from_value(index: usize, value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidElement {
                index,
                reason: format!("expected an object, found {}", value_kind(value)),
            });
        }

        serde_json::from_value(value.clone()).map_err(|e| Error::InvalidElement {
            index,
            reason: e.to_string(),
        })
    }

    /// Mark the element bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Mark the element italic.
    pub fn italic(mut self) -> Self {
        self.is_italic = true;
        self
    }

    /// Set the vertical gap after the element.
    pub fn with_gap_after(mut self, gap: f32) -> Self {
        self.gap_after = Some(gap);
        self
    }

    /// Attach sub-line records.
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(LineRecord::new).collect();
        self
    }

    /// Set the pre-assigned tag.
    pub fn with_tag(mut self, tag: ElementTag) -> Self {
        self.element_type = Some(tag);
        self
    }

    /// Set the first-element hint.
    pub fn with_first(mut self, is_first: bool) -> Self {
        self.is_first = is_first;
        self
    }

    /// Set the followed-by-list hint.
    pub fn with_followed_by_list(mut self, followed: bool) -> Self {
        self.followed_by_list = followed;
        self
    }

    /// Text with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    /// Length of the trimmed text in characters.
    pub fn text_length(&self) -> usize {
        self.trimmed_text().chars().count()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Check whether the element carries the given tag.
    pub fn has_tag(&self, tag: ElementTag) -> bool {
        self.element_type == Some(tag)
    }
}

/// Read `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a known tag name; anything else leaves the element untagged.
fn lenient_tag<'de, D>(deserializer: D) -> std::result::Result<Option<ElementTag>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) => match name.to_ascii_lowercase().as_str() {
            "text" => Some(ElementTag::Text),
            "image" => Some(ElementTag::Image),
            "table" => Some(ElementTag::Table),
            "formula" => Some(ElementTag::Formula),
            _ => None,
        },
        _ => None,
    };
    Ok(tag)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_camel_case() {
        let value = json!({
            "text": "• First item",
            "fontSize": 12,
            "isBold": true,
            "gapAfter": 6.5,
            "lines": [{"text": "• First item"}, {"text": "• Second item"}],
            "type": "image",
            "isFirst": true
        });

        let element = TextElement::from_value(0, &value).unwrap();
        assert_eq!(element.text, "• First item");
        assert_eq!(element.font_size, 12.0);
        assert!(element.is_bold);
        assert!(!element.is_italic);
        assert_eq!(element.gap_after, Some(6.5));
        assert_eq!(element.lines.len(), 2);
        assert_eq!(element.element_type, Some(ElementTag::Image));
        assert!(element.is_first);
    }

    #[test]
    fn test_from_value_missing_fields_default() {
        let element = TextElement::from_value(0, &json!({"text": "Hello"})).unwrap();
        assert_eq!(element.font_size, 0.0);
        assert!(element.lines.is_empty());
        assert_eq!(element.gap_after, None);
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let err = TextElement::from_value(3, &Value::Null).unwrap_err();
        match err {
            Error::InvalidElement { index, reason } => {
                assert_eq!(index, 3);
                assert!(reason.contains("null"));
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_value_null_fields_default() {
        let value = json!({
            "text": "1. Introduction",
            "fontSize": null,
            "isBold": null,
            "isItalic": null,
            "gapAfter": null,
            "lines": null,
            "isFirst": null
        });

        let element = TextElement::from_value(0, &value).unwrap();
        assert_eq!(element.text, "1. Introduction");
        assert_eq!(element.font_size, 0.0);
        assert!(!element.is_bold);
        assert!(element.lines.is_empty());
        assert_eq!(element.gap_after, None);
    }

    #[test]
    fn test_from_value_unknown_tag_is_untagged() {
        let element = TextElement::from_value(0, &json!({"text": "x", "type": "caption"})).unwrap();
        assert_eq!(element.element_type, None);

        let element = TextElement::from_value(0, &json!({"text": "x", "type": 7})).unwrap();
        assert_eq!(element.element_type, None);

        let element = TextElement::from_value(0, &json!({"text": "x", "type": "Table"})).unwrap();
        assert_eq!(element.element_type, Some(ElementTag::Table));
    }

    #[test]
    fn test_from_value_rejects_wrong_field_type() {
        let err = TextElement::from_value(1, &json!({"text": 42})).unwrap_err();
        assert!(matches!(err, Error::InvalidElement { index: 1, .. }));
    }

    #[test]
    fn test_text_measurements() {
        let element = TextElement::new("  Überblick der Ergebnisse  ", 12.0);
        assert_eq!(element.trimmed_text(), "Überblick der Ergebnisse");
        assert_eq!(element.text_length(), 24);
        assert_eq!(element.word_count(), 3);
    }

    #[test]
    fn test_builder_methods() {
        let element = TextElement::new("Intro", 18.0)
            .bold()
            .italic()
            .with_gap_after(20.0)
            .with_lines(["a", "b"])
            .with_first(true);

        assert!(element.is_bold && element.is_italic && element.is_first);
        assert_eq!(element.gap_after, Some(20.0));
        assert_eq!(element.lines[1].text, "b");
    }
}
