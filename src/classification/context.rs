//! Sequential context for per-element classification.
//!
//! Context carries the only facts a classifier may know about an element's
//! neighbours: whether it is first, what the previous element finally became,
//! and whether the next element looks like a list. The previous element's type
//! comes from its finalized result, so elements must be processed in document
//! order; the look-ahead is a plain marker test on raw text and never
//! classifies the next element.

use crate::classification::patterns::{ends_with_colon, starts_with_list_marker};
use crate::classification::result::{ClassificationResult, ClassificationType};
use crate::element::TextElement;
use serde::{Deserialize, Serialize};

/// Longest text that may introduce a list by ending in a colon.
pub const LIST_INTRO_MAX_LENGTH: usize = 60;

/// Neighbourhood facts for one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassificationContext {
    /// First element of the document
    pub is_first: bool,
    /// Previous element was classified as a heading
    pub prev_was_heading: bool,
    /// Previous element was classified as a list
    pub prev_was_list: bool,
    /// Next element starts with a list marker
    pub next_is_list: bool,
    /// This element introduces a list
    pub followed_by_list: bool,
}

impl ClassificationContext {
    /// Context taken from the caller-supplied hints on an element.
    ///
    /// Used when a classifier runs outside the orchestrator.
    pub fn from_hints(element: &TextElement) -> Self {
        Self {
            is_first: element.is_first,
            prev_was_heading: element.prev_was_heading,
            prev_was_list: element.prev_was_list,
            next_is_list: element.next_is_list,
            followed_by_list: element.followed_by_list || element.is_list_heading,
        }
    }

    /// Context for the first element of a document.
    pub fn first() -> Self {
        Self {
            is_first: true,
            ..Self::default()
        }
    }

    /// Either source of list-introducer evidence.
    pub fn introduces_list(&self) -> bool {
        self.followed_by_list || self.next_is_list
    }
}

/// Builds contexts for a document, one element at a time.
#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder<'a> {
    elements: &'a [TextElement],
}

impl<'a> ContextBuilder<'a> {
    /// Create a builder over the full element sequence.
    pub fn new(elements: &'a [TextElement]) -> Self {
        Self { elements }
    }

    /// Build the context for element `index`.
    ///
    /// `previous` is the finalized result of element `index - 1`. Positional
    /// facts are derived here; the element's own `followed_by_list` and
    /// `is_list_heading` hints are still honored as list-introducer evidence.
    pub fn build(
        &self,
        index: usize,
        previous: Option<&ClassificationResult>,
    ) -> ClassificationContext {
        let Some(element) = self.elements.get(index) else {
            return ClassificationContext::default();
        };

        let next_is_list = self
            .elements
            .get(index + 1)
            .map(looks_like_list)
            .unwrap_or(false);

        let text = element.trimmed_text();
        let intro_by_lookahead =
            next_is_list && ends_with_colon(text) && element.text_length() < LIST_INTRO_MAX_LENGTH;

        ClassificationContext {
            is_first: index == 0,
            prev_was_heading: previous.is_some_and(|r| r.is(ClassificationType::Heading)),
            prev_was_list: previous.is_some_and(|r| r.is(ClassificationType::List)),
            next_is_list,
            followed_by_list: element.followed_by_list
                || element.is_list_heading
                || intro_by_lookahead,
        }
    }
}

/// Raw marker test: the text or any of its sub-lines starts with a marker.
fn looks_like_list(element: &TextElement) -> bool {
    starts_with_list_marker(&element.text)
        || element.lines.iter().any(|line| starts_with_list_marker(&line.text))
}
