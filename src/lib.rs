// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::enum_variant_names)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # doc_structure
//!
//! Document-structure classification: infer the semantic role of every
//! extracted text element (heading, subheading, paragraph, list item, image,
//! table, formula) so a document writer can rebuild structured output.
//!
//! ## Core Features
//!
//! - **Document metrics**: dominant body font size, font-size variability and
//!   paragraph gap, used as the baseline for all relative decisions
//! - **Heading detection**: weighted rule table with negative evidence and
//!   thresholds that adapt to the document's font hierarchy
//! - **List detection**: Unicode marker grammar (numbers, letters, roman
//!   numerals, bullets) with multi-line consensus and nesting levels
//! - **Paragraph detection**: weighted consensus of length, sentence and
//!   punctuation voters
//! - **Structure assembly**: merged lists with nested items, heading levels,
//!   JSON and plain-text export
//!
//! ## Architecture
//!
//! Every classifier is a pure function of the element, the document metrics,
//! a sequential context and configuration. [`DocumentClassifier`] walks the
//! elements in document order, running the classifiers in priority order and
//! threading each decision into the next element's context.
//!
//! ## Quick Start
//!
//! ```
//! use doc_structure::structure::StructureBuilder;
//! use doc_structure::{ClassificationType, DocumentClassifier, TextElement};
//!
//! let elements = vec![
//!     TextElement::new("1. Introduction", 18.0).bold(),
//!     TextElement::new(
//!         "This is a long paragraph with several sentences. It continues here. And ends here.",
//!         12.0,
//!     ),
//!     TextElement::new("Heading:", 12.0).with_lines(["Heading:", "• A", "• B", "• C"]),
//! ];
//!
//! let results = DocumentClassifier::new().classify(&elements);
//! assert_eq!(results[0].classification_type, ClassificationType::Heading);
//! assert_eq!(results[1].classification_type, ClassificationType::Paragraph);
//! assert_eq!(results[2].classification_type, ClassificationType::List);
//!
//! let document = StructureBuilder::new().build(&elements, &results);
//! println!("{}", document.to_plain_text());
//! ```

// Error handling
pub mod error;

// Configuration
pub mod config;

// Input model
pub mod element;

// Classifiers and the document pass
pub mod classification;

// Structured output
pub mod structure;

// Re-exports
pub use classification::{
    ClassificationContext, ClassificationResult, ClassificationType, DocumentClassifier,
    DocumentMetrics, GapAnalysis, ListInfo, ListPattern, ListType,
};
pub use config::{
    ClassifierConfig, ConfidenceBoosts, HeadingConfig, HeadingWeights, ListConfig, MetricsConfig,
    ParagraphConfig,
};
pub use element::{ElementTag, LineRecord, TextElement};
pub use error::{Error, Result};
pub use structure::{StructureBuilder, StructuredDocument};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
