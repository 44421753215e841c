//! Element classification.
//!
//! Per-element classifiers are pure functions of an element, the document
//! metrics, a sequential context and configuration. [`DocumentClassifier`]
//! runs them over a whole document in priority order.

pub mod auxiliary;
pub mod context;
pub mod document_analyzer;
pub mod heading_detector;
pub mod list_detector;
pub mod orchestrator;
pub mod paragraph_detector;
pub mod patterns;
pub mod result;
pub mod subheading;

pub use auxiliary::{classify_formula, classify_image, classify_table};
pub use context::{ClassificationContext, ContextBuilder};
pub use document_analyzer::{DocumentMetrics, GapAnalysis};
pub use heading_detector::{adaptive_threshold, classify_heading};
pub use list_detector::classify_list;
pub use orchestrator::DocumentClassifier;
pub use paragraph_detector::classify_paragraph;
pub use patterns::ListMarker;
pub use result::{ClassificationResult, ClassificationType, ListInfo, ListPattern, ListType};
pub use subheading::{classify_subheading, level_for_ratio};
