//! Image, table and formula classifiers.
//!
//! Images are recognized by the tag the extraction stage attaches. Table and
//! formula detection need geometry the element model does not carry yet, so
//! both report a zero-confidence negative that the orchestrator never accepts.

use crate::classification::result::{ClassificationResult, ClassificationType};
use crate::element::{ElementTag, TextElement};

/// Algorithm name for classifiers without an implementation.
pub const PLACEHOLDER_ALGORITHM: &str = "placeholder";

/// Pass through the extraction stage's image tag.
pub fn classify_image(element: Option<&TextElement>) -> ClassificationResult {
    let Some(element) = element else {
        return ClassificationResult::error(ClassificationType::Image);
    };

    if element.has_tag(ElementTag::Image) {
        ClassificationResult::new(ClassificationType::Image, 1.0, "element-tag")
    } else {
        ClassificationResult::new(ClassificationType::NotImage, 0.0, "element-tag")
    }
}

/// Always `not-table`.
pub fn classify_table(element: Option<&TextElement>) -> ClassificationResult {
    if element.is_none() {
        return ClassificationResult::error(ClassificationType::Table);
    }
    ClassificationResult::new(ClassificationType::NotTable, 0.0, PLACEHOLDER_ALGORITHM)
}

/// Always `not-formula`.
pub fn classify_formula(element: Option<&TextElement>) -> ClassificationResult {
    if element.is_none() {
        return ClassificationResult::error(ClassificationType::Formula);
    }
    ClassificationResult::new(ClassificationType::NotFormula, 0.0, PLACEHOLDER_ALGORITHM)
}
