//! Subheading level assignment from font-size bands.

use crate::classification::document_analyzer::DocumentMetrics;
use crate::classification::result::{ClassificationResult, ClassificationType};
use crate::element::TextElement;

/// `(minimum ratio, level)` bands, largest first. Anything below the last
/// band is level 5.
pub const LEVEL_BANDS: [(f32, u8); 4] = [(2.0, 1), (1.6, 2), (1.3, 3), (1.15, 4)];

/// Deepest level.
pub const MAX_LEVEL: u8 = 5;

const SUBHEADING_CONFIDENCE: f32 = 0.5;

/// Heading level for a font ratio.
pub fn level_for_ratio(ratio: f32) -> u8 {
    LEVEL_BANDS
        .iter()
        .find(|(min_ratio, _)| ratio >= *min_ratio)
        .map(|(_, level)| *level)
        .unwrap_or(MAX_LEVEL)
}

/// Assign a heading level to an element by its font ratio.
///
/// The level is always filled in; the type is `subheading` only when the
/// element is at least body size.
pub fn classify_subheading(
    element: Option<&TextElement>,
    metrics: &DocumentMetrics,
) -> ClassificationResult {
    let Some(element) = element else {
        return ClassificationResult::error(ClassificationType::Subheading);
    };

    let ratio = metrics.font_size_ratio(element.font_size);
    let level = level_for_ratio(ratio);

    let classification_type = if ratio >= 1.0 {
        ClassificationType::Subheading
    } else {
        ClassificationType::NotSubheading
    };

    ClassificationResult::new(classification_type, SUBHEADING_CONFIDENCE, "font-size-bands")
        .with_heading_level(level)
        .with_detail("font_ratio", ratio)
}
