//! List detection by marker grammar and multi-line consensus.
//!
//! Two passes run in order:
//!
//! 1. **Multi-line consensus**: when the element carries sub-line records and
//!    at least two of them start with a marker, the whole block is a list.
//!    This recovers a header line bundled together with its items.
//! 2. **Single text**: independent weak checks (ordered markers, bullet
//!    markers, indentation) each report a confidence; the maximum decides.
//!
//! A list result vetoes the heading classifier, so this module runs first.

use crate::classification::context::ClassificationContext;
use crate::classification::document_analyzer::DocumentMetrics;
use crate::classification::patterns::{embedded_markers, parse_leading_marker, ListMarker};
use crate::classification::result::{ClassificationResult, ClassificationType};
use crate::config::ListConfig;
use crate::element::TextElement;

/// Outcome of one weak check.
#[derive(Debug, Clone)]
struct CheckOutcome {
    confidence: f32,
    marker: Option<ListMarker>,
    algorithm: &'static str,
}

impl CheckOutcome {
    fn baseline(config: &ListConfig, algorithm: &'static str) -> Self {
        Self {
            confidence: config.baseline_confidence,
            marker: None,
            algorithm,
        }
    }
}

type ListCheck = fn(&TextElement, f32, &ListConfig) -> CheckOutcome;

/// Single-text checks, combined by maximum confidence.
const LIST_CHECKS: [(&str, ListCheck); 3] = [
    ("ordered", check_ordered_marker),
    ("bullet", check_bullet_marker),
    ("indentation", check_indentation),
];

/// Classify an element as list or not-list.
///
/// `None` yields a degraded `not-list` result with zero confidence.
///
/// # Examples
///
/// ```
/// use doc_structure::classification::{classify_list, ClassificationContext};
/// use doc_structure::{ClassificationType, DocumentMetrics, ListConfig, TextElement};
///
/// let element = TextElement::new("Ingredients:", 12.0)
///     .with_lines(["Ingredients:", "• Flour", "• Sugar", "• Eggs"]);
/// let result = classify_list(
///     Some(&element),
///     &DocumentMetrics::default(),
///     &ClassificationContext::default(),
///     &ListConfig::default(),
/// );
///
/// assert_eq!(result.classification_type, ClassificationType::List);
/// assert_eq!(result.list.unwrap().marker, "•");
/// ```
pub fn classify_list(
    element: Option<&TextElement>,
    metrics: &DocumentMetrics,
    _context: &ClassificationContext,
    config: &ListConfig,
) -> ClassificationResult {
    let Some(element) = element else {
        return ClassificationResult::error(ClassificationType::List);
    };

    if let Some(result) = multi_line_consensus(element, config) {
        return result;
    }

    let ratio = metrics.font_size_ratio(element.font_size);

    let mut best: Option<CheckOutcome> = None;
    let mut details = Vec::with_capacity(LIST_CHECKS.len());
    for (name, check) in LIST_CHECKS {
        let outcome = check(element, ratio, config);
        log::trace!("list check {}: {:.2}", name, outcome.confidence);
        details.push((format!("check.{}", name), outcome.confidence));
        if best.as_ref().map_or(true, |b| outcome.confidence > b.confidence) {
            best = Some(outcome);
        }
    }

    let best = best.unwrap_or_else(|| CheckOutcome::baseline(config, "marker-check"));

    let mut result = match (&best.marker, best.confidence > config.decision_threshold) {
        (Some(marker), true) => {
            ClassificationResult::new(ClassificationType::List, best.confidence, best.algorithm)
                .with_list(marker.to_list_info())
        },
        _ => {
            ClassificationResult::new(ClassificationType::NotList, best.confidence, best.algorithm)
        },
    };

    result = result.with_detail("font_ratio", ratio);
    for (key, value) in details {
        result = result.with_detail(key, value);
    }
    result
}

/// Pass (a): two or more sub-lines start with a marker.
fn multi_line_consensus(
    element: &TextElement,
    config: &ListConfig,
) -> Option<ClassificationResult> {
    let min_lines = config.min_consensus_lines.max(1);
    if element.lines.len() < min_lines {
        return None;
    }

    let markers: Vec<ListMarker> = element
        .lines
        .iter()
        .filter_map(|line| parse_leading_marker(&line.text))
        .collect();

    if markers.len() < min_lines {
        return None;
    }

    let first = markers.first()?;
    Some(
        ClassificationResult::new(
            ClassificationType::List,
            config.multi_line_confidence,
            "multi-line-consensus",
        )
        .with_list(first.to_list_info())
        .with_detail("marker_lines", markers.len() as f32)
        .with_detail("total_lines", element.lines.len() as f32),
    )
}

/// Numbered, lettered and roman markers.
///
/// A leading ordered marker on text noticeably larger than the body reads as
/// a section number, so it only reaches the enlarged confidence.
fn check_ordered_marker(element: &TextElement, ratio: f32, config: &ListConfig) -> CheckOutcome {
    if let Some(marker) = parse_leading_marker(&element.text).filter(ListMarker::is_ordered) {
        let confidence = if ratio >= config.enlarged_font_ratio {
            config.enlarged_ordered_confidence
        } else {
            config.start_confidence
        };
        return CheckOutcome {
            confidence,
            marker: Some(marker),
            algorithm: "leading-marker",
        };
    }

    match embedded_markers(&element.text).into_iter().find(ListMarker::is_ordered) {
        Some(marker) => CheckOutcome {
            confidence: config.embedded_confidence,
            marker: Some(marker),
            algorithm: "embedded-marker",
        },
        None => CheckOutcome::baseline(config, "marker-check"),
    }
}

/// Bullet glyphs.
fn check_bullet_marker(element: &TextElement, _ratio: f32, config: &ListConfig) -> CheckOutcome {
    if let Some(marker) = parse_leading_marker(&element.text).filter(|m| !m.is_ordered()) {
        return CheckOutcome {
            confidence: config.start_confidence,
            marker: Some(marker),
            algorithm: "leading-marker",
        };
    }

    match embedded_markers(&element.text).into_iter().find(|m| !m.is_ordered()) {
        Some(marker) => CheckOutcome {
            confidence: config.embedded_confidence,
            marker: Some(marker),
            algorithm: "embedded-marker",
        },
        None => CheckOutcome::baseline(config, "marker-check"),
    }
}

/// Indentation analysis needs x positions, which the extraction stage does
/// not provide yet; the check always reports the baseline.
fn check_indentation(_element: &TextElement, _ratio: f32, config: &ListConfig) -> CheckOutcome {
    CheckOutcome::baseline(config, "indentation")
}
