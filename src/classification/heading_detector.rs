//! Heading detection by weighted typographic and contextual rules.
//!
//! Each element is scored against two rule tables: positive rules (larger
//! font, short text, bold, section numbers, list introducers, gaps, position)
//! and negative rules (prose-like length and punctuation). All rules are
//! evaluated, the weights are summed, and the sum is compared to a threshold
//! that adapts to the document's font hierarchy and base font size.
//!
//! Rules are `(name, predicate, weight)` entries so they can be tuned or
//! extended without touching the decision code. Weights and thresholds come
//! from [`HeadingConfig`].
//!
//! An element that the list classifier accepts is never a heading.

use crate::classification::context::ClassificationContext;
use crate::classification::document_analyzer::DocumentMetrics;
use crate::classification::list_detector::classify_list;
use crate::classification::patterns::{ends_with_colon, is_numbered_heading};
use crate::classification::result::{ClassificationResult, ClassificationType};
use crate::config::{ClassifierConfig, HeadingConfig, HeadingWeights};
use crate::element::TextElement;

/// Measurements of one element that the rules look at.
#[derive(Debug, Clone)]
struct HeadingFeatures {
    length: usize,
    word_count: usize,
    ratio: f32,
    is_bold: bool,
    is_italic: bool,
    starts_uppercase: bool,
    ends_with_colon: bool,
    ends_with_period: bool,
    has_inner_period: bool,
    is_numbered: bool,
    introduces_list: bool,
    gap_after: Option<f32>,
    gap_threshold: f32,
    adaptive_ratio: f32,
    is_first: bool,
    prev_was_heading: bool,
    prev_was_list: bool,
}

impl HeadingFeatures {
    fn extract(
        element: &TextElement,
        metrics: &DocumentMetrics,
        context: &ClassificationContext,
        config: &HeadingConfig,
    ) -> Self {
        let text = element.trimmed_text();
        let ratio = metrics.font_size_ratio(element.font_size);

        let adaptive_ratio = if metrics.font_size_variability > config.high_variability {
            config.min_font_ratio
        } else {
            config.strong_font_ratio
        };

        let gap_threshold = metrics
            .gap_analysis
            .paragraph_gap_min
            .filter(|gap| gap.is_finite() && *gap > 0.0)
            .map(|gap| gap * config.gap_multiplier)
            .unwrap_or(config.absolute_gap_fallback);

        Self {
            length: element.text_length(),
            word_count: element.word_count(),
            ratio,
            is_bold: element.is_bold,
            is_italic: element.is_italic,
            starts_uppercase: text.chars().next().is_some_and(char::is_uppercase),
            ends_with_colon: ends_with_colon(text),
            ends_with_period: text.ends_with('.'),
            has_inner_period: has_inner_period(text),
            is_numbered: is_numbered_heading(text),
            introduces_list: context.introduces_list(),
            gap_after: element.gap_after.filter(|gap| gap.is_finite()),
            gap_threshold,
            adaptive_ratio,
            is_first: context.is_first,
            prev_was_heading: context.prev_was_heading,
            prev_was_list: context.prev_was_list,
        }
    }

    fn is_styled(&self) -> bool {
        self.is_bold || self.is_italic
    }
}

/// One scoring rule.
struct HeadingRule {
    name: &'static str,
    applies: fn(&HeadingFeatures, &HeadingConfig) -> bool,
    weight: fn(&HeadingWeights) -> f32,
}

/// Evidence for a heading. Order only affects the diagnostics order.
const POSITIVE_RULES: &[HeadingRule] = &[
    HeadingRule {
        name: "numbered",
        applies: |f, c| f.is_numbered && f.ratio >= c.min_font_ratio,
        weight: |w| w.numbered,
    },
    HeadingRule {
        name: "short_large_font",
        applies: |f, c| f.length < c.short_length && f.ratio >= c.large_font_ratio,
        weight: |w| w.short_large_font,
    },
    HeadingRule {
        name: "list_introducer",
        applies: |f, c| f.ends_with_colon && f.length < c.colon_max_length && f.introduces_list,
        weight: |w| w.list_introducer,
    },
    HeadingRule {
        name: "size_based",
        applies: |f, c| {
            (f.length < c.very_short_length && f.ratio >= c.slight_font_ratio)
                || (f.length < c.short_length && f.ratio >= c.min_font_ratio)
                || (f.ratio >= f.adaptive_ratio
                    && (f.ratio >= c.strong_font_ratio
                        || f.is_styled()
                        || f.length < c.short_length))
        },
        weight: |w| w.size_based,
    },
    HeadingRule {
        name: "capitalized_phrase",
        applies: |f, c| {
            f.starts_uppercase
                && f.word_count >= c.capitalized_min_words
                && f.word_count <= c.capitalized_max_words
                && f.ratio >= c.strong_font_ratio
        },
        weight: |w| w.capitalized_phrase,
    },
    HeadingRule {
        name: "after_list",
        applies: |f, _| f.prev_was_list,
        weight: |w| w.after_list,
    },
    HeadingRule {
        name: "styled",
        applies: |f, _| f.is_styled(),
        weight: |w| w.styled,
    },
    HeadingRule {
        name: "short_colon",
        applies: |f, c| f.ends_with_colon && f.length < c.colon_max_length,
        weight: |w| w.short_colon,
    },
    HeadingRule {
        name: "gap_after",
        applies: |f, _| f.gap_after.is_some_and(|gap| gap >= f.gap_threshold),
        weight: |w| w.gap_after,
    },
    HeadingRule {
        name: "short_capitalized",
        applies: |f, c| {
            f.starts_uppercase && f.length < c.capital_max_length && f.ratio >= c.min_font_ratio
        },
        weight: |w| w.short_capitalized,
    },
    HeadingRule {
        name: "positional",
        applies: |f, _| f.is_first || f.prev_was_heading,
        weight: |w| w.positional,
    },
    HeadingRule {
        name: "first_very_short",
        applies: |f, c| f.is_first && f.length < c.first_short_max_length,
        weight: |w| w.first_very_short,
    },
];

/// Evidence against a heading. Weights are subtracted.
const NEGATIVE_RULES: &[HeadingRule] = &[
    HeadingRule {
        name: "prose_length",
        applies: |f, c| f.length > c.prose_length,
        weight: |w| w.prose_length_penalty,
    },
    HeadingRule {
        name: "word_count",
        applies: |f, c| f.word_count > c.max_words,
        weight: |w| w.word_count_penalty,
    },
    HeadingRule {
        name: "long_text",
        applies: |f, c| f.length > c.long_text_length && f.word_count > c.max_words,
        weight: |w| w.long_text_penalty,
    },
    HeadingRule {
        name: "mid_sentence",
        applies: |f, c| {
            f.has_inner_period && f.word_count > c.mid_sentence_min_words && !f.ends_with_period
        },
        weight: |w| w.mid_sentence_penalty,
    },
    HeadingRule {
        name: "plain_long",
        applies: |f, c| {
            f.length > c.plain_long_length && !f.is_styled() && f.ratio < c.modest_font_ratio
        },
        weight: |w| w.plain_long_penalty,
    },
];

/// Classify an element as heading or not-heading.
///
/// The list veto uses `config.list`; everything else uses `config.heading`.
/// `None` yields a degraded `not-heading` result with zero confidence.
///
/// # Examples
///
/// ```
/// use doc_structure::classification::{classify_heading, ClassificationContext};
/// use doc_structure::{ClassificationType, ClassifierConfig, DocumentMetrics, TextElement};
///
/// let element = TextElement::new("2. Related Work", 16.0);
/// let result = classify_heading(
///     Some(&element),
///     &DocumentMetrics::default(),
///     &ClassificationContext::default(),
///     &ClassifierConfig::default(),
/// );
///
/// assert_eq!(result.classification_type, ClassificationType::Heading);
/// assert!(result.confidence >= 0.6);
/// ```
pub fn classify_heading(
    element: Option<&TextElement>,
    metrics: &DocumentMetrics,
    context: &ClassificationContext,
    config: &ClassifierConfig,
) -> ClassificationResult {
    let Some(element) = element else {
        return ClassificationResult::error(ClassificationType::Heading);
    };

    if element.trimmed_text().is_empty() {
        return ClassificationResult::new(ClassificationType::NotHeading, 0.0, "empty");
    }

    let heading = &config.heading;
    let weights = &heading.weights;
    let features = HeadingFeatures::extract(element, metrics, context, heading);

    let mut score = 0.0f32;
    let mut fired: Vec<(&'static str, f32)> = Vec::new();
    for rule in POSITIVE_RULES {
        if (rule.applies)(&features, heading) {
            let weight = (rule.weight)(weights);
            score += weight;
            fired.push((rule.name, weight));
        }
    }
    for rule in NEGATIVE_RULES {
        if (rule.applies)(&features, heading) {
            let weight = (rule.weight)(weights);
            score -= weight;
            fired.push((rule.name, -weight));
        }
    }

    let threshold = adaptive_threshold(metrics, features.ratio, heading);

    let by_score = score >= threshold;
    let by_number = features.is_numbered && score >= heading.numbered_min_score;
    let by_display_size = features.ratio >= heading.very_large_font_ratio
        && features.word_count <= heading.very_large_max_words
        && score >= heading.very_large_min_score;
    let candidate = by_score || by_number || by_display_size;

    let list_veto = candidate
        && classify_list(Some(element), metrics, context, &config.list)
            .is(ClassificationType::List);
    let is_heading = candidate && !list_veto;

    let normalized = normalize_score(score, weights);
    let mut confidence = apply_boosts(normalized, &features, heading);
    if is_heading && confidence < heading.min_heading_confidence {
        confidence = heading.min_heading_confidence;
    }

    let algorithm = if list_veto {
        "list-veto"
    } else if by_score || !candidate {
        "weighted-rules"
    } else if by_number {
        "numbered-heading"
    } else {
        "display-size"
    };

    log::trace!(
        "heading score {:.1} (threshold {:.1}, ratio {:.2}) for {:?}: {:?}",
        score,
        threshold,
        features.ratio,
        element.trimmed_text(),
        fired
    );

    let classification_type = if is_heading {
        ClassificationType::Heading
    } else {
        ClassificationType::NotHeading
    };

    let mut result = ClassificationResult::new(classification_type, confidence, algorithm)
        .with_detail("score", score)
        .with_detail("threshold", threshold)
        .with_detail("font_ratio", features.ratio)
        .with_detail("adaptive_ratio", features.adaptive_ratio)
        .with_detail("normalized", normalized)
        .with_detail("text_length", features.length as f32)
        .with_detail("word_count", features.word_count as f32)
        .with_detail("list_veto", if list_veto { 1.0 } else { 0.0 });
    for (name, weight) in fired {
        result = result.with_detail(format!("rule.{}", name), weight);
    }
    result
}

/// Score threshold for the document.
///
/// Lower when the document shows a clear font hierarchy, adjusted for small
/// and large base fonts, and raised for body-sized text in homogeneous
/// documents where headings are unlikely.
pub fn adaptive_threshold(metrics: &DocumentMetrics, ratio: f32, config: &HeadingConfig) -> f32 {
    let metrics = metrics.sanitized();

    let mut threshold = if metrics.font_size_variability > config.high_variability {
        config.clear_hierarchy_threshold
    } else {
        config.flat_hierarchy_threshold
    };

    if metrics.base_font_size < config.small_base_font {
        threshold += config.base_font_adjustment;
    } else if metrics.base_font_size > config.large_base_font {
        threshold -= config.base_font_adjustment;
    }

    if metrics.font_size_variability < config.low_variability && ratio <= 1.0 {
        threshold += config.homogeneous_adjustment;
    }

    threshold
}

/// Map a raw score onto `[0, 1]` using the theoretical score range.
fn normalize_score(score: f32, weights: &HeadingWeights) -> f32 {
    let max: f32 = POSITIVE_RULES.iter().map(|rule| (rule.weight)(weights)).sum();
    let min: f32 = -NEGATIVE_RULES.iter().map(|rule| (rule.weight)(weights)).sum::<f32>();

    if max - min <= f32::EPSILON {
        return 0.0;
    }

    ((score - min) / (max - min)).clamp(0.0, 1.0)
}

/// Apply the multiplicative boosts, clamping after each one.
fn apply_boosts(confidence: f32, f: &HeadingFeatures, c: &HeadingConfig) -> f32 {
    let b = &c.boosts;
    let short = f.length < c.short_length;

    let boosts = [
        (short && f.ratio >= c.large_font_ratio, b.short_large_font),
        (f.is_first && f.length < c.first_short_max_length && f.ratio > 1.0, b.first_short_larger),
        (
            f.ratio >= c.very_large_font_ratio && f.word_count <= c.very_large_max_words,
            b.large_ratio_short,
        ),
        (short && f.ratio > 1.0, b.short_size_bump),
        (short && f.is_styled(), b.styled_short),
    ];

    boosts
        .iter()
        .filter(|(applies, _)| *applies)
        .fold(confidence, |acc, (_, factor)| (acc * factor).clamp(0.0, 1.0))
}

/// A sentence break inside the text, ignoring periods that belong to a
/// leading section number such as `2.` or `3.1.`.
fn has_inner_period(text: &str) -> bool {
    let body = text.trim_end_matches('.');
    let chars: Vec<char> = body.chars().collect();

    chars.windows(3).any(|w| w[1] == '.' && w[2].is_whitespace() && !w[0].is_ascii_digit())
}
