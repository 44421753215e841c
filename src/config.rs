//! Configuration for the classification engine.
//!
//! Every threshold, weight and confidence multiplier the classifiers use lives
//! here so it can be tuned against a labeled corpus without touching the
//! decision code. The defaults reproduce the engine's calibrated behavior.
//!
//! All sections deserialize with `#[serde(default)]`, so a host can supply a
//! partial JSON document and keep the defaults for everything else.

use serde::{Deserialize, Serialize};

/// Top-level configuration for [`DocumentClassifier`](crate::classification::DocumentClassifier).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Document metrics aggregation
    pub metrics: MetricsConfig,
    /// Heading scoring rules and thresholds
    pub heading: HeadingConfig,
    /// List marker detection
    pub list: ListConfig,
    /// Paragraph consensus voting
    pub paragraph: ParagraphConfig,
}

impl ClassifierConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that demands more evidence before calling something a heading.
    ///
    /// Suited to prose-heavy documents (novels, transcripts) where stray bold
    /// or short lines are common.
    pub fn strict() -> Self {
        let mut config = Self::default();
        config.heading.clear_hierarchy_threshold = 5.0;
        config.heading.flat_hierarchy_threshold = 6.0;
        config.heading.min_heading_confidence = 0.65;
        config.list.embedded_confidence = 0.6;
        config
    }

    /// Configuration that accepts weaker heading evidence.
    ///
    /// Suited to slide decks and forms with many short labels.
    pub fn lenient() -> Self {
        let mut config = Self::default();
        config.heading.clear_hierarchy_threshold = 3.0;
        config.heading.flat_hierarchy_threshold = 4.0;
        config
    }

    /// Replace the metrics section.
    pub fn with_metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the heading section.
    pub fn with_heading(mut self, heading: HeadingConfig) -> Self {
        self.heading = heading;
        self
    }

    /// Replace the list section.
    pub fn with_list(mut self, list: ListConfig) -> Self {
        self.list = list;
        self
    }

    /// Replace the paragraph section.
    pub fn with_paragraph(mut self, paragraph: ParagraphConfig) -> Self {
        self.paragraph = paragraph;
        self
    }
}

/// Settings for [`DocumentMetrics::analyze`](crate::classification::DocumentMetrics::analyze).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Base font size used when a document has no usable font sizes
    pub default_base_font_size: f32,
    /// Bucket width (points) when searching for the dominant font size
    pub font_size_bucket: f32,
    /// Minimum trimmed length for an element to count as body text in gap analysis
    pub body_text_min_length: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            default_base_font_size: 12.0,
            font_size_bucket: 0.5,
            body_text_min_length: 50,
        }
    }
}

/// Thresholds for the heading classifier.
///
/// Font ratios are element size divided by the document's base font size.
/// Lengths count Unicode scalar values of the trimmed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingConfig {
    /// Smallest ratio that still counts as "larger than body text"
    pub min_font_ratio: f32,
    /// Ratio for a clearly larger font
    pub strong_font_ratio: f32,
    /// Ratio for the short + large font rule
    pub large_font_ratio: f32,
    /// Ratio enough for very short text
    pub slight_font_ratio: f32,
    /// Ratio for display-size text
    pub very_large_font_ratio: f32,
    /// Word cap for the display-size shortcut
    pub very_large_max_words: usize,
    /// Modest ratio below which long plain text is penalized
    pub modest_font_ratio: f32,

    /// Very short text
    pub very_short_length: usize,
    /// Short text
    pub short_length: usize,
    /// Maximum length for the trailing-colon rules
    pub colon_max_length: usize,
    /// Maximum length for the capitalized rule
    pub capital_max_length: usize,
    /// Maximum length for the first-element rule
    pub first_short_max_length: usize,
    /// Word range for the capitalized-phrase rule
    pub capitalized_min_words: usize,
    /// Word range for the capitalized-phrase rule
    pub capitalized_max_words: usize,

    /// Length beyond which text is definitely prose
    pub prose_length: usize,
    /// Word count beyond which text is penalized
    pub max_words: usize,
    /// Length that combined with `max_words` draws an extra penalty
    pub long_text_length: usize,
    /// Length beyond which unstyled, modestly sized text is penalized
    pub plain_long_length: usize,
    /// Word count above which an inner period suggests a sentence
    pub mid_sentence_min_words: usize,

    /// Multiplier on the minimal paragraph gap for the gap-after rule
    pub gap_multiplier: f32,
    /// Absolute gap (points) used when the document has no paragraph gap metric
    pub absolute_gap_fallback: f32,

    /// Variability above which the document has a clear font hierarchy
    pub high_variability: f32,
    /// Variability below which the document is considered homogeneous
    pub low_variability: f32,
    /// Score threshold for documents with a clear hierarchy
    pub clear_hierarchy_threshold: f32,
    /// Score threshold for documents with a flat hierarchy
    pub flat_hierarchy_threshold: f32,
    /// Base font size below which the threshold is raised
    pub small_base_font: f32,
    /// Base font size above which the threshold is lowered
    pub large_base_font: f32,
    /// Threshold adjustment for small and large base fonts
    pub base_font_adjustment: f32,
    /// Threshold increase for homogeneous documents
    pub homogeneous_adjustment: f32,

    /// Minimum score that confirms a numbered heading
    pub numbered_min_score: f32,
    /// Minimum score that confirms a display-size heading
    pub very_large_min_score: f32,
    /// Confidence floor for accepted headings
    pub min_heading_confidence: f32,

    /// Rule weights
    pub weights: HeadingWeights,
    /// Confidence multipliers
    pub boosts: ConfidenceBoosts,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            min_font_ratio: 1.1,
            strong_font_ratio: 1.3,
            large_font_ratio: 1.2,
            slight_font_ratio: 1.05,
            very_large_font_ratio: 1.8,
            very_large_max_words: 8,
            modest_font_ratio: 1.15,
            very_short_length: 15,
            short_length: 30,
            colon_max_length: 60,
            capital_max_length: 80,
            first_short_max_length: 50,
            capitalized_min_words: 2,
            capitalized_max_words: 6,
            prose_length: 300,
            max_words: 20,
            long_text_length: 150,
            plain_long_length: 80,
            mid_sentence_min_words: 5,
            gap_multiplier: 1.5,
            absolute_gap_fallback: 18.0,
            high_variability: 0.3,
            low_variability: 0.05,
            clear_hierarchy_threshold: 4.0,
            flat_hierarchy_threshold: 5.0,
            small_base_font: 10.0,
            large_base_font: 14.0,
            base_font_adjustment: 0.5,
            homogeneous_adjustment: 1.0,
            numbered_min_score: 2.0,
            very_large_min_score: 1.0,
            min_heading_confidence: 0.6,
            weights: HeadingWeights::default(),
            boosts: ConfidenceBoosts::default(),
        }
    }
}

impl HeadingConfig {
    /// Replace the rule weights.
    pub fn with_weights(mut self, weights: HeadingWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the confidence multipliers.
    pub fn with_boosts(mut self, boosts: ConfidenceBoosts) -> Self {
        self.boosts = boosts;
        self
    }
}

/// Score contributed by each heading rule.
///
/// Penalties are stored as positive magnitudes and subtracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingWeights {
    /// Leading section number
    pub numbered: f32,
    /// Short text in a large font
    pub short_large_font: f32,
    /// Short line ending in a colon that introduces a list
    pub list_introducer: f32,
    /// Relative font size
    pub size_based: f32,
    /// Capitalized multi-word phrase in a large font
    pub capitalized_phrase: f32,
    /// Follows a list
    pub after_list: f32,
    /// Bold or italic
    pub styled: f32,
    /// Short with trailing colon
    pub short_colon: f32,
    /// Large gap after the element
    pub gap_after: f32,
    /// Short and capitalized
    pub short_capitalized: f32,
    /// First element or directly after a heading
    pub positional: f32,
    /// First element and very short
    pub first_very_short: f32,

    /// Text far beyond heading length
    pub prose_length_penalty: f32,
    /// Too many words
    pub word_count_penalty: f32,
    /// Long text with many words
    pub long_text_penalty: f32,
    /// Period in the middle of a sentence-like run
    pub mid_sentence_penalty: f32,
    /// Long, unstyled, modestly sized text
    pub plain_long_penalty: f32,
}

impl Default for HeadingWeights {
    fn default() -> Self {
        Self {
            numbered: 3.0,
            short_large_font: 4.0,
            list_introducer: 4.0,
            size_based: 3.0,
            capitalized_phrase: 3.0,
            after_list: 2.0,
            styled: 2.0,
            short_colon: 2.0,
            gap_after: 2.0,
            short_capitalized: 1.0,
            positional: 1.0,
            first_very_short: 1.0,
            prose_length_penalty: 6.0,
            word_count_penalty: 3.0,
            long_text_penalty: 2.0,
            mid_sentence_penalty: 1.0,
            plain_long_penalty: 1.0,
        }
    }
}

/// Multiplicative confidence boosts applied after score normalization.
///
/// These factors are empirically tuned and should be revalidated against a
/// labeled corpus when the rule weights change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceBoosts {
    /// Short text in a large font
    pub short_large_font: f32,
    /// First element, short, larger than body text
    pub first_short_larger: f32,
    /// Display-size ratio with few words
    pub large_ratio_short: f32,
    /// Short text with any size increase
    pub short_size_bump: f32,
    /// Short bold or italic text
    pub styled_short: f32,
}

impl Default for ConfidenceBoosts {
    fn default() -> Self {
        Self {
            short_large_font: 2.0,
            first_short_larger: 1.8,
            large_ratio_short: 1.6,
            short_size_bump: 1.5,
            styled_short: 1.4,
        }
    }
}

/// Settings for the list classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Confidence when several sub-lines carry markers
    pub multi_line_confidence: f32,
    /// Confidence for a marker at the start of the text
    pub start_confidence: f32,
    /// Confidence for a marker embedded after a colon or space
    pub embedded_confidence: f32,
    /// Confidence for an ordered marker on enlarged text
    pub enlarged_ordered_confidence: f32,
    /// Font ratio at which an ordered marker reads as a section number
    pub enlarged_font_ratio: f32,
    /// Confidence reported when no marker is found
    pub baseline_confidence: f32,
    /// Marker lines needed for multi-line consensus
    pub min_consensus_lines: usize,
    /// Confidence above which the element is a list
    pub decision_threshold: f32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            multi_line_confidence: 0.95,
            start_confidence: 0.9,
            embedded_confidence: 0.75,
            enlarged_ordered_confidence: 0.4,
            enlarged_font_ratio: 1.2,
            baseline_confidence: 0.2,
            min_consensus_lines: 2,
            decision_threshold: 0.5,
        }
    }
}

/// Settings for the paragraph classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphConfig {
    /// Text at or below this length votes against paragraph
    pub short_length: usize,
    /// Length at which the length vote reaches full confidence
    pub medium_length: usize,
    /// Weight of the length vote
    pub length_weight: f32,
    /// Weight of the sentence-structure vote
    pub sentence_weight: f32,
    /// Weight of the punctuation-density vote
    pub punctuation_weight: f32,
    /// Sentence segments needed to vote paragraph
    pub min_sentences: usize,
    /// Punctuation marks needed to vote paragraph
    pub min_punctuation_marks: usize,
    /// Fixed confidence of the punctuation vote
    pub punctuation_confidence: f32,
    /// Consensus above which the element is a paragraph
    pub decision_threshold: f32,
}

impl Default for ParagraphConfig {
    fn default() -> Self {
        Self {
            short_length: 50,
            medium_length: 200,
            length_weight: 0.4,
            sentence_weight: 0.3,
            punctuation_weight: 0.3,
            min_sentences: 2,
            min_punctuation_marks: 2,
            punctuation_confidence: 0.7,
            decision_threshold: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let config = ClassifierConfig::default();
        assert_eq!(config.heading.weights.short_large_font, 4.0);
        assert_eq!(config.heading.boosts.short_large_font, 2.0);
        assert_eq!(config.list.start_confidence, 0.9);
        assert_eq!(config.paragraph.length_weight, 0.4);
    }

    #[test]
    fn test_presets_move_thresholds() {
        let strict = ClassifierConfig::strict();
        let lenient = ClassifierConfig::lenient();
        let default = ClassifierConfig::default();

        assert!(strict.heading.flat_hierarchy_threshold > default.heading.flat_hierarchy_threshold);
        assert!(
            lenient.heading.flat_hierarchy_threshold < default.heading.flat_hierarchy_threshold
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"heading": {"boosts": {"short_large_font": 1.2}}}"#;
        let config: ClassifierConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.heading.boosts.short_large_font, 1.2);
        assert_eq!(config.heading.boosts.styled_short, 1.4);
        assert_eq!(config.heading.min_font_ratio, 1.1);
        assert_eq!(config.list, ListConfig::default());
    }

    #[test]
    fn test_builder_methods() {
        let paragraph = ParagraphConfig {
            short_length: 40,
            ..ParagraphConfig::default()
        };
        let config = ClassifierConfig::new().with_paragraph(paragraph);
        assert_eq!(config.paragraph.short_length, 40);
    }
}
