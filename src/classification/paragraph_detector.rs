//! Paragraph detection by weighted consensus of independent voters.
//!
//! Each voter looks at one property of the text (length, sentence structure,
//! punctuation density) and votes paragraph or not-paragraph with a
//! confidence. Votes are folded into a single paragraph likelihood:
//!
//! ```text
//! consensus = Σ weight · (c if paragraph else 1 − c) / Σ weight
//! ```
//!
//! The element is a paragraph when the consensus exceeds the decision
//! threshold.

use crate::classification::result::{ClassificationResult, ClassificationType};
use crate::config::ParagraphConfig;
use crate::element::TextElement;

const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '…'];
const PUNCTUATION_MARKS: [char; 7] = ['.', ',', ';', ':', '!', '?', '…'];

/// A single voter's opinion.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Vote {
    is_paragraph: bool,
    confidence: f32,
}

impl Vote {
    fn paragraph(confidence: f32) -> Self {
        Self {
            is_paragraph: true,
            confidence,
        }
    }

    fn not_paragraph(confidence: f32) -> Self {
        Self {
            is_paragraph: false,
            confidence,
        }
    }

    /// Evidence for paragraph on a 0..1 scale.
    fn paragraph_likelihood(&self) -> f32 {
        if self.is_paragraph {
            self.confidence
        } else {
            1.0 - self.confidence
        }
    }
}

struct Voter {
    name: &'static str,
    weight: fn(&ParagraphConfig) -> f32,
    vote: fn(&str, &ParagraphConfig) -> Vote,
}

const VOTERS: &[Voter] = &[
    Voter {
        name: "length",
        weight: |c| c.length_weight,
        vote: vote_length,
    },
    Voter {
        name: "sentences",
        weight: |c| c.sentence_weight,
        vote: vote_sentences,
    },
    Voter {
        name: "punctuation",
        weight: |c| c.punctuation_weight,
        vote: vote_punctuation,
    },
];

/// Classify an element as paragraph or not-paragraph.
///
/// `None` yields a degraded `not-paragraph` result with zero confidence.
pub fn classify_paragraph(
    element: Option<&TextElement>,
    config: &ParagraphConfig,
) -> ClassificationResult {
    let Some(element) = element else {
        return ClassificationResult::error(ClassificationType::Paragraph);
    };

    let text = element.trimmed_text();

    let mut weighted = 0.0f32;
    let mut total_weight = 0.0f32;
    let mut votes = Vec::with_capacity(VOTERS.len());
    for voter in VOTERS {
        let weight = (voter.weight)(config).max(0.0);
        let vote = (voter.vote)(text, config);
        log::trace!("paragraph vote {}: {:?}", voter.name, vote);
        weighted += weight * vote.paragraph_likelihood();
        total_weight += weight;
        votes.push((voter.name, vote));
    }

    let consensus = if total_weight > 0.0 {
        weighted / total_weight
    } else {
        0.0
    };

    let classification_type = if consensus > config.decision_threshold {
        ClassificationType::Paragraph
    } else {
        ClassificationType::NotParagraph
    };

    let mut result = ClassificationResult::new(classification_type, consensus, "weighted-consensus")
        .with_detail("consensus", consensus)
        .with_detail("text_length", text.chars().count() as f32);
    for (name, vote) in votes {
        result = result.with_detail(format!("vote.{}", name), vote.paragraph_likelihood());
    }
    result
}

fn vote_length(text: &str, config: &ParagraphConfig) -> Vote {
    let length = text.chars().count() as f32;
    let short = config.short_length as f32;
    let medium = config.medium_length as f32;

    if length > short {
        let span = (medium - short).max(1.0);
        Vote::paragraph(0.5 + 0.5 * ((length - short) / span).min(1.0))
    } else if short > 0.0 {
        Vote::not_paragraph(0.5 + 0.5 * (1.0 - length / short))
    } else {
        Vote::not_paragraph(1.0)
    }
}

fn vote_sentences(text: &str, config: &ParagraphConfig) -> Vote {
    let sentences = count_sentences(text);

    if sentences >= config.min_sentences {
        let extra = (sentences - config.min_sentences) as f32;
        Vote::paragraph((0.6 + 0.1 * extra).min(0.9))
    } else {
        Vote::not_paragraph(0.6)
    }
}

fn vote_punctuation(text: &str, config: &ParagraphConfig) -> Vote {
    let terminated = text.ends_with(SENTENCE_TERMINATORS);
    let marks = text.chars().filter(|c| PUNCTUATION_MARKS.contains(c)).count();

    if terminated && marks >= config.min_punctuation_marks {
        Vote::paragraph(config.punctuation_confidence)
    } else {
        Vote::not_paragraph(config.punctuation_confidence)
    }
}

/// Non-empty segments between sentence terminators.
fn count_sentences(text: &str) -> usize {
    text.split(SENTENCE_TERMINATORS)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> ClassificationResult {
        classify_paragraph(Some(&TextElement::new(text, 12.0)), &ParagraphConfig::default())
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-3, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_body_paragraph() {
        let result = classify(
            "This is a long paragraph with several sentences. It continues here. And ends here.",
        );

        assert_eq!(result.classification_type, ClassificationType::Paragraph);
        assert_close(result.confidence, 0.6627);
    }

    #[test]
    fn test_long_multi_sentence_paragraph() {
        let sentence = "The quick brown fox jumps over the lazy dog again. ";
        let text = sentence.repeat(4);
        let result = classify(&text);

        assert_eq!(result.classification_type, ClassificationType::Paragraph);
        // length 1.0, sentences 0.8, punctuation 0.7
        assert_close(result.confidence, 0.4 + 0.3 * 0.8 + 0.3 * 0.7);
        assert!(result.confidence >= 0.8);
    }

    #[test]
    fn test_short_fragment() {
        let result = classify("Short text");

        assert_eq!(result.classification_type, ClassificationType::NotParagraph);
        assert_close(result.confidence, 0.25);
    }

    #[test]
    fn test_length_vote_boundaries() {
        let config = ParagraphConfig::default();

        assert_eq!(vote_length("", &config), Vote::not_paragraph(1.0));
        assert_eq!(vote_length(&"a".repeat(50), &config), Vote::not_paragraph(0.5));
        assert_eq!(vote_length(&"a".repeat(500), &config), Vote::paragraph(1.0));
    }

    #[test]
    fn test_sentence_vote() {
        let config = ParagraphConfig::default();

        assert_eq!(vote_sentences("One. Two.", &config), Vote::paragraph(0.6));
        assert_eq!(vote_sentences("A. B. C. D. E. F. G.", &config), Vote::paragraph(0.9));
        assert_eq!(vote_sentences("No terminator here", &config), Vote::not_paragraph(0.6));
        assert_eq!(count_sentences("Wait… what?! Really."), 3);
    }

    #[test]
    fn test_punctuation_vote() {
        let config = ParagraphConfig::default();

        assert!(vote_punctuation("Yes, indeed.", &config).is_paragraph);
        assert!(!vote_punctuation("Done.", &config).is_paragraph);
        assert!(!vote_punctuation("One, two, three", &config).is_paragraph);
    }

    #[test]
    fn test_details_record_votes() {
        let result = classify("Short text");

        assert_close(result.details["vote.length"], 0.1);
        assert_close(result.details["vote.sentences"], 0.4);
        assert_close(result.details["vote.punctuation"], 0.3);
    }

    #[test]
    fn test_missing_element() {
        let result = classify_paragraph(None, &ParagraphConfig::default());

        assert_eq!(result.classification_type, ClassificationType::NotParagraph);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.algorithm, "error");
    }
}
