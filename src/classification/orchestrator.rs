//! Document-level classification pass.
//!
//! [`DocumentClassifier`] computes the document metrics once, then walks the
//! elements in order. For each element the classifiers run in a fixed
//! priority order and the first positive result wins:
//!
//! 1. image tag, table, formula
//! 2. list (also vetoes heading)
//! 3. heading
//! 4. paragraph, whose result is final either way
//!
//! The winning result becomes the previous-element context of the next
//! element, so the pass is strictly sequential.

use crate::classification::auxiliary::{classify_formula, classify_image, classify_table};
use crate::classification::context::{ClassificationContext, ContextBuilder};
use crate::classification::document_analyzer::DocumentMetrics;
use crate::classification::heading_detector::classify_heading;
use crate::classification::list_detector::classify_list;
use crate::classification::paragraph_detector::classify_paragraph;
use crate::classification::result::{ClassificationResult, ClassificationType};
use crate::classification::subheading::level_for_ratio;
use crate::config::ClassifierConfig;
use crate::element::TextElement;
use serde_json::Value;

/// Classifies every element of a document.
///
/// Holds only configuration; one instance can be shared across threads and
/// reused for any number of documents.
///
/// # Examples
///
/// ```
/// use doc_structure::{ClassificationType, DocumentClassifier, TextElement};
///
/// let elements = vec![
///     TextElement::new("1. Introduction", 18.0).bold(),
///     TextElement::new(
///         "This is a long paragraph with several sentences. It continues here. And ends here.",
///         12.0,
///     ),
/// ];
///
/// let results = DocumentClassifier::new().classify(&elements);
/// assert_eq!(results[0].classification_type, ClassificationType::Heading);
/// assert_eq!(results[1].classification_type, ClassificationType::Paragraph);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentClassifier {
    config: ClassifierConfig,
}

impl DocumentClassifier {
    /// Create a classifier with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with a custom configuration.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a document, computing its metrics first.
    ///
    /// Returns one result per element, in input order.
    pub fn classify(&self, elements: &[TextElement]) -> Vec<ClassificationResult> {
        let metrics = DocumentMetrics::analyze_with_config(elements, &self.config.metrics);
        self.classify_with_metrics(elements, &metrics)
    }

    /// Classify a document with caller-supplied metrics.
    ///
    /// Degenerate metric values are replaced by defaults before use.
    pub fn classify_with_metrics(
        &self,
        elements: &[TextElement],
        metrics: &DocumentMetrics,
    ) -> Vec<ClassificationResult> {
        let metrics = metrics.sanitized();
        let builder = ContextBuilder::new(elements);
        let mut results: Vec<ClassificationResult> = Vec::with_capacity(elements.len());

        for (index, element) in elements.iter().enumerate() {
            let context = builder.build(index, results.last());
            let result = self.classify_element(element, &metrics, &context);
            log::debug!(
                "element {}: {} ({:.2}, {})",
                index,
                result.classification_type,
                result.confidence,
                result.algorithm
            );
            results.push(result);
        }

        results
    }

    /// Classify raw JSON records.
    ///
    /// Records that do not parse as elements yield a degraded result and the
    /// pass continues. Metrics come from `metrics` when given (defaults
    /// substituted if malformed), otherwise from the records that parsed.
    pub fn classify_values(
        &self,
        values: &[Value],
        metrics: Option<&Value>,
    ) -> Vec<ClassificationResult> {
        let parsed = parse_values(values);
        let metrics = self.metrics_from(&parsed, metrics);

        // Malformed slots stay in place as empty elements so neighbours keep
        // their positions.
        let elements: Vec<TextElement> = parsed
            .iter()
            .map(|element| element.clone().unwrap_or_default())
            .collect();
        let builder = ContextBuilder::new(&elements);

        let mut results: Vec<ClassificationResult> = Vec::with_capacity(elements.len());
        for (index, element) in parsed.iter().enumerate() {
            let result = match element {
                Some(element) => {
                    let context = builder.build(index, results.last());
                    self.classify_element(element, &metrics, &context)
                },
                None => ClassificationResult::error(ClassificationType::Paragraph),
            };
            results.push(result);
        }

        results
    }

    /// The metrics [`classify_values`](Self::classify_values) uses for the
    /// same input.
    pub fn metrics_for_values(&self, values: &[Value], metrics: Option<&Value>) -> DocumentMetrics {
        self.metrics_from(&parse_values(values), metrics)
    }

    fn metrics_from(
        &self,
        parsed: &[Option<TextElement>],
        metrics: Option<&Value>,
    ) -> DocumentMetrics {
        match metrics {
            Some(value) => DocumentMetrics::from_value_or_default(Some(value)),
            None => {
                let valid: Vec<TextElement> = parsed.iter().flatten().cloned().collect();
                DocumentMetrics::analyze_with_config(&valid, &self.config.metrics)
            },
        }
    }

    /// Classify a single element with an explicit context.
    pub fn classify_element(
        &self,
        element: &TextElement,
        metrics: &DocumentMetrics,
        context: &ClassificationContext,
    ) -> ClassificationResult {
        let element = Some(element);

        for auxiliary in [classify_image, classify_table, classify_formula] {
            let result = auxiliary(element);
            if result.classification_type.is_positive() {
                return result;
            }
        }

        let list = classify_list(element, metrics, context, &self.config.list);
        if list.is(ClassificationType::List) {
            return list;
        }

        let heading = classify_heading(element, metrics, context, &self.config);
        if heading.is(ClassificationType::Heading) {
            let ratio = element.map_or(1.0, |e| metrics.font_size_ratio(e.font_size));
            return heading.with_heading_level(level_for_ratio(ratio));
        }

        classify_paragraph(element, &self.config.paragraph)
    }
}

fn parse_values(values: &[Value]) -> Vec<Option<TextElement>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match TextElement::from_value(index, value) {
            Ok(element) => Some(element),
            Err(e) => {
                log::warn!("Skipping malformed element: {}", e);
                None
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::result::ListType;
    use crate::element::ElementTag;
    use serde_json::json;

    fn three_element_document() -> Vec<TextElement> {
        vec![
            TextElement::new("1. Introduction", 18.0).bold(),
            TextElement::new(
                "This is a long paragraph with several sentences. It continues here. And ends here.",
                12.0,
            ),
            TextElement::new("Heading:", 12.0).with_lines(["Heading:", "• A", "• B", "• C"]),
        ]
    }

    #[test]
    fn test_three_element_document() {
        let results = DocumentClassifier::new().classify(&three_element_document());

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].classification_type, ClassificationType::Heading);
        assert!(results[0].confidence >= 0.6);
        assert_eq!(results[1].classification_type, ClassificationType::Paragraph);
        assert_eq!(results[2].classification_type, ClassificationType::List);
        assert!(results[2].confidence >= 0.9);

        let list = results[2].list.as_ref().unwrap();
        assert_eq!(list.list_type, ListType::Unordered);
        assert_eq!(list.marker, "•");
    }

    #[test]
    fn test_heading_level_attached() {
        let results = DocumentClassifier::new().classify(&three_element_document());
        assert!(results[0].heading_level.is_some());
        assert!(results[1].heading_level.is_none());
    }

    #[test]
    fn test_image_passthrough_wins() {
        let elements = vec![TextElement::new("• not a list", 12.0).with_tag(ElementTag::Image)];
        let results = DocumentClassifier::new().classify(&elements);

        assert_eq!(results[0].classification_type, ClassificationType::Image);
        assert_eq!(results[0].confidence, 1.0);
    }

    #[test]
    fn test_paragraph_result_is_final() {
        let elements = vec![TextElement::new("tiny", 12.0)];
        let results = DocumentClassifier::new().classify(&elements);

        assert_eq!(results[0].classification_type, ClassificationType::NotParagraph);
    }

    #[test]
    fn test_empty_document() {
        assert!(DocumentClassifier::new().classify(&[]).is_empty());
    }

    #[test]
    fn test_classify_with_metrics_sanitizes() {
        let mut metrics = DocumentMetrics::default();
        metrics.base_font_size = f32::NAN;

        let results =
            DocumentClassifier::new().classify_with_metrics(&three_element_document(), &metrics);
        assert_eq!(results[0].classification_type, ClassificationType::Heading);
    }

    #[test]
    fn test_classify_values_skips_malformed() {
        let values = vec![
            json!({"text": "1. Introduction", "fontSize": 18.0, "isBold": true}),
            json!("not an object"),
            json!({"text": 42}),
            json!({
                "text": "This is a long paragraph with several sentences. It continues here. And ends here.",
                "fontSize": 12.0
            }),
        ];
        let results = DocumentClassifier::new().classify_values(&values, None);

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].classification_type, ClassificationType::Heading);
        assert!(results[1].is_error());
        assert_eq!(results[1].confidence, 0.0);
        assert!(results[2].is_error());
        assert_eq!(results[3].classification_type, ClassificationType::Paragraph);
    }

    #[test]
    fn test_classify_values_malformed_metrics() {
        let values = vec![json!({"text": "Overview", "fontSize": 24.0})];
        let results = DocumentClassifier::new().classify_values(&values, Some(&json!("broken")));

        assert_eq!(results[0].classification_type, ClassificationType::Heading);
    }

    #[test]
    fn test_metrics_for_values_matches_input() {
        let values = vec![
            json!({"text": "Body text of a reasonable length for analysis.", "fontSize": 10.0}),
            json!(null),
        ];
        let classifier = DocumentClassifier::new();

        assert_eq!(classifier.metrics_for_values(&values, None).base_font_size, 10.0);
        let given = json!({"baseFontSize": 14.0});
        assert_eq!(classifier.metrics_for_values(&values, Some(&given)).base_font_size, 14.0);
    }

    #[test]
    fn test_classifier_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DocumentClassifier>();
    }
}
