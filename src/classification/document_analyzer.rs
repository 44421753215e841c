//! Document-level statistics for adaptive classification.
//!
//! ## Key Insight
//!
//! Documents differ wildly in their typography: body text may be 9pt or 14pt,
//! some documents use five heading sizes and others none. A fixed rule such as
//! "18pt is a heading" works poorly across this diversity, so every classifier
//! judges an element relative to the document it came from.
//!
//! ## Approach
//!
//! 1. Scan all elements once, before any per-element decision
//! 2. Find the dominant body font size, the font size spread and the smallest
//!    gap between body paragraphs
//! 3. Hand the resulting [`DocumentMetrics`] to each classifier
//!
//! The scan only looks at raw element properties. It never consults classifier
//! output, so there is no circular dependency between metrics and decisions.

use crate::config::MetricsConfig;
use crate::element::TextElement;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Base font size assumed when nothing better is known.
pub const DEFAULT_BASE_FONT_SIZE: f32 = 12.0;

/// Smallest font size accepted from an element.
pub const MIN_FONT_SIZE: f32 = 0.1;

/// Largest font size accepted from an element.
pub const MAX_FONT_SIZE: f32 = 1000.0;

/// Bounds for the font size ratio.
pub const MIN_FONT_RATIO: f32 = 0.1;
/// Bounds for the font size ratio.
pub const MAX_FONT_RATIO: f32 = 10.0;

/// Vertical gap statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GapAnalysis {
    /// Smallest gap observed after an ordinary body paragraph
    pub paragraph_gap_min: Option<f32>,
}

/// Baseline statistics for one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentMetrics {
    /// Dominant body font size in points
    pub base_font_size: f32,
    /// Normalized font size spread in `[0, 1]`
    pub font_size_variability: f32,
    /// Gap statistics
    pub gap_analysis: GapAnalysis,
}

impl Default for DocumentMetrics {
    fn default() -> Self {
        Self {
            base_font_size: DEFAULT_BASE_FONT_SIZE,
            font_size_variability: 0.0,
            gap_analysis: GapAnalysis::default(),
        }
    }
}

impl DocumentMetrics {
    /// Analyze a document with the default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_structure::{DocumentMetrics, TextElement};
    ///
    /// let elements = vec![
    ///     TextElement::new("Results", 18.0),
    ///     TextElement::new("The measured values agree with the model in all three runs.", 12.0),
    /// ];
    /// let metrics = DocumentMetrics::analyze(&elements);
    /// assert_eq!(metrics.base_font_size, 12.0);
    /// ```
    pub fn analyze(elements: &[TextElement]) -> Self {
        Self::analyze_with_config(elements, &MetricsConfig::default())
    }

    /// Analyze a document.
    ///
    /// Never fails: degenerate input (no elements, no valid font sizes)
    /// yields the conservative defaults.
    pub fn analyze_with_config(elements: &[TextElement], config: &MetricsConfig) -> Self {
        let default_base = if config.default_base_font_size.is_finite()
            && config.default_base_font_size > 0.0
        {
            config.default_base_font_size
        } else {
            DEFAULT_BASE_FONT_SIZE
        };

        let base_font_size =
            Self::compute_base_font_size(elements, config.font_size_bucket).unwrap_or(default_base);
        let font_size_variability = Self::compute_variability(elements);
        let paragraph_gap_min =
            Self::compute_paragraph_gap_min(elements, config.body_text_min_length);

        log::debug!(
            "Document metrics: base {:.1}pt, variability {:.3}, paragraph gap {:?}",
            base_font_size,
            font_size_variability,
            paragraph_gap_min
        );

        Self {
            base_font_size,
            font_size_variability,
            gap_analysis: GapAnalysis { paragraph_gap_min },
        }
    }

    /// Read metrics from a raw JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetrics`] if the record is not an object or a
    /// field has the wrong type.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidMetrics("expected an object".to_string()));
        }

        let metrics: Self = serde_json::from_value(value.clone())
            .map_err(|e| Error::InvalidMetrics(e.to_string()))?;
        Ok(metrics.sanitized())
    }

    /// Read metrics from an optional raw record, substituting defaults when
    /// the record is missing or malformed.
    pub fn from_value_or_default(value: Option<&Value>) -> Self {
        match value {
            None => Self::default(),
            Some(value) => Self::from_value(value).unwrap_or_else(|e| {
                log::warn!("{}, using default metrics", e);
                Self::default()
            }),
        }
    }

    /// Replace zero, negative and non-finite values with defaults.
    pub fn sanitized(self) -> Self {
        let base_font_size = if self.base_font_size.is_finite() && self.base_font_size > 0.0 {
            self.base_font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
        } else {
            DEFAULT_BASE_FONT_SIZE
        };

        let font_size_variability = if self.font_size_variability.is_finite() {
            self.font_size_variability.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let paragraph_gap_min = self
            .gap_analysis
            .paragraph_gap_min
            .filter(|gap| gap.is_finite() && *gap > 0.0);

        Self {
            base_font_size,
            font_size_variability,
            gap_analysis: GapAnalysis { paragraph_gap_min },
        }
    }

    /// Usable font size for an element: unknown sizes fall back to the base
    /// size, everything else is clamped to a sane range.
    pub fn effective_font_size(&self, font_size: f32) -> f32 {
        if font_size.is_finite() && font_size > 0.0 {
            font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
        } else {
            self.sanitized().base_font_size
        }
    }

    /// Element font size divided by the base font size, clamped to `[0.1, 10]`.
    pub fn font_size_ratio(&self, font_size: f32) -> f32 {
        let base = self.sanitized().base_font_size;
        (self.effective_font_size(font_size) / base).clamp(MIN_FONT_RATIO, MAX_FONT_RATIO)
    }

    /// Length-weighted mode of the font sizes.
    ///
    /// Sizes are grouped into buckets so 11.95pt and 12.02pt count together;
    /// each element weighs as many characters as it has, so a few large
    /// captions cannot outvote the body text. The reported size is the
    /// weighted mean inside the winning bucket.
    fn compute_base_font_size(elements: &[TextElement], bucket: f32) -> Option<f32> {
        let bucket = if bucket.is_finite() && bucket > 0.0 { bucket } else { 0.5 };

        // bucket key -> (weight, weighted size sum)
        let mut buckets: BTreeMap<i64, (f64, f64)> = BTreeMap::new();
        for element in elements {
            let Some(size) = valid_font_size(element.font_size) else {
                continue;
            };
            let weight = element.text_length().max(1) as f64;
            let key = (size / bucket).round() as i64;
            let entry = buckets.entry(key).or_insert((0.0, 0.0));
            entry.0 += weight;
            entry.1 += weight * size as f64;
        }

        // Ascending iteration with strict comparison keeps the smaller size on ties
        let mut best: Option<(f64, f64)> = None;
        for &(weight, sum) in buckets.values() {
            if best.map_or(true, |(best_weight, _)| weight > best_weight) {
                best = Some((weight, sum));
            }
        }

        best.map(|(weight, sum)| (sum / weight) as f32)
    }

    /// Coefficient of variation of the element font sizes, bounded to `[0, 1]`.
    fn compute_variability(elements: &[TextElement]) -> f32 {
        let sizes: Vec<f64> = elements
            .iter()
            .filter_map(|e| valid_font_size(e.font_size))
            .map(f64::from)
            .collect();

        if sizes.len() < 2 {
            return 0.0;
        }

        let mean = sizes.iter().sum::<f64>() / sizes.len() as f64;
        if mean <= 0.0 {
            return 0.0;
        }

        let variance = sizes.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / sizes.len() as f64;
        let cv = variance.sqrt() / mean;

        if cv.is_finite() {
            (cv as f32).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Smallest gap after elements that look like body text by length alone.
    fn compute_paragraph_gap_min(elements: &[TextElement], min_length: usize) -> Option<f32> {
        elements
            .iter()
            .filter(|e| e.text_length() >= min_length)
            .filter_map(|e| e.gap_after)
            .filter(|gap| gap.is_finite() && *gap > 0.0)
            .fold(None, |min: Option<f32>, gap| Some(min.map_or(gap, |m| m.min(gap))))
    }
}

fn valid_font_size(size: f32) -> Option<f32> {
    (size.is_finite() && size > 0.0).then(|| size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE))
}
