//! Classification result types shared by every classifier.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Algorithm name reported by degraded results.
pub const ERROR_ALGORITHM: &str = "error";

/// Outcome of a classifier. Each classifier reports either its role or the
/// matching `Not*` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationType {
    /// Section heading
    Heading,
    /// Not a heading
    NotHeading,
    /// Subheading with a level
    Subheading,
    /// Not a subheading
    NotSubheading,
    /// Body paragraph
    Paragraph,
    /// Not a paragraph
    NotParagraph,
    /// List or list item
    List,
    /// Not a list
    NotList,
    /// Table
    Table,
    /// Not a table
    NotTable,
    /// Image
    Image,
    /// Not an image
    NotImage,
    /// Formula
    Formula,
    /// Not a formula
    NotFormula,
}

impl ClassificationType {
    /// Check whether this is a positive role (not a `Not*` variant).
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            Self::Heading
                | Self::Subheading
                | Self::Paragraph
                | Self::List
                | Self::Table
                | Self::Image
                | Self::Formula
        )
    }

    /// The negative counterpart of a role (identity for negative variants).
    pub fn negated(&self) -> Self {
        match self {
            Self::Heading => Self::NotHeading,
            Self::Subheading => Self::NotSubheading,
            Self::Paragraph => Self::NotParagraph,
            Self::List => Self::NotList,
            Self::Table => Self::NotTable,
            Self::Image => Self::NotImage,
            Self::Formula => Self::NotFormula,
            other => *other,
        }
    }

    /// Short lowercase name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::NotHeading => "not-heading",
            Self::Subheading => "subheading",
            Self::NotSubheading => "not-subheading",
            Self::Paragraph => "paragraph",
            Self::NotParagraph => "not-paragraph",
            Self::List => "list",
            Self::NotList => "not-list",
            Self::Table => "table",
            Self::NotTable => "not-table",
            Self::Image => "image",
            Self::NotImage => "not-image",
            Self::Formula => "formula",
            Self::NotFormula => "not-formula",
        }
    }
}

impl std::fmt::Display for ClassificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered (numbered) or unordered (bulleted) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    /// Numbered, lettered or roman markers
    Ordered,
    /// Bullet glyphs
    Unordered,
}

/// The marker family that identified a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListPattern {
    /// `1.` or `1)`
    Numbered,
    /// `a.` or `B)`
    Letter,
    /// `iv.` or `II)`
    Roman,
    /// `•`, `–`, `*` and friends
    Bullet,
}

impl ListPattern {
    /// List type implied by the marker family.
    pub fn list_type(&self) -> ListType {
        match self {
            ListPattern::Bullet => ListType::Unordered,
            _ => ListType::Ordered,
        }
    }
}

/// List attributes attached to a `list` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Ordered or unordered
    pub list_type: ListType,
    /// Nesting level (0 = top level)
    pub level: u8,
    /// Marker text as it appeared (`•`, `1.`, `b)`)
    pub marker: String,
    /// Marker family
    pub pattern: ListPattern,
}

/// Typed, confidence-scored output of a classifier.
///
/// `confidence` measures the evidence for the classifier's role, so a
/// `not-list` result with confidence 0.2 means weak list evidence. It is
/// always within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Decided type
    #[serde(rename = "type")]
    pub classification_type: ClassificationType,
    /// Evidence strength in `[0, 1]`
    pub confidence: f32,
    /// Name of the deciding method
    pub algorithm: String,
    /// Diagnostics: raw score, threshold, ratios, fired rules
    pub details: IndexMap<String, f32>,
    /// List attributes, present on `list` results
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub list: Option<ListInfo>,
    /// Heading level (1-5), present on heading and subheading results
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub heading_level: Option<u8>,
}

impl ClassificationResult {
    /// Create a result, clamping the confidence into `[0, 1]`.
    pub fn new(
        classification_type: ClassificationType,
        confidence: f32,
        algorithm: impl Into<String>,
    ) -> Self {
        Self {
            classification_type,
            confidence: clamp_confidence(confidence),
            algorithm: algorithm.into(),
            details: IndexMap::new(),
            list: None,
            heading_level: None,
        }
    }

    /// Degraded result for input the classifier could not read.
    ///
    /// `role` may be given positive or negative; the result is always the
    /// negative variant with zero confidence.
    pub fn error(role: ClassificationType) -> Self {
        Self::new(role.negated(), 0.0, ERROR_ALGORITHM)
    }

    /// Attach a diagnostic value.
    pub fn with_detail(mut self, key: impl Into<String>, value: f32) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Attach list attributes.
    pub fn with_list(mut self, list: ListInfo) -> Self {
        self.list = Some(list);
        self
    }

    /// Attach a heading level.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = Some(level);
        self
    }

    /// Check whether the result reports the given type.
    pub fn is(&self, classification_type: ClassificationType) -> bool {
        self.classification_type == classification_type
    }

    /// Check whether this is a degraded result.
    pub fn is_error(&self) -> bool {
        self.algorithm == ERROR_ALGORITHM
    }
}

/// Clamp a confidence into `[0, 1]`, mapping NaN to 0.
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
