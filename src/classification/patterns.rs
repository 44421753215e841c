//! List marker and section-number grammar.
//!
//! The grammar is Unicode-aware and language-agnostic:
//!
//! | Family   | Examples            | Level                          |
//! |----------|---------------------|--------------------------------|
//! | numbered | `1.` `12)`          | 0                              |
//! | roman    | `iv.` `II)`         | uppercase 0, lowercase 1       |
//! | letter   | `a.` `B)` `ж)`      | uppercase 0, lowercase 1       |
//! | bullet   | `●` `•`             | 0                              |
//! | bullet   | `−` `—` `–` `-` `*` `+` | 1                          |
//!
//! A marker only counts when it is followed by whitespace and more text.
//! Single-letter markers are read as roman numerals only for `i`, `v` and `x`;
//! `c.` or `d)` are far more often letters. Multi-letter roman markers are
//! limited to short tokens built from `i`, `v`, `x` and `l`.

use crate::classification::result::{ListInfo, ListPattern};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Marker at the start of a text
    static ref RE_LEADING_MARKER: Regex = Regex::new(
        r"^\s*(?:(?P<num>\d{1,3})[.)]|(?P<alpha>\p{L}+)[.)]|(?P<bullet>[●•\-−—–*+]))\s+\S"
    )
    .unwrap();

    /// Any marker directly after a colon
    static ref RE_MARKER_AFTER_COLON: Regex = Regex::new(
        r"[:：]\s*(?P<marker>(?:\d{1,3}|\p{L}+)[.)]|[●•\-−—–*+])\s+\S"
    )
    .unwrap();

    /// A primary bullet glyph after whitespace
    static ref RE_BULLET_AFTER_SPACE: Regex = Regex::new(r"\s(?P<marker>[●•])\s+\S").unwrap();

    /// Validated roman numeral (case-insensitive, non-empty checked separately)
    static ref RE_ROMAN: Regex =
        Regex::new(r"^(?i:M{0,3}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3}))$").unwrap();

    /// Section number: `1. Title`, `2.3. Title`, `2.3 Title`
    static ref RE_NUMBERED_HEADING: Regex =
        Regex::new(r"^\s*(?:\d+\.(?:\d+\.)*|\d+(?:\.\d+)+)\s+\S").unwrap();
}

/// Longest multi-letter token read as a roman marker. Only `i`, `v`, `x` and
/// `l` may appear, so words such as `MIX` or `CV` stay plain text.
const ROMAN_MARKER_MAX_LEN: usize = 5;

/// A list marker recognized in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMarker {
    /// Marker as written, including its punctuation (`1.`, `b)`, `•`)
    pub marker: String,
    /// Marker family
    pub pattern: ListPattern,
    /// Nesting level implied by the marker
    pub level: u8,
}

impl ListMarker {
    /// Convert into the list attributes carried by a result.
    pub fn to_list_info(&self) -> ListInfo {
        ListInfo {
            list_type: self.pattern.list_type(),
            level: self.level,
            marker: self.marker.clone(),
            pattern: self.pattern,
        }
    }

    /// Numbered, lettered or roman.
    pub fn is_ordered(&self) -> bool {
        self.pattern != ListPattern::Bullet
    }
}

/// Parse a marker at the start of `text`.
///
/// # Examples
///
/// ```
/// use doc_structure::classification::patterns::parse_leading_marker;
/// use doc_structure::ListPattern;
///
/// let marker = parse_leading_marker("ii) second point").unwrap();
/// assert_eq!(marker.pattern, ListPattern::Roman);
/// assert_eq!(marker.level, 1);
///
/// assert!(parse_leading_marker("Dr. Smith arrived").is_none());
/// ```
pub fn parse_leading_marker(text: &str) -> Option<ListMarker> {
    let caps = RE_LEADING_MARKER.captures(text)?;

    if let Some(num) = caps.name("num") {
        let punct = punctuation_after(text, num.end());
        return Some(ListMarker {
            marker: format!("{}{}", num.as_str(), punct),
            pattern: ListPattern::Numbered,
            level: 0,
        });
    }

    if let Some(alpha) = caps.name("alpha") {
        let token = alpha.as_str();
        let punct = punctuation_after(text, alpha.end());
        let (pattern, uppercase) = classify_alpha_token(token)?;
        return Some(ListMarker {
            marker: format!("{}{}", token, punct),
            pattern,
            level: if uppercase { 0 } else { 1 },
        });
    }

    let bullet = caps.name("bullet")?.as_str();
    Some(ListMarker {
        marker: bullet.to_string(),
        pattern: ListPattern::Bullet,
        level: bullet_level(bullet),
    })
}

/// Find a marker embedded inside `text`: after a colon (any marker) or after
/// whitespace (`●` and `•` only).
pub fn find_embedded_marker(text: &str) -> Option<ListMarker> {
    embedded_markers(text).into_iter().next()
}

/// All embedded markers in `text`, colon-anchored ones first.
pub fn embedded_markers(text: &str) -> Vec<ListMarker> {
    embedded_marker_positions(text)
        .into_iter()
        .map(|(_, marker)| marker)
        .collect()
}

/// Embedded markers with the byte offset where each marker starts,
/// colon-anchored ones first.
pub fn embedded_marker_positions(text: &str) -> Vec<(usize, ListMarker)> {
    let after_colon = RE_MARKER_AFTER_COLON.captures_iter(text);
    let after_space = RE_BULLET_AFTER_SPACE.captures_iter(text);

    after_colon
        .chain(after_space)
        .filter_map(|caps| caps.name("marker"))
        .filter_map(|m| parse_leading_marker(&text[m.start()..]).map(|marker| (m.start(), marker)))
        .collect()
}

/// Check whether `text` starts with a list marker.
pub fn starts_with_list_marker(text: &str) -> bool {
    parse_leading_marker(text).is_some()
}

/// Check whether `text` ends with an ASCII or full-width colon.
pub fn ends_with_colon(text: &str) -> bool {
    text.ends_with(':') || text.ends_with('：')
}

/// Check whether `text` starts with a section number.
pub fn is_numbered_heading(text: &str) -> bool {
    RE_NUMBERED_HEADING.is_match(text)
}

/// Check whether `token` is a well-formed roman numeral.
pub fn is_roman_numeral(token: &str) -> bool {
    !token.is_empty() && RE_ROMAN.is_match(token)
}

/// Decide between roman and letter for an alphabetic marker token.
/// Returns the pattern and whether the token is uppercase.
fn classify_alpha_token(token: &str) -> Option<(ListPattern, bool)> {
    let uppercase = token.chars().all(char::is_uppercase);
    let lowercase = token.chars().all(char::is_lowercase);
    if !uppercase && !lowercase {
        return None;
    }

    let length = token.chars().count();
    let single = length == 1;
    let roman_marker = if single {
        matches!(token, "i" | "v" | "x" | "I" | "V" | "X")
    } else {
        length <= ROMAN_MARKER_MAX_LEN
            && token.chars().all(|c| matches!(c.to_ascii_lowercase(), 'i' | 'v' | 'x' | 'l'))
    };
    if roman_marker && is_roman_numeral(token) {
        return Some((ListPattern::Roman, uppercase));
    }

    if single {
        return Some((ListPattern::Letter, uppercase));
    }

    None
}

fn punctuation_after(text: &str, index: usize) -> char {
    text[index..].chars().next().unwrap_or('.')
}

fn bullet_level(bullet: &str) -> u8 {
    match bullet {
        "●" | "•" => 0,
        _ => 1,
    }
}
