//! Substring highlighting
//!
//! Splits text into alternating plain and highlighted [`Segment`]s.
//! Concatenating the segment texts always reproduces the input.
//!
//! ```rust
//! use bugomattic_core::highlight::{highlight, Matcher};
//!
//! let segments = highlight("foo bar foo", &Matcher::substring("foo"));
//! let texts: Vec<_> = segments.iter().map(|s| (s.text.as_str(), s.is_highlighted)).collect();
//! assert_eq!(texts, [("foo", true), (" bar ", false), ("foo", true)]);
//! ```

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::borrow::Cow;

use crate::error::BugomatticError;
use crate::result::Result;

/// What to highlight
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Literal text, matched case-insensitively
    Substring(String),
    /// A compiled pattern, matched with its own flags.
    ///
    /// When the pattern has a capture group, only group 1 is highlighted and
    /// the rest of the match stays plain.
    Pattern(Regex),
}

impl Matcher {
    pub fn substring(text: impl Into<String>) -> Self {
        Matcher::Substring(text.into())
    }

    /// Compile a pattern. Invalid patterns are rejected here so the
    /// highlighter itself never fails.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Matcher::Pattern)
            .map_err(|e| BugomatticError::invalid_pattern(pattern, e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Matcher::Substring(text) => text.is_empty(),
            Matcher::Pattern(regex) => regex.as_str().is_empty(),
        }
    }

    /// `None` only when an escaped literal exceeds the regex size limit.
    ///
    /// Search matches through this too, so a feature that matches always
    /// has something to highlight.
    pub(crate) fn regex(&self) -> Option<Cow<'_, Regex>> {
        match self {
            Matcher::Substring(text) => RegexBuilder::new(&regex::escape(text))
                .case_insensitive(true)
                .build()
                .ok()
                .map(Cow::Owned),
            Matcher::Pattern(regex) => Some(Cow::Borrowed(regex)),
        }
    }
}

/// A run of text that is either plain or highlighted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    pub is_highlighted: bool,
    /// Byte offset of the segment in the input; stable across calls and
    /// usable as a rendering key
    pub start: usize,
}

impl Segment {
    fn plain(text: &str, start: usize) -> Self {
        Self {
            text: text.to_string(),
            is_highlighted: false,
            start,
        }
    }

    fn highlighted(text: &str, start: usize) -> Self {
        Self {
            text: text.to_string(),
            is_highlighted: true,
            start,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Split `content` around every match of `matcher`.
///
/// Matches never overlap; scanning resumes after the highlighted text.
/// Zero-width matches highlight nothing and no segment is ever empty, except
/// the single plain segment returned for empty content.
pub fn highlight(content: &str, matcher: &Matcher) -> Vec<Segment> {
    if content.is_empty() || matcher.is_empty() {
        return vec![Segment::plain(content, 0)];
    }

    let Some(regex) = matcher.regex() else {
        tracing::warn!("Highlight term too large to compile, rendering plain text");
        return vec![Segment::plain(content, 0)];
    };
    let mut segments = Vec::new();
    let mut cursor = 0;

    for captures in regex.captures_iter(content) {
        let Some(full) = captures.get(0) else {
            continue;
        };
        let hit = captures.get(1).unwrap_or(full);
        if hit.is_empty() {
            continue;
        }

        if hit.start() > cursor {
            segments.push(Segment::plain(&content[cursor..hit.start()], cursor));
        }
        segments.push(Segment::highlighted(hit.as_str(), hit.start()));
        cursor = hit.end();
    }

    if cursor < content.len() {
        segments.push(Segment::plain(&content[cursor..], cursor));
    }
    segments
}

/// Strings wrapped around highlighted text when rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl HighlightMarker {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Bold yellow in ANSI terminals
    pub fn ansi() -> Self {
        Self::new("\u{1b}[1;33m", "\u{1b}[0m")
    }

    /// `<mark>` element
    pub fn html() -> Self {
        Self::new("<mark>", "</mark>")
    }

    /// Square brackets, for output without colors
    pub fn brackets() -> Self {
        Self::new("[", "]")
    }

    pub fn render(&self, segments: &[Segment]) -> String {
        let mut out = String::new();
        for segment in segments {
            if segment.is_highlighted {
                out.push_str(&self.open);
                out.push_str(&segment.text);
                out.push_str(&self.close);
            } else {
                out.push_str(&segment.text);
            }
        }
        out
    }
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self::ansi()
    }
}

/// Highlight and render in one step
pub fn render_highlighted(content: &str, matcher: &Matcher, marker: &HighlightMarker) -> String {
    marker.render(&highlight(content, matcher))
}
