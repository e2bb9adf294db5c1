//! Comparands: one side of a comparison

use std::fmt;

use crate::range::Range;
use crate::text::Text;

/// An entity to be collated against another of its kind.
///
/// A comparand is some text plus the range of its characters that takes part
/// in the comparison. The range may be a fragment of the text or all of it.
pub trait Comparand: Send + Sync {
    /// Text to be collated; used as a handle against the token source
    fn text(&self) -> &Text;

    /// Range of the text included in the comparison
    fn text_range(&self) -> Range;
}

/// In-memory comparand covering an entire string
#[derive(Clone)]
pub struct SimpleComparand {
    text: Text,
}

impl SimpleComparand {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            text: Text::new(content.into()),
        }
    }

    /// Wrap an existing text handle
    pub fn from_text(text: Text) -> Self {
        Self { text }
    }
}

impl Comparand for SimpleComparand {
    fn text(&self) -> &Text {
        &self.text
    }

    fn text_range(&self) -> Range {
        self.text.full_range()
    }
}

impl fmt::Debug for SimpleComparand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SimpleComparand")
            .field(&self.text.content())
            .finish()
    }
}

impl fmt::Display for SimpleComparand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A comparand restricted to part of its text
#[derive(Debug, Clone)]
pub struct FragmentComparand {
    text: Text,
    range: Range,
}

impl FragmentComparand {
    pub fn new(text: Text, range: Range) -> Self {
        Self { text, range }
    }
}

impl Comparand for FragmentComparand {
    fn text(&self) -> &Text {
        &self.text
    }

    fn text_range(&self) -> Range {
        self.range
    }
}
