//! Texts and annotations
//!
//! A [`Text`] is a cheap, clonable handle onto immutable content. An
//! [`Annotation`] marks a range of one text: a token, a transposed span, or a
//! zero-width gap synthesized by the collator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{CollateError, Result};
use crate::range::Range;

static NEXT_TEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a text. Two handles with the same id denote the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextId(pub u64);

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle onto the content of one witness text
#[derive(Clone)]
pub struct Text {
    id: TextId,
    content: Arc<str>,
}

impl Text {
    /// Wrap content in a new text with a fresh identity
    pub fn new(content: impl Into<Arc<str>>) -> Self {
        let id = TextId(NEXT_TEXT_ID.fetch_add(1, Ordering::Relaxed));
        Self::with_id(id, content)
    }

    /// Wrap content under an id assigned by the caller (e.g. a repository key)
    pub fn with_id(id: TextId, content: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }

    pub fn id(&self) -> TextId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Range covering the whole text
    pub fn full_range(&self) -> Range {
        Range::new(0, self.content.len())
    }

    /// Content of `range`, which must lie on character boundaries
    pub fn slice(&self, range: Range) -> Result<&str> {
        self.content
            .get(range.start..range.end)
            .ok_or(CollateError::InvalidRange {
                text: self.id,
                range,
                len: self.content.len(),
            })
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Text {}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("id", &self.id)
            .field("len", &self.content.len())
            .finish()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text {}", self.id)
    }
}

/// What an annotation marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// A lexical token
    Token,
    /// A span taking part in a transposition
    Transposition,
    /// Zero-width placeholder where the other side has content
    Gap,
}

/// A range of a specific text, tagged with what it marks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    text: Text,
    range: Range,
    kind: AnnotationKind,
}

impl Annotation {
    pub fn new(text: Text, range: Range, kind: AnnotationKind) -> Self {
        Self { text, range, kind }
    }

    pub fn token(text: Text, range: Range) -> Self {
        Self::new(text, range, AnnotationKind::Token)
    }

    pub fn transposition(text: Text, range: Range) -> Self {
        Self::new(text, range, AnnotationKind::Transposition)
    }

    /// Zero-width gap at `offset`
    pub fn gap(text: Text, offset: usize) -> Self {
        Self::new(text, Range::point(offset), AnnotationKind::Gap)
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn is_gap(&self) -> bool {
        self.kind == AnnotationKind::Gap
    }
}

impl std::hash::Hash for Text {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Annotation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Annotation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.text.id, self.range, self.kind).cmp(&(other.text.id, other.range, other.kind))
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AnnotationKind::Gap => write!(f, "GAP {} {}", self.text, self.range),
            _ => write!(f, "{} {}", self.text, self.range),
        }
    }
}
