//! Token content normalizers
//!
//! Provides the `Normalizer` trait and the implementations used to derive a
//! token's comparable content from its raw source text. Source ranges are
//! carried by the token itself, so normalizers only rewrite content.

use std::borrow::Cow;

/// Trait for token content normalizers
pub trait Normalizer: Send + Sync {
    /// Normalize the raw content of one token
    fn normalize<'a>(&self, input: &'a str) -> Cow<'a, str>;

    /// Get the name of this normalizer
    fn name(&self) -> &str;

    /// Clone this normalizer into a Box
    fn clone_box(&self) -> Box<dyn Normalizer>;
}

// Implement Clone for Box<dyn Normalizer>
impl Clone for Box<dyn Normalizer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

// ============================================================================
// Built-in Normalizers
// ============================================================================

/// Converts all text to lowercase
#[derive(Clone)]
pub struct Lowercase;

impl Normalizer for Lowercase {
    fn normalize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        if input.chars().any(char::is_uppercase) {
            Cow::Owned(input.to_lowercase())
        } else {
            Cow::Borrowed(input)
        }
    }

    fn name(&self) -> &str {
        "lowercase"
    }

    fn clone_box(&self) -> Box<dyn Normalizer> {
        Box::new(self.clone())
    }
}

/// Joins the two halves of a hyphenated word.
///
/// Only tokens split by exactly one hyphen are joined; whitespace around the
/// hyphen (a line break in the source) is dropped along with it.
#[derive(Clone)]
pub struct Dehyphenate {
    /// Join only words hyphenated across a line break
    pub linebreak_only: bool,
}

impl Dehyphenate {
    /// Join every two-part hyphenated word
    pub fn all() -> Self {
        Self {
            linebreak_only: false,
        }
    }

    /// Join only words hyphenated across a line break
    pub fn linebreaks() -> Self {
        Self {
            linebreak_only: true,
        }
    }
}

impl Normalizer for Dehyphenate {
    fn normalize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        if !input.contains('-') {
            return Cow::Borrowed(input);
        }
        if self.linebreak_only && !input.contains(['\n', '\r']) {
            return Cow::Borrowed(input);
        }

        let mut parts = input.split('-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(head), Some(tail), None) => {
                let mut joined = String::with_capacity(input.len());
                joined.push_str(head.trim());
                joined.push_str(tail.trim());
                Cow::Owned(joined)
            }
            _ => Cow::Borrowed(input),
        }
    }

    fn name(&self) -> &str {
        "dehyphenate"
    }

    fn clone_box(&self) -> Box<dyn Normalizer> {
        Box::new(self.clone())
    }
}

/// Collapses every internal whitespace run to a single space
#[derive(Clone)]
pub struct CollapseWhitespace;

impl Normalizer for CollapseWhitespace {
    fn normalize<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut prev_whitespace = false;
        let needs_work = input.chars().any(|ch| {
            let whitespace = ch.is_whitespace();
            let redundant = whitespace && (prev_whitespace || ch != ' ');
            prev_whitespace = whitespace;
            redundant
        });
        if !needs_work {
            return Cow::Borrowed(input);
        }

        let mut normalized = String::with_capacity(input.len());
        let mut in_whitespace = false;
        for ch in input.chars() {
            if ch.is_whitespace() {
                if !in_whitespace {
                    normalized.push(' ');
                }
                in_whitespace = true;
            } else {
                normalized.push(ch);
                in_whitespace = false;
            }
        }
        Cow::Owned(normalized)
    }

    fn name(&self) -> &str {
        "collapse_whitespace"
    }

    fn clone_box(&self) -> Box<dyn Normalizer> {
        Box::new(self.clone())
    }
}
