//! Tokens and token sources
//!
//! Provides the `Token` type, the `TokenSource` trait that turns a text plus a
//! set of permitted ranges into an ordered token list, and the reference
//! `WordTokenSource`. Tokens keep the source range they were read from, so
//! differences can be reported against the source text.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::config::{HyphenationFilter, TokenizerConfig};
use crate::error::Result;
use crate::metrics::levenshtein_distance;
use crate::pipeline::NormalizationPipeline;
use crate::range::{Range, RangeSet};
use crate::text::{Annotation, Text};

/// One lexical unit of a text.
///
/// Equality and hashing consider only the normalized content; the annotation
/// records where in the source the token was found.
#[derive(Debug, Clone)]
pub struct Token {
    annotation: Annotation,
    content: String,
}

impl Token {
    pub fn new(annotation: Annotation, content: impl Into<String>) -> Self {
        Self {
            annotation,
            content: content.into(),
        }
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// Source range of the token
    pub fn range(&self) -> Range {
        self.annotation.range()
    }

    /// Normalized content used for comparison
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Edit distance between the normalized contents of two tokens
    pub fn edit_distance_to(&self, other: &Token) -> usize {
        levenshtein_distance(&self.content, &other.content)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.content.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.content, self.annotation.range())
    }
}

/// Trait for collaborators that tokenize texts
pub trait TokenSource: Send + Sync {
    /// Tokenize `text`, confined to `ranges`, in document order.
    ///
    /// Must be deterministic for identical inputs.
    fn tokens_of(&self, text: &Text, ranges: &RangeSet) -> Result<Vec<Token>>;

    /// Get the name of this token source
    fn name(&self) -> &str;
}

/// Total ordering over tokens.
///
/// Tokens comparing `Equal` are treated as the same symbol by the diff.
pub trait TokenComparator: Send + Sync {
    fn compare(&self, a: &Token, b: &Token) -> Ordering;
}

/// Orders tokens by their normalized content
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentComparator;

impl TokenComparator for ContentComparator {
    fn compare(&self, a: &Token, b: &Token) -> Ordering {
        a.content.cmp(&b.content)
    }
}

// ============================================================================
// Built-in Token Source
// ============================================================================

/// Word token source.
///
/// Words are runs of letters, digits and hyphens. Runs of other
/// non-whitespace characters form punctuation tokens. Tokens never cross the
/// boundary of a permitted range.
#[derive(Clone)]
pub struct WordTokenSource {
    config: TokenizerConfig,
    pipeline: NormalizationPipeline,
}

impl WordTokenSource {
    pub fn new(config: TokenizerConfig) -> Self {
        let pipeline = NormalizationPipeline::for_config(&config);
        Self { config, pipeline }
    }

    /// Replace the normalization pipeline derived from the configuration
    pub fn with_pipeline(mut self, pipeline: NormalizationPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    fn tokenize_range(&self, text: &Text, range: Range, tokens: &mut Vec<Token>) -> Result<()> {
        let slice = text.slice(range)?;
        let chars: Vec<(usize, char)> = slice.char_indices().collect();
        let join_linebreaks = self.config.hyphenation != HyphenationFilter::IncludeAll;

        // Type and start offset (relative to the slice) of the run being read
        let mut run: Option<(TokenType, usize)> = None;
        let mut i = 0;

        while i < chars.len() {
            let (pos, ch) = chars[i];
            let char_type = classify_char(ch);

            match run {
                Some((run_type, _)) if run_type == char_type => {}
                Some((TokenType::Word, start))
                    if join_linebreaks && slice[start..pos].ends_with('-') =>
                {
                    if let Some(resume) = linebreak_continuation(&chars, i) {
                        i = resume;
                        continue;
                    }
                    self.emit(text, range.start, slice, TokenType::Word, start, pos, tokens);
                    run = Some((char_type, pos));
                }
                Some((run_type, start)) => {
                    self.emit(text, range.start, slice, run_type, start, pos, tokens);
                    run = Some((char_type, pos));
                }
                None => run = Some((char_type, pos)),
            }
            i += 1;
        }

        if let Some((run_type, start)) = run {
            self.emit(text, range.start, slice, run_type, start, slice.len(), tokens);
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn emit(
        &self,
        text: &Text,
        base_offset: usize,
        slice: &str,
        token_type: TokenType,
        start: usize,
        end: usize,
        tokens: &mut Vec<Token>,
    ) {
        let include = match token_type {
            TokenType::Word => true,
            TokenType::Punctuation => !self.config.filter_punctuation,
            TokenType::Whitespace => !self.config.filter_whitespace,
        };
        if !include {
            return;
        }

        let range = Range::new(base_offset + start, base_offset + end);
        let content = self.pipeline.process(&slice[start..end]);
        tokens.push(Token::new(Annotation::token(text.clone(), range), content));
    }
}

impl Default for WordTokenSource {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

impl TokenSource for WordTokenSource {
    fn tokens_of(&self, text: &Text, ranges: &RangeSet) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        for range in ranges {
            self.tokenize_range(text, *range, &mut tokens)?;
        }
        Ok(tokens)
    }

    fn name(&self) -> &str {
        "word"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenType {
    Word,
    Punctuation,
    Whitespace,
}

fn classify_char(ch: char) -> TokenType {
    if ch.is_alphanumeric() || ch == '-' {
        TokenType::Word
    } else if ch.is_whitespace() {
        TokenType::Whitespace
    } else {
        TokenType::Punctuation
    }
}

/// For a word ending in `-` followed by whitespace at `chars[from]`, return
/// the index of the next word character if that whitespace holds a line break.
fn linebreak_continuation(chars: &[(usize, char)], from: usize) -> Option<usize> {
    let mut saw_linebreak = false;
    let mut j = from;
    while let Some(&(_, ch)) = chars.get(j) {
        if !ch.is_whitespace() {
            break;
        }
        saw_linebreak |= ch == '\n' || ch == '\r';
        j += 1;
    }

    match chars.get(j) {
        Some(&(_, ch)) if saw_linebreak && classify_char(ch) == TokenType::Word => Some(j),
        _ => None,
    }
}
