//! Gap synthesis
//!
//! A gap is a zero-width annotation marking where one side has no token
//! opposite content on the other side.

use crate::diff::Origin;
use crate::text::{Annotation, Text};
use crate::tokenizers::Token;

/// Whether a collation covers the residual comparison or one transposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollationMode {
    /// The comparison with transposed spans removed
    Residual,
    /// Sub-collation of the n-th transposition
    Transposition(usize),
}

impl CollationMode {
    pub fn is_transposition(&self) -> bool {
        matches!(self, CollationMode::Transposition(_))
    }

    /// Origin recorded on differences produced in this mode
    pub fn origin(&self) -> Origin {
        match *self {
            CollationMode::Residual => Origin::Residual,
            CollationMode::Transposition(index) => Origin::Transposition(index),
        }
    }
}

/// Gap factory for one side of one collation.
///
/// Consecutive gaps at the same offset are the same gap; the cache hands back
/// the previous annotation instead of allocating another.
#[derive(Debug)]
pub struct GapCache {
    text: Text,
    mode: CollationMode,
    /// Anchor used in a transposition when the side has no tokens at all
    fallback: usize,
    last: Option<Annotation>,
    allocated: usize,
}

impl GapCache {
    pub fn new(text: Text, mode: CollationMode, fallback: usize) -> Self {
        Self {
            text,
            mode,
            fallback,
            last: None,
            allocated: 0,
        }
    }

    /// Gap standing in for `tokens[k]`, the token this side lacks
    pub fn gap(&mut self, tokens: &[Token], k: usize) -> Annotation {
        let offset = anchor(tokens, k, self.mode, self.fallback);

        if let Some(last) = &self.last {
            if last.range().start == offset {
                return last.clone();
            }
        }

        let gap = Annotation::gap(self.text.clone(), offset);
        self.last = Some(gap.clone());
        self.allocated += 1;
        gap
    }

    /// Number of distinct gaps created so far
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}

/// Offset at which a gap for missing token `k` is anchored
pub fn anchor(tokens: &[Token], k: usize, mode: CollationMode, fallback: usize) -> usize {
    match k.checked_sub(1).and_then(|prev| tokens.get(prev)) {
        Some(prev) => prev.range().end,
        None if mode.is_transposition() => tokens.first().map_or(fallback, |t| t.range().start),
        None => 0,
    }
}
