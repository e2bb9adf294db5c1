//! Sequence diff primitives
//!
//! A diff primitive compares two token lists and reports the spans that
//! differ as [`Delta`]s. Unchanged runs are the implicit gaps between deltas.
mod interning;
mod sequence;

pub use interning::intern;
pub use sequence::SimilarDiff;

use crate::error::{CollateError, Result};
use crate::tokenizers::{Token, TokenComparator};

/// One contiguous run of differing tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    /// Index of the first base token in the run
    pub base_start: usize,
    /// Number of base tokens in the run
    pub base_len: usize,
    /// Index of the first witness token in the run
    pub witness_start: usize,
    /// Number of witness tokens in the run
    pub witness_len: usize,
}

impl Delta {
    pub fn new(
        base_start: usize,
        base_len: usize,
        witness_start: usize,
        witness_len: usize,
    ) -> Self {
        Self {
            base_start,
            base_len,
            witness_start,
            witness_len,
        }
    }

    pub fn base_end(&self) -> usize {
        self.base_start + self.base_len
    }

    pub fn witness_end(&self) -> usize {
        self.witness_start + self.witness_len
    }
}

/// Trait for diff algorithms
pub trait SequenceDiff: Send + Sync {
    /// Compute the ordered deltas between two token lists.
    ///
    /// Tokens comparing `Equal` under `comparator` are the same symbol.
    fn diff(
        &self,
        base: &[Token],
        witness: &[Token],
        comparator: &dyn TokenComparator,
    ) -> Vec<Delta>;

    /// Get the name of this algorithm
    fn name(&self) -> &str;
}

/// Check that deltas are ordered, non-empty, fit the token lists and are
/// separated by unchanged runs of equal length on both sides.
pub fn validate_deltas(deltas: &[Delta], base_len: usize, witness_len: usize) -> Result<()> {
    let mut base_end = 0;
    let mut witness_end = 0;

    for delta in deltas {
        let ordered = delta.base_start >= base_end && delta.witness_start >= witness_end;
        let aligned = ordered && delta.base_start - base_end == delta.witness_start - witness_end;
        let in_bounds = delta.base_end() <= base_len && delta.witness_end() <= witness_len;
        let non_empty = delta.base_len > 0 || delta.witness_len > 0;

        if !(aligned && in_bounds && non_empty) {
            return Err(CollateError::MalformedDelta {
                delta: *delta,
                base_len,
                witness_len,
            });
        }

        base_end = delta.base_end();
        witness_end = delta.witness_end();
    }

    Ok(())
}

/// Convert `similar` ops into deltas, merging changed ops that touch
fn deltas_from_ops(ops: &[similar::DiffOp]) -> Vec<Delta> {
    let mut deltas: Vec<Delta> = Vec::new();

    for op in ops {
        let next = match *op {
            similar::DiffOp::Equal { .. } => continue,
            similar::DiffOp::Delete {
                old_index,
                old_len,
                new_index,
            } => Delta::new(old_index, old_len, new_index, 0),
            similar::DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => Delta::new(old_index, 0, new_index, new_len),
            similar::DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => Delta::new(old_index, old_len, new_index, new_len),
        };

        match deltas.last_mut() {
            Some(last)
                if last.base_end() == next.base_start
                    && last.witness_end() == next.witness_start =>
            {
                last.base_len += next.base_len;
                last.witness_len += next.witness_len;
            }
            _ => deltas.push(next),
        }
    }

    deltas
}
