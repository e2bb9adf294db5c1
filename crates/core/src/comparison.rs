//! Comparisons between two comparands

use std::fmt;

use tracing::warn;

use crate::comparand::Comparand;
use crate::range::{Range, RangeSet};
use crate::text::Text;
use crate::transposition::Transposition;

/// A base and a witness comparand, each restricted to a set of ranges.
///
/// Range sets are always compressed: sorted, with overlapping and adjacent
/// ranges merged.
#[derive(Clone)]
pub struct Comparison<'a> {
    base: &'a dyn Comparand,
    witness: &'a dyn Comparand,
    base_ranges: RangeSet,
    witness_ranges: RangeSet,
}

impl<'a> Comparison<'a> {
    /// Compare the full ranges of both comparands
    pub fn new(base: &'a dyn Comparand, witness: &'a dyn Comparand) -> Self {
        Self::with_ranges(
            base,
            witness,
            RangeSet::single(base.text_range()),
            RangeSet::single(witness.text_range()),
        )
    }

    /// Compare only the given ranges of each comparand
    pub fn with_ranges(
        base: &'a dyn Comparand,
        witness: &'a dyn Comparand,
        base_ranges: RangeSet,
        witness_ranges: RangeSet,
    ) -> Self {
        Self {
            base,
            witness,
            base_ranges,
            witness_ranges,
        }
    }

    /// Compare exactly the spans of one transposition.
    ///
    /// Annotations on a text that is neither the base nor the witness are
    /// ignored.
    pub fn from_transposition(
        base: &'a dyn Comparand,
        witness: &'a dyn Comparand,
        transposition: &Transposition,
    ) -> Self {
        let (base_ranges, witness_ranges) = partition(base.text(), witness.text(), [transposition]);
        Self::with_ranges(
            base,
            witness,
            RangeSet::from_ranges(base_ranges),
            RangeSet::from_ranges(witness_ranges),
        )
    }

    /// The residual comparison with every transposed span removed
    pub fn filter(&self, transpositions: &[Transposition]) -> Comparison<'a> {
        let (in_base, in_witness) =
            partition(self.base.text(), self.witness.text(), transpositions);
        Self::with_ranges(
            self.base,
            self.witness,
            self.base_ranges.subtract(in_base),
            self.witness_ranges.subtract(in_witness),
        )
    }

    pub fn base(&self) -> &'a dyn Comparand {
        self.base
    }

    pub fn witness(&self) -> &'a dyn Comparand {
        self.witness
    }

    pub fn base_ranges(&self) -> &RangeSet {
        &self.base_ranges
    }

    pub fn witness_ranges(&self) -> &RangeSet {
        &self.witness_ranges
    }

    pub fn base_length(&self) -> usize {
        self.base_ranges.total_len()
    }

    pub fn witness_length(&self) -> usize {
        self.witness_ranges.total_len()
    }

    pub fn max_length(&self) -> usize {
        self.base_length().max(self.witness_length())
    }
}

/// Split transposition annotations into base ranges and witness ranges
fn partition<'t, I>(base: &Text, witness: &Text, transpositions: I) -> (Vec<Range>, Vec<Range>)
where
    I: IntoIterator<Item = &'t Transposition>,
{
    let mut in_base = Vec::new();
    let mut in_witness = Vec::new();

    for transposition in transpositions {
        for annotation in transposition {
            if annotation.text() == base {
                in_base.push(annotation.range());
            } else if annotation.text() == witness {
                in_witness.push(annotation.range());
            } else {
                warn!(%annotation, "transposed span belongs to neither compared text, ignoring");
            }
        }
    }

    (in_base, in_witness)
}

impl fmt::Display for Comparison<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}{} vs. {}{}]",
            self.base.text(),
            self.base_ranges,
            self.witness.text(),
            self.witness_ranges
        )
    }
}

impl fmt::Debug for Comparison<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparison")
            .field("base", &self.base.text().id())
            .field("witness", &self.witness.text().id())
            .field("base_ranges", &self.base_ranges)
            .field("witness_ranges", &self.witness_ranges)
            .finish()
    }
}
