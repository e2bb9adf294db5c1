//! Main collation engine that orchestrates residual and transposition collations

use tracing::{debug, info};

use crate::algorithm::validate_deltas;
use crate::alignment::Alignment;
use crate::comparand::Comparand;
use crate::comparison::Comparison;
use crate::config::CollatorConfiguration;
use crate::error::Result;
use crate::gap::{CollationMode, GapCache};
use crate::range::RangeSet;

/// Counts of differences produced by one [`Collator::collate`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollationSummary {
    /// Differences from the residual comparison
    pub residual: usize,

    /// Differences from each transposition sub-collation, in candidate order
    pub transposed: Vec<usize>,
}

impl CollationSummary {
    pub fn transpositions(&self) -> usize {
        self.transposed.len()
    }

    pub fn total(&self) -> usize {
        self.residual + self.transposed.iter().sum::<usize>()
    }
}

/// The collation engine
#[derive(Debug, Clone, Copy, Default)]
pub struct Collator;

impl Collator {
    pub fn new() -> Self {
        Self
    }

    /// Collate `witness` against `base`.
    ///
    /// The whole comparison is split into a residual comparison with every
    /// transposed span removed, plus one comparison per transposition. Each
    /// is collated independently and all differences go to the configured
    /// store. The store is not saved.
    pub fn collate<C>(
        &self,
        config: &C,
        base: &dyn Comparand,
        witness: &dyn Comparand,
    ) -> Result<CollationSummary>
    where
        C: CollatorConfiguration + ?Sized,
    {
        let comparison = Comparison::new(base, witness);

        let mut transpositions = config.transposition_source().transpositions_in(&comparison)?;
        transpositions.sort();
        transpositions.dedup();

        let residual = comparison.filter(&transpositions);
        let transposed: Vec<Comparison<'_>> = transpositions
            .iter()
            .map(|t| Comparison::from_transposition(base, witness, t))
            .collect();

        info!(%comparison, transpositions = transposed.len(), "collating");

        #[cfg(feature = "parallel")]
        {
            if config.parallel() {
                return self.collate_parallel(config, &residual, &transposed);
            }
        }

        let residual = self.collate_comparison(config, &residual, CollationMode::Residual)?;
        let transposed = transposed
            .iter()
            .enumerate()
            .map(|(index, c)| {
                self.collate_comparison(config, c, CollationMode::Transposition(index))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CollationSummary { residual, transposed })
    }

    #[cfg(feature = "parallel")]
    fn collate_parallel<C>(
        &self,
        config: &C,
        residual: &Comparison<'_>,
        transposed: &[Comparison<'_>],
    ) -> Result<CollationSummary>
    where
        C: CollatorConfiguration + ?Sized,
    {
        use rayon::prelude::*;

        let (residual, transposed) = rayon::join(
            || self.collate_comparison(config, residual, CollationMode::Residual),
            || {
                transposed
                    .par_iter()
                    .enumerate()
                    .map(|(index, c)| {
                        self.collate_comparison(config, c, CollationMode::Transposition(index))
                    })
                    .collect::<Result<Vec<_>>>()
            },
        );

        Ok(CollationSummary {
            residual: residual?,
            transposed: transposed?,
        })
    }

    /// Collate one prepared comparison, returning the number of differences added.
    ///
    /// Group numbers restart at 1 for every call.
    pub fn collate_comparison<C>(
        &self,
        config: &C,
        comparison: &Comparison<'_>,
        mode: CollationMode,
    ) -> Result<usize>
    where
        C: CollatorConfiguration + ?Sized,
    {
        info!(%comparison, ?mode, "collating comparison");

        let source = config.token_source();
        let base = comparison.base();
        let witness = comparison.witness();

        let base_tokens = source.tokens_of(base.text(), comparison.base_ranges())?;
        let witness_tokens = source.tokens_of(witness.text(), comparison.witness_ranges())?;

        if base_tokens.is_empty() && witness_tokens.is_empty() {
            debug!("no tokens on either side, nothing to collate");
            return Ok(0);
        }

        let diff = config.sequence_diff();
        let deltas = diff.diff(&base_tokens, &witness_tokens, config.token_comparator());
        validate_deltas(&deltas, base_tokens.len(), witness_tokens.len())?;
        debug!(
            algorithm = diff.name(),
            base_tokens = base_tokens.len(),
            witness_tokens = witness_tokens.len(),
            deltas = deltas.len(),
            "diffed"
        );

        let base_start = range_start(comparison.base_ranges(), base);
        let witness_start = range_start(comparison.witness_ranges(), witness);
        let mut alignment = Alignment::new(
            &base_tokens,
            &witness_tokens,
            GapCache::new(base.text().clone(), mode, base_start),
            GapCache::new(witness.text().clone(), mode, witness_start),
            mode,
        );

        let store = config.difference_store();
        let emitted = alignment.run(&deltas, |difference| store.add(difference))?;
        debug!(emitted, gaps = ?alignment.gaps_allocated(), "collated comparison");

        Ok(emitted)
    }
}

/// Where a side's compared content begins
fn range_start(ranges: &RangeSet, comparand: &dyn Comparand) -> usize {
    ranges.first().map_or(comparand.text_range().start, |r| r.start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparand::SimpleComparand;
    use crate::config::CollatorConfig;
    use crate::diff::{DifferenceType, Origin};
    use crate::range::Range;
    use crate::store::{DifferenceStore, MemoryDifferenceStore};
    use crate::text::Annotation;
    use crate::transposition::{Transposition, TranspositionList};
    use std::sync::Arc;

    fn config(store: &Arc<MemoryDifferenceStore>) -> CollatorConfig {
        CollatorConfig::new(store.clone())
    }

    #[test]
    fn test_identical_texts() {
        let store = Arc::new(MemoryDifferenceStore::new());
        let base = SimpleComparand::new("quick red fox");
        let witness = SimpleComparand::new("Quick red fox");

        let summary = Collator::new().collate(&config(&store), &base, &witness).unwrap();
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.transpositions(), 0);
    }

    #[test]
    fn test_empty_comparands_are_a_no_op() {
        let store = Arc::new(MemoryDifferenceStore::new());
        let base = SimpleComparand::new("");
        let witness = SimpleComparand::new("  ,; ");

        let summary = Collator::new().collate(&config(&store), &base, &witness).unwrap();
        assert_eq!(summary, CollationSummary::default());
        assert_eq!(store.pending(), 0);
    }

    #[test]
    fn test_collate_comparison_restricted_ranges() {
        let store = Arc::new(MemoryDifferenceStore::new());
        let base = SimpleComparand::new("quick red fox died");
        let witness = SimpleComparand::new("slow red box died");
        let comparison = Comparison::with_ranges(
            &base,
            &witness,
            RangeSet::single(Range::new(6, 18)),
            RangeSet::single(Range::new(5, 17)),
        );

        let emitted = Collator::new()
            .collate_comparison(&config(&store), &comparison, CollationMode::Residual)
            .unwrap();
        store.save().unwrap();

        assert_eq!(emitted, 1);
        let differences = store.differences();
        assert_eq!(differences[0].base.range(), Range::new(10, 13));
        assert_eq!(differences[0].witness.range(), Range::new(9, 12));
        assert_eq!(differences[0].group, 1);
    }

    #[test]
    fn test_transposition_sub_collation_is_tagged() {
        let store = Arc::new(MemoryDifferenceStore::new());
        let base = SimpleComparand::new("quick red fox died");
        let witness = SimpleComparand::new("red box died quickly");
        let transpositions = TranspositionList::new().with(Transposition::pair(
            Annotation::transposition(base.text().clone(), Range::new(0, 5)),
            Annotation::transposition(witness.text().clone(), Range::new(13, 20)),
        ));
        let config = config(&store).with_transposition_source(Box::new(transpositions));

        let summary = Collator::new().collate(&config, &base, &witness).unwrap();
        store.save().unwrap();

        assert_eq!(summary.residual, 1);
        assert_eq!(summary.transposed, vec![1]);
        let transposed: Vec<_> = store
            .differences()
            .into_iter()
            .filter(|d| d.origin == Origin::Transposition(0))
            .collect();
        assert_eq!(transposed.len(), 1);
        assert_eq!(transposed[0].kind, DifferenceType::Change);
        assert_eq!(transposed[0].group, 1);
    }

    #[test]
    fn test_transposed_insertion_anchors_inside_span() {
        let store = Arc::new(MemoryDifferenceStore::new());
        let base = SimpleComparand::new("a quick fox ran");
        let witness = SimpleComparand::new("a fox ran very quick");
        // the base span "quick" becomes "very quick" in the witness
        let transpositions = TranspositionList::new().with(Transposition::pair(
            Annotation::transposition(base.text().clone(), Range::new(2, 7)),
            Annotation::transposition(witness.text().clone(), Range::new(10, 20)),
        ));
        let config = config(&store).with_transposition_source(Box::new(transpositions));

        Collator::new().collate(&config, &base, &witness).unwrap();
        store.save().unwrap();

        let differences = store.differences();
        assert_eq!(differences.len(), 1);
        assert_eq!(differences[0].kind, DifferenceType::AddDel);
        assert_eq!(differences[0].origin, Origin::Transposition(0));
        assert_eq!(differences[0].base.range(), Range::point(2));
        assert_eq!(differences[0].witness.range(), Range::new(10, 14));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let base = SimpleComparand::new("quick red fox died");
        let witness = SimpleComparand::new("red box died quickly");
        let transpositions = TranspositionList::new().with(Transposition::pair(
            Annotation::transposition(base.text().clone(), Range::new(0, 5)),
            Annotation::transposition(witness.text().clone(), Range::new(13, 20)),
        ));

        let mut results = Vec::new();
        for parallel in [false, true] {
            let store = Arc::new(MemoryDifferenceStore::new());
            let config = config(&store)
                .with_transposition_source(Box::new(transpositions.clone()))
                .with_parallel(parallel);
            let summary = Collator::new().collate(&config, &base, &witness).unwrap();
            store.save().unwrap();

            let mut records: Vec<_> = store.differences().iter().map(|d| d.to_record()).collect();
            records.sort_by_key(|r| (r.origin, r.group, r.base_range, r.witness_range));
            results.push((summary, records));
        }
        assert_eq!(results[0], results[1]);
    }
}
