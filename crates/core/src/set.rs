//! Collation of a whole set of witnesses

use tracing::info;

use crate::comparand::Comparand;
use crate::config::CollatorConfiguration;
use crate::engine::Collator;
use crate::error::Result;

/// Outcome of collating a comparison set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetSummary {
    /// Pairs collated
    pub pairs: usize,

    /// Differences produced across all pairs
    pub differences: usize,
}

/// Collate every unordered pair of `witnesses` once.
///
/// The earlier witness of a pair is the base. The store is saved after each
/// pair, so a failure leaves the completed pairs persisted.
pub fn collate_set<C>(
    collator: &Collator,
    config: &C,
    witnesses: &[&dyn Comparand],
) -> Result<SetSummary>
where
    C: CollatorConfiguration + ?Sized,
{
    let pairs = witnesses.len() * witnesses.len().saturating_sub(1) / 2;
    info!(witnesses = witnesses.len(), pairs, "collating set");

    let mut summary = SetSummary::default();
    for (index, base) in witnesses.iter().enumerate() {
        for witness in &witnesses[index + 1..] {
            info!(base = %base.text(), witness = %witness.text(), "collating pair");

            let collation = collator.collate(config, *base, *witness)?;
            config.difference_store().save()?;

            summary.pairs += 1;
            summary.differences += collation.total();
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparand::SimpleComparand;
    use crate::config::CollatorConfig;
    use crate::diff::Difference;
    use crate::error::CollateError;
    use crate::store::{DifferenceStore, MemoryDifferenceStore};
    use std::sync::Arc;

    #[test]
    fn test_every_pair_once_with_save() {
        let store = Arc::new(MemoryDifferenceStore::new());
        let config = CollatorConfig::new(store.clone());
        let a = SimpleComparand::new("quick red fox");
        let b = SimpleComparand::new("quick brown fox");
        let c = SimpleComparand::new("slow red fox");

        let summary = collate_set(&Collator::new(), &config, &[&a, &b, &c]).unwrap();

        assert_eq!(summary.pairs, 3);
        assert_eq!(summary.differences, 4);
        assert_eq!(store.save_count(), 3);
        assert_eq!(store.differences().len(), 4);
        assert!(store
            .differences()
            .iter()
            .all(|d| d.base.text() != d.witness.text()));
    }

    #[test]
    fn test_single_witness_has_no_pairs() {
        let store = Arc::new(MemoryDifferenceStore::new());
        let config = CollatorConfig::new(store.clone());
        let a = SimpleComparand::new("alone");

        let summary = collate_set(&Collator::new(), &config, &[&a]).unwrap();
        assert_eq!(summary, SetSummary::default());
        assert_eq!(store.save_count(), 0);
    }

    struct FailingStore;

    impl DifferenceStore for FailingStore {
        fn add(&self, _difference: Difference) -> Result<()> {
            Err(CollateError::Store("disk full".into()))
        }

        fn save(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_store_failure_propagates() {
        let config = CollatorConfig::new(Arc::new(FailingStore));
        let a = SimpleComparand::new("red");
        let b = SimpleComparand::new("blue");

        let result = collate_set(&Collator::new(), &config, &[&a, &b]);
        assert!(matches!(result, Err(CollateError::Store(_))));
    }
}
