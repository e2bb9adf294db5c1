use std::time::{Duration, Instant};

use super::{deltas_from_ops, intern, Delta, SequenceDiff};
use crate::config::DiffAlgorithm;
use crate::tokenizers::{Token, TokenComparator};

/// Diff primitive backed by the `similar` crate
#[derive(Debug, Clone, Copy)]
pub struct SimilarDiff {
    algorithm: DiffAlgorithm,
    timeout: Option<Duration>,
}

impl SimilarDiff {
    pub const fn new(algorithm: DiffAlgorithm) -> Self {
        Self {
            algorithm,
            timeout: None,
        }
    }

    pub fn with_algorithm(mut self, algorithm: DiffAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn algorithm(&self) -> DiffAlgorithm {
        self.algorithm
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for SimilarDiff {
    fn default() -> Self {
        Self::new(DiffAlgorithm::default())
    }
}

impl From<DiffAlgorithm> for similar::Algorithm {
    fn from(algorithm: DiffAlgorithm) -> Self {
        match algorithm {
            DiffAlgorithm::Myers => similar::Algorithm::Myers,
            DiffAlgorithm::Patience => similar::Algorithm::Patience,
            DiffAlgorithm::Lcs => similar::Algorithm::Lcs,
        }
    }
}

impl SequenceDiff for SimilarDiff {
    fn diff(
        &self,
        base: &[Token],
        witness: &[Token],
        comparator: &dyn TokenComparator,
    ) -> Vec<Delta> {
        if base.is_empty() && witness.is_empty() {
            return Vec::new();
        }

        let (base_ids, witness_ids) = intern(base, witness, comparator);
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let ops = similar::capture_diff_slices_deadline(
            self.algorithm.into(),
            &base_ids,
            &witness_ids,
            deadline,
        );

        deltas_from_ops(&ops)
    }

    fn name(&self) -> &str {
        match self.algorithm {
            DiffAlgorithm::Myers => "myers",
            DiffAlgorithm::Patience => "patience",
            DiffAlgorithm::Lcs => "lcs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::validate_deltas;
    use crate::range::RangeSet;
    use crate::text::Text;
    use crate::tokenizers::{ContentComparator, TokenSource, WordTokenSource};

    fn create_tokens(content: &str) -> Vec<Token> {
        let text = Text::new(content);
        WordTokenSource::default()
            .tokens_of(&text, &RangeSet::single(text.full_range()))
            .unwrap()
    }

    fn deltas(algorithm: DiffAlgorithm, base: &str, witness: &str) -> Vec<Delta> {
        let base = create_tokens(base);
        let witness = create_tokens(witness);
        let deltas = SimilarDiff::new(algorithm).diff(&base, &witness, &ContentComparator);
        validate_deltas(&deltas, base.len(), witness.len()).unwrap();
        deltas
    }

    #[test]
    fn test_substitutions() {
        let d = deltas(DiffAlgorithm::Myers, "that quick red fox died", "the quick ripe box lied");
        assert_eq!(d, vec![Delta::new(0, 1, 0, 1), Delta::new(2, 3, 2, 3)]);
    }

    #[test]
    fn test_all_insertions() {
        let d = deltas(DiffAlgorithm::Myers, "", "hello world");
        assert_eq!(d, vec![Delta::new(0, 0, 0, 2)]);
    }

    #[test]
    fn test_all_deletions() {
        let d = deltas(DiffAlgorithm::Myers, "hello world", "");
        assert_eq!(d, vec![Delta::new(0, 2, 0, 0)]);
    }

    #[test]
    fn test_identical_has_no_deltas() {
        for algorithm in [DiffAlgorithm::Myers, DiffAlgorithm::Patience, DiffAlgorithm::Lcs] {
            assert!(deltas(algorithm, "quick red fox", "quick red fox").is_empty());
        }
    }

    #[test]
    fn test_algorithms_agree_on_simple_edit() {
        for algorithm in [DiffAlgorithm::Myers, DiffAlgorithm::Patience, DiffAlgorithm::Lcs] {
            let d = deltas(
                algorithm,
                "quick red fox got rabies and died",
                "the quick red fox died",
            );
            assert_eq!(d, vec![Delta::new(0, 0, 0, 1), Delta::new(3, 3, 4, 0)], "{algorithm:?}");
        }
    }
}
