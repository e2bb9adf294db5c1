//! Delta alignment
//!
//! Walks the base and witness token lists with one cursor each, turning the
//! deltas of a sequence diff into token-level differences. Unchanged runs
//! between deltas are stepped over pairwise so each delta's indices line up
//! with the cursors when it is reached.

use tracing::{debug, trace};

use crate::algorithm::Delta;
use crate::diff::{Difference, DifferenceType};
use crate::error::Result;
use crate::gap::{CollationMode, GapCache};
use crate::text::Annotation;
use crate::tokenizers::Token;

/// What the cursor walk does next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Both cursors are in the unchanged run before the delta
    Aligned,
    /// Both sides have tokens left in the delta
    Change,
    /// Only the base has tokens left in the delta
    Deleted,
    /// Only the witness has tokens left in the delta
    Added,
}

impl Step {
    fn next(i: usize, j: usize, delta: &Delta) -> Step {
        if i < delta.base_start && j < delta.witness_start {
            Step::Aligned
        } else if i < delta.base_end() && j < delta.witness_end() {
            Step::Change
        } else if i < delta.base_end() {
            Step::Deleted
        } else {
            Step::Added
        }
    }
}

/// Token lists and gap factories for one collation
pub struct Alignment<'t> {
    base: &'t [Token],
    witness: &'t [Token],
    base_gaps: GapCache,
    witness_gaps: GapCache,
    mode: CollationMode,
}

impl<'t> Alignment<'t> {
    pub fn new(
        base: &'t [Token],
        witness: &'t [Token],
        base_gaps: GapCache,
        witness_gaps: GapCache,
        mode: CollationMode,
    ) -> Self {
        Self {
            base,
            witness,
            base_gaps,
            witness_gaps,
            mode,
        }
    }

    /// Emit one difference per token inside a delta, in delta order.
    ///
    /// Deltas must already be validated against the token lists. Returns the
    /// number of differences emitted.
    pub fn run<F>(&mut self, deltas: &[Delta], mut emit: F) -> Result<usize>
    where
        F: FnMut(Difference) -> Result<()>,
    {
        let mut i = 0;
        let mut j = 0;
        let mut group = 0u32;
        let mut emitted = 0;

        for delta in deltas {
            group += 1;
            debug!(group, ?delta, "aligning delta");

            while i < delta.base_end() || j < delta.witness_end() {
                let (base, witness, kind, edit_distance) = match Step::next(i, j, delta) {
                    Step::Aligned => {
                        trace!(i, j, "aligned");
                        i += 1;
                        j += 1;
                        continue;
                    }
                    Step::Change => {
                        let (b, w) = (&self.base[i], &self.witness[j]);
                        let distance = i32::try_from(b.edit_distance_to(w)).unwrap_or(i32::MAX);
                        i += 1;
                        j += 1;
                        (
                            b.annotation().clone(),
                            w.annotation().clone(),
                            DifferenceType::Change,
                            distance,
                        )
                    }
                    Step::Deleted => {
                        let gap = self.witness_gaps.gap(self.witness, j);
                        let b = self.base[i].annotation().clone();
                        i += 1;
                        let distance = add_del_distance(&b, &gap);
                        (b, gap, DifferenceType::AddDel, distance)
                    }
                    Step::Added => {
                        let gap = self.base_gaps.gap(self.base, i);
                        let w = self.witness[j].annotation().clone();
                        j += 1;
                        let distance = add_del_distance(&gap, &w);
                        (gap, w, DifferenceType::AddDel, distance)
                    }
                };

                emit(Difference {
                    group,
                    kind,
                    origin: self.mode.origin(),
                    base,
                    witness,
                    edit_distance,
                })?;
                emitted += 1;
            }
        }

        Ok(emitted)
    }

    /// Gaps allocated on the (base, witness) side
    pub fn gaps_allocated(&self) -> (usize, usize) {
        (self.base_gaps.allocated(), self.witness_gaps.allocated())
    }
}

fn add_del_distance(base: &Annotation, witness: &Annotation) -> i32 {
    if base.range().is_empty() || witness.range().is_empty() {
        Difference::NOT_APPLICABLE
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Origin;
    use crate::range::Range;
    use crate::text::Text;
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Text of `count` two-letter words separated by spaces, tokenized
    fn synthetic(count: usize, letter: char) -> (Text, Vec<Token>) {
        let text = Text::new(vec![format!("{letter}{letter}"); count].join(" "));
        let tokens = (0..count)
            .map(|k| {
                let range = Range::new(k * 3, k * 3 + 2);
                Token::new(Annotation::token(text.clone(), range), format!("{letter}{k}"))
            })
            .collect();
        (text, tokens)
    }

    fn align(
        base_count: usize,
        witness_count: usize,
        deltas: &[Delta],
        mode: CollationMode,
    ) -> (Vec<Difference>, Vec<Token>, Vec<Token>) {
        let (base_text, base) = synthetic(base_count, 'b');
        let (witness_text, witness) = synthetic(witness_count, 'w');
        let mut alignment = Alignment::new(
            &base,
            &witness,
            GapCache::new(base_text, mode, 0),
            GapCache::new(witness_text, mode, 0),
            mode,
        );
        let mut out = Vec::new();
        alignment
            .run(deltas, |d| {
                out.push(d);
                Ok(())
            })
            .unwrap();
        (out, base, witness)
    }

    #[test]
    fn test_substitution_runs() {
        let deltas = [Delta::new(0, 1, 0, 1), Delta::new(2, 3, 2, 3)];
        let (diffs, _, _) = align(5, 5, &deltas, CollationMode::Residual);

        assert_eq!(diffs.len(), 4);
        assert!(diffs.iter().all(|d| d.kind == DifferenceType::Change));
        let groups: Vec<u32> = diffs.iter().map(|d| d.group).collect();
        assert_eq!(groups, vec![1, 2, 2, 2]);
        assert_eq!(diffs[1].base.range(), Range::new(6, 8));
        assert_eq!(diffs[1].witness.range(), Range::new(6, 8));
    }

    #[test]
    fn test_uneven_delta_pairs_then_gaps() {
        // three base tokens replaced by one witness token
        let (diffs, _, _) = align(4, 2, &[Delta::new(1, 3, 1, 1)], CollationMode::Residual);

        let kinds: Vec<DifferenceType> = diffs.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DifferenceType::Change, DifferenceType::AddDel, DifferenceType::AddDel]
        );
        // witness gaps follow the last consumed witness token
        assert_eq!(diffs[1].witness.range(), Range::point(5));
        assert_eq!(diffs[2].witness, diffs[1].witness);
        assert!(diffs[1..].iter().all(|d| d.edit_distance == -1));
    }

    #[test]
    fn test_insertion_into_empty_base() {
        let (diffs, _, _) = align(0, 3, &[Delta::new(0, 0, 0, 3)], CollationMode::Residual);
        assert_eq!(diffs.len(), 3);
        for d in &diffs {
            assert_eq!(d.kind, DifferenceType::AddDel);
            assert_eq!(d.group, 1);
            assert_eq!(d.base.range(), Range::point(0));
            assert_eq!(d.edit_distance, Difference::NOT_APPLICABLE);
        }
    }

    #[test]
    fn test_transposition_gap_anchors_at_first_token() {
        let deltas = [Delta::new(0, 0, 0, 1)];
        let (diffs, base, _) = align(2, 3, &deltas, CollationMode::Transposition(4));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].base.range(), Range::point(base[0].range().start));
        assert_eq!(diffs[0].origin, Origin::Transposition(4));
    }

    #[test]
    fn test_no_deltas_no_differences() {
        let (diffs, _, _) = align(3, 3, &[], CollationMode::Residual);
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_emit_error_aborts() {
        let (base_text, base) = synthetic(2, 'b');
        let (witness_text, witness) = synthetic(2, 'w');
        let mode = CollationMode::Residual;
        let mut alignment = Alignment::new(
            &base,
            &witness,
            GapCache::new(base_text, mode, 0),
            GapCache::new(witness_text, mode, 0),
            mode,
        );
        let mut calls = 0;
        let result = alignment.run(&[Delta::new(0, 2, 0, 2)], |_| {
            calls += 1;
            Err(crate::error::CollateError::Store("full".into()))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    /// Valid delta lists: (unchanged run, base len, witness len) triples
    fn arb_deltas() -> impl Strategy<Value = (Vec<Delta>, usize, usize)> {
        prop::collection::vec((0usize..3, 0usize..4, 0usize..4), 0..8).prop_flat_map(|runs| {
            let mut deltas = Vec::new();
            let (mut b, mut w) = (0, 0);
            for (gap, base_len, witness_len) in runs {
                let (base_len, witness_len) = if base_len + witness_len == 0 {
                    (1, 0)
                } else {
                    (base_len, witness_len)
                };
                b += gap;
                w += gap;
                deltas.push(Delta::new(b, base_len, w, witness_len));
                b += base_len;
                w += witness_len;
            }
            (0usize..3).prop_map(move |tail| (deltas.clone(), b + tail, w + tail))
        })
    }

    proptest! {
        #[test]
        fn prop_tokens_in_deltas_appear_exactly_once(
            (deltas, base_count, witness_count) in arb_deltas(),
        ) {
            crate::algorithm::validate_deltas(&deltas, base_count, witness_count).unwrap();
            let (diffs, base, witness) =
                align(base_count, witness_count, &deltas, CollationMode::Residual);

            let mut seen: HashMap<(bool, Range), usize> = HashMap::new();
            for d in &diffs {
                if !d.base.is_gap() {
                    *seen.entry((true, d.base.range())).or_default() += 1;
                }
                if !d.witness.is_gap() {
                    *seen.entry((false, d.witness.range())).or_default() += 1;
                }
            }

            for (k, token) in base.iter().enumerate() {
                let in_delta = deltas.iter().any(|d| (d.base_start..d.base_end()).contains(&k));
                let count = seen.get(&(true, token.range())).copied().unwrap_or(0);
                prop_assert_eq!(count, usize::from(in_delta));
            }
            for (k, token) in witness.iter().enumerate() {
                let in_delta =
                    deltas.iter().any(|d| (d.witness_start..d.witness_end()).contains(&k));
                let count = seen.get(&(false, token.range())).copied().unwrap_or(0);
                prop_assert_eq!(count, usize::from(in_delta));
            }
        }

        #[test]
        fn prop_groups_follow_deltas((deltas, base_count, witness_count) in arb_deltas()) {
            let (diffs, _, _) = align(base_count, witness_count, &deltas, CollationMode::Residual);

            prop_assert!(diffs.windows(2).all(|w| w[0].group <= w[1].group));
            for (g, delta) in deltas.iter().enumerate() {
                let in_group = diffs.iter().filter(|d| d.group == g as u32 + 1).count();
                prop_assert_eq!(in_group, delta.base_len.max(delta.witness_len));
            }
        }

        #[test]
        fn prop_distance_sentinel_and_gap_bounds(
            (deltas, base_count, witness_count) in arb_deltas(),
        ) {
            let (diffs, _, _) = align(base_count, witness_count, &deltas, CollationMode::Residual);
            for d in &diffs {
                match d.kind {
                    DifferenceType::Change => prop_assert!(d.edit_distance >= 0),
                    DifferenceType::AddDel => prop_assert_eq!(d.edit_distance, -1),
                }
                for side in [&d.base, &d.witness] {
                    prop_assert!(side.range().end <= side.text().len());
                }
            }
        }
    }
}
