use std::cmp::Ordering;

use crate::tokenizers::{Token, TokenComparator};

/// Map both token lists onto dense symbol ids.
///
/// Tokens the comparator orders as `Equal` share an id, so the diff compares
/// integers instead of token contents.
pub fn intern(
    base: &[Token],
    witness: &[Token],
    comparator: &dyn TokenComparator,
) -> (Vec<u32>, Vec<u32>) {
    let all: Vec<&Token> = base.iter().chain(witness.iter()).collect();

    let mut order: Vec<usize> = (0..all.len()).collect();
    order.sort_by(|&a, &b| comparator.compare(all[a], all[b]));

    let mut ids = vec![0u32; all.len()];
    let mut next_id = 0u32;
    for (pos, &idx) in order.iter().enumerate() {
        if pos > 0 && comparator.compare(all[order[pos - 1]], all[idx]) != Ordering::Equal {
            next_id += 1;
        }
        ids[idx] = next_id;
    }

    let witness_ids = ids.split_off(base.len());
    (ids, witness_ids)
}
