//! Transposition candidates and their sources

use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt;

use crate::comparison::Comparison;
use crate::error::Result;
use crate::text::Annotation;

/// A span moved between base and witness.
///
/// Links at most one annotation per text. Annotations are kept sorted, so two
/// transpositions holding the same annotations compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transposition(SmallVec<[Annotation; 2]>);

impl Transposition {
    pub fn new<I>(annotations: I) -> Self
    where
        I: IntoIterator<Item = Annotation>,
    {
        let mut annotations: SmallVec<[Annotation; 2]> = annotations.into_iter().collect();
        annotations.sort();
        annotations.dedup();
        Self(annotations)
    }

    /// Transposition linking one base span with one witness span
    pub fn pair(base: Annotation, witness: Annotation) -> Self {
        Self::new([base, witness])
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Transposition {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Transposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, annotation) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{annotation}")?;
        }
        write!(f, "}}")
    }
}

/// Trait for collaborators that know which spans were transposed
pub trait TranspositionSource: Send + Sync {
    /// Transposition candidates found within `comparison`
    fn transpositions_in(&self, comparison: &Comparison<'_>) -> Result<Vec<Transposition>>;
}

/// Source reporting no transpositions
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranspositions;

impl TranspositionSource for NoTranspositions {
    fn transpositions_in(&self, _comparison: &Comparison<'_>) -> Result<Vec<Transposition>> {
        Ok(Vec::new())
    }
}

/// In-memory transposition source.
///
/// Reports the stored candidates with an annotation on the comparison's
/// witness text that overlaps its witness ranges.
#[derive(Debug, Clone, Default)]
pub struct TranspositionList {
    transpositions: BTreeSet<Transposition>,
}

impl TranspositionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a candidate; duplicates collapse
    pub fn add(&mut self, transposition: Transposition) -> bool {
        self.transpositions.insert(transposition)
    }

    pub fn with(mut self, transposition: Transposition) -> Self {
        self.add(transposition);
        self
    }

    pub fn len(&self) -> usize {
        self.transpositions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transpositions.is_empty()
    }
}

impl FromIterator<Transposition> for TranspositionList {
    fn from_iter<I: IntoIterator<Item = Transposition>>(iter: I) -> Self {
        Self {
            transpositions: iter.into_iter().collect(),
        }
    }
}

impl TranspositionSource for TranspositionList {
    fn transpositions_in(&self, comparison: &Comparison<'_>) -> Result<Vec<Transposition>> {
        let witness_text = comparison.witness().text();
        let witness_ranges = comparison.witness_ranges();

        let found = self
            .transpositions
            .iter()
            .filter(|t| {
                t.annotations().iter().any(|a| {
                    a.text() == witness_text
                        && (witness_ranges.is_empty() || witness_ranges.overlaps(&a.range()))
                })
            })
            .cloned()
            .collect();

        Ok(found)
    }
}
