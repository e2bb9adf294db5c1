//! Difference types and structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::range::Range;
use crate::text::{Annotation, TextId};

/// Type of difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifferenceType {
    /// A base token was replaced by a witness token
    Change,
    /// Content exists on one side only
    AddDel,
}

impl fmt::Display for DifferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifferenceType::Change => write!(f, "CHANGE"),
            DifferenceType::AddDel => write!(f, "ADD_DEL"),
        }
    }
}

/// Which collation of a call produced a difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// The comparison with transposed spans removed
    Residual,
    /// The sub-collation of the n-th transposition
    Transposition(usize),
}

/// One reported unit of disagreement between base and witness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Delta run this difference belongs to, starting at 1 per collation
    pub group: u32,

    /// Type of difference
    pub kind: DifferenceType,

    /// Collation that produced it
    pub origin: Origin,

    /// Base token, or a gap if the base has no content here
    pub base: Annotation,

    /// Witness token, or a gap if the witness has no content here
    pub witness: Annotation,

    /// Edit distance between the paired tokens, or [`Difference::NOT_APPLICABLE`]
    pub edit_distance: i32,
}

impl Difference {
    /// Edit distance of a pure insertion or deletion
    pub const NOT_APPLICABLE: i32 = -1;

    /// Edit distance, if meaningful for this difference
    pub fn distance(&self) -> Option<u32> {
        u32::try_from(self.edit_distance).ok()
    }

    /// True if either side is a zero-width gap
    pub fn has_gap(&self) -> bool {
        self.base.range().is_empty() || self.witness.range().is_empty()
    }

    /// Flatten into a serializable record
    pub fn to_record(&self) -> DifferenceRecord {
        DifferenceRecord {
            group: self.group,
            kind: self.kind,
            origin: self.origin,
            base_text: self.base.text().id(),
            base_range: self.base.range(),
            witness_text: self.witness.text().id(),
            witness_range: self.witness.range(),
            edit_distance: self.edit_distance,
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} {} <> {} ({})",
            self.kind, self.group, self.base, self.witness, self.edit_distance
        )
    }
}

/// Flat form of a [`Difference`] for persisting stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceRecord {
    pub group: u32,
    pub kind: DifferenceType,
    pub origin: Origin,
    pub base_text: TextId,
    pub base_range: Range,
    pub witness_text: TextId,
    pub witness_range: Range,
    pub edit_distance: i32,
}

impl From<&Difference> for DifferenceRecord {
    fn from(difference: &Difference) -> Self {
        difference.to_record()
    }
}

/// Statistics over a list of differences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DifferenceSummary {
    /// Number of CHANGE differences
    pub changes: usize,

    /// Number of ADD_DEL differences
    pub add_dels: usize,

    /// Distinct (origin, group) runs
    pub groups: usize,

    /// Sum of all meaningful edit distances
    pub total_edit_distance: u64,
}

impl DifferenceSummary {
    pub fn from_differences<'a, I>(differences: I) -> Self
    where
        I: IntoIterator<Item = &'a Difference>,
    {
        let mut summary = Self::default();
        let mut groups = BTreeSet::new();

        for difference in differences {
            match difference.kind {
                DifferenceType::Change => summary.changes += 1,
                DifferenceType::AddDel => summary.add_dels += 1,
            }
            groups.insert((difference.origin, difference.group));
            summary.total_edit_distance += u64::from(difference.distance().unwrap_or(0));
        }

        summary.groups = groups.len();
        summary
    }

    pub fn total(&self) -> usize {
        self.changes + self.add_dels
    }
}

impl fmt::Display for DifferenceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changes, {} additions/deletions in {} groups, edit distance {}",
            self.changes, self.add_dels, self.groups, self.total_edit_distance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{Text, TextId};

    fn difference(
        group: u32,
        kind: DifferenceType,
        origin: Origin,
        edit_distance: i32,
    ) -> Difference {
        let base = Text::with_id(TextId(1), "red fox");
        let witness = Text::with_id(TextId(2), "red box");
        let witness_annotation = match kind {
            DifferenceType::Change => Annotation::token(witness, Range::new(4, 7)),
            DifferenceType::AddDel => Annotation::gap(witness, 7),
        };
        Difference {
            group,
            kind,
            origin,
            base: Annotation::token(base, Range::new(4, 7)),
            witness: witness_annotation,
            edit_distance,
        }
    }

    #[test]
    fn test_distance_sentinel() {
        let change = difference(1, DifferenceType::Change, Origin::Residual, 1);
        assert_eq!(change.distance(), Some(1));
        assert!(!change.has_gap());

        let del = difference(
            2,
            DifferenceType::AddDel,
            Origin::Residual,
            Difference::NOT_APPLICABLE,
        );
        assert_eq!(del.distance(), None);
        assert!(del.has_gap());
    }

    #[test]
    fn test_record_serializes() {
        let record = difference(3, DifferenceType::Change, Origin::Transposition(0), 1).to_record();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"kind\":\"Change\""));
        assert!(json.contains("\"Transposition\":0"));

        let back: DifferenceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_summary_counts_groups_per_origin() {
        let differences = vec![
            difference(1, DifferenceType::Change, Origin::Residual, 2),
            difference(1, DifferenceType::AddDel, Origin::Residual, -1),
            difference(1, DifferenceType::Change, Origin::Transposition(0), 3),
            difference(2, DifferenceType::Change, Origin::Residual, 0),
        ];
        let summary = DifferenceSummary::from_differences(&differences);
        assert_eq!(summary.changes, 3);
        assert_eq!(summary.add_dels, 1);
        assert_eq!(summary.groups, 3);
        assert_eq!(summary.total_edit_distance, 5);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_display() {
        let change = difference(1, DifferenceType::Change, Origin::Residual, 1);
        assert_eq!(change.to_string(), "CHANGE #1 text #1 [4, 7) <> text #2 [4, 7) (1)");
    }
}
