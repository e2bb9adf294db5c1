//! Character ranges and range-set algebra
//!
//! Offsets are UTF-8 byte positions into a text's content. A [`RangeSet`] is
//! always kept in compressed form: sorted, with no two ranges overlapping or
//! touching, and no empty ranges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range of text positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "range start {start} after end {end}");
        Self { start, end }
    }

    /// Create a point range (zero-width)
    pub fn point(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// True if both ranges share at least one position; empty ranges overlap nothing
    pub fn overlaps(&self, other: &Range) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    /// True if the ranges overlap or one ends exactly where the other starts
    pub fn touches(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// An ordered set of non-overlapping, non-adjacent ranges
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Range>", into = "Vec<Range>")]
pub struct RangeSet {
    ranges: Vec<Range>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    pub fn single(range: Range) -> Self {
        Self::from_ranges([range])
    }

    /// Build a set from arbitrary ranges, merging overlapping and adjacent ones
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = Range>,
    {
        Self {
            ranges: compress(ranges),
        }
    }

    /// Remove the union of `excluded` from this set, splitting ranges as needed.
    ///
    /// An empty exclusion list yields an identical copy.
    pub fn subtract<I>(&self, excluded: I) -> RangeSet
    where
        I: IntoIterator<Item = Range>,
    {
        let excluded = compress(excluded);
        if excluded.is_empty() {
            return self.clone();
        }

        let mut result = Vec::with_capacity(self.ranges.len());
        let mut next_excluded = 0;

        for range in &self.ranges {
            // Exclusions ending before this range can't affect it or any later one.
            while next_excluded < excluded.len() && excluded[next_excluded].end <= range.start {
                next_excluded += 1;
            }

            let mut cursor = range.start;
            for cut in excluded[next_excluded..].iter() {
                if cut.start >= range.end {
                    break;
                }
                if cut.start > cursor {
                    result.push(Range::new(cursor, cut.start));
                }
                cursor = cursor.max(cut.end);
                if cursor >= range.end {
                    break;
                }
            }

            if cursor < range.end {
                result.push(Range::new(cursor, range.end));
            }
        }

        RangeSet { ranges: result }
    }

    /// Sum of the lengths of all ranges
    pub fn total_len(&self) -> usize {
        self.ranges.iter().map(Range::len).sum()
    }

    /// Number of ranges in the set
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn first(&self) -> Option<&Range> {
        self.ranges.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Range> {
        self.ranges.iter()
    }

    pub fn as_slice(&self) -> &[Range] {
        &self.ranges
    }

    /// True if any range in the set overlaps `range`
    pub fn overlaps(&self, range: &Range) -> bool {
        // First candidate is the first range ending after `range` starts.
        let idx = self.ranges.partition_point(|r| r.end <= range.start);
        self.ranges.get(idx).is_some_and(|r| r.overlaps(range))
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a Range;
    type IntoIter = std::slice::Iter<'a, Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl From<Vec<Range>> for RangeSet {
    fn from(ranges: Vec<Range>) -> Self {
        Self::from_ranges(ranges)
    }
}

impl From<RangeSet> for Vec<Range> {
    fn from(set: RangeSet) -> Self {
        set.ranges
    }
}

impl FromIterator<Range> for RangeSet {
    fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
        Self::from_ranges(iter)
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{range}")?;
        }
        write!(f, "}}")
    }
}

/// Sort ranges and merge every overlapping or adjacent pair. Empty ranges are dropped.
fn compress<I>(ranges: I) -> Vec<Range>
where
    I: IntoIterator<Item = Range>,
{
    let mut sorted: Vec<Range> = ranges.into_iter().filter(|r| !r.is_empty()).collect();
    sorted.sort_unstable();

    let mut merged: Vec<Range> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if last.touches(&range) => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}
