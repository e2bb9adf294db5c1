//! # Collate Core
//!
//! Token-level collation of textual witnesses. Two versions of a text are
//! tokenized, diffed, and the diff is turned into a stream of differences
//! carrying character ranges in both texts. Spans known to be transposed are
//! carved out of the main comparison and collated on their own.
//!
//! ## Core Concepts
//!
//! - **Comparands**: a text plus the range of it taking part in a comparison
//! - **Comparisons**: base and witness comparands restricted to range sets
//! - **Token sources**: turn a text and a range set into ordered tokens
//! - **Collator**: aligns the diff of two token lists into [`Difference`]s
//! - **Difference stores**: sinks receiving the differences
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use collate_core::{Collator, CollatorConfig, MemoryDifferenceStore, SimpleComparand};
//! use collate_core::store::DifferenceStore;
//!
//! let store = Arc::new(MemoryDifferenceStore::new());
//! let config = CollatorConfig::new(store.clone());
//!
//! let base = SimpleComparand::new("that quick red fox died");
//! let witness = SimpleComparand::new("the quick ripe box lied");
//! Collator::new().collate(&config, &base, &witness).unwrap();
//! store.save().unwrap();
//!
//! assert_eq!(store.differences().len(), 4);
//! ```

pub mod algorithm;
pub mod alignment;
pub mod comparand;
pub mod comparison;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod gap;
pub mod metrics;
pub mod normalizers;
pub mod pipeline;
pub mod range;
pub mod set;
pub mod store;
pub mod text;
pub mod tokenizers;
pub mod transposition;

// Re-export main types
pub use comparand::{Comparand, FragmentComparand, SimpleComparand};
pub use comparison::Comparison;
pub use config::{
    CollatorConfig, CollatorConfiguration, DiffAlgorithm, HyphenationFilter, TokenizerConfig,
};
pub use diff::{Difference, DifferenceRecord, DifferenceSummary, DifferenceType, Origin};
pub use engine::{CollationSummary, Collator};
pub use error::{CollateError, Result};
pub use range::{Range, RangeSet};
pub use set::{collate_set, SetSummary};
pub use store::{DifferenceStore, MemoryDifferenceStore};
pub use text::{Annotation, AnnotationKind, Text, TextId};
pub use transposition::{Transposition, TranspositionList, TranspositionSource};

use std::sync::Arc;

/// Collate two strings with the default configuration
///
/// # Arguments
///
/// * `base` - The base text
/// * `witness` - The witness text
///
/// # Returns
///
/// Every difference found, in emission order
///
/// # Example
///
/// ```rust
/// use collate_core::collate;
///
/// let differences = collate("quick red fox", "quick brown fox").unwrap();
/// assert_eq!(differences.len(), 1);
/// ```
pub fn collate(base: &str, witness: &str) -> Result<Vec<Difference>> {
    let store = Arc::new(MemoryDifferenceStore::new());
    let config = CollatorConfig::new(store.clone());

    Collator::new().collate(&config, &SimpleComparand::new(base), &SimpleComparand::new(witness))?;
    store.save()?;

    Ok(store.drain())
}
