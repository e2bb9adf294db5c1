//! Configuration for the collator

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::algorithm::{SequenceDiff, SimilarDiff};
use crate::store::DifferenceStore;
use crate::tokenizers::{ContentComparator, TokenComparator, TokenSource, WordTokenSource};
use crate::transposition::{NoTranspositions, TranspositionSource};

static DEFAULT_DIFF: SimilarDiff = SimilarDiff::new(DiffAlgorithm::Myers);

/// Diff algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffAlgorithm {
    /// Myers O(ND) algorithm (default, fast for small differences)
    #[default]
    Myers,
    /// Patience diff (anchors on unique tokens, more human-readable)
    Patience,
    /// Classic longest-common-subsequence table
    Lcs,
}

/// How hyphenated words are normalized before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HyphenationFilter {
    /// Hyphens are kept as part of the word
    #[default]
    IncludeAll,
    /// Words hyphenated across a line break are joined
    FilterLinebreak,
    /// Every two-part hyphenated word is joined
    FilterAll,
}

/// Tokenization and normalization options for the built-in token source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Drop whitespace instead of emitting it as tokens
    pub filter_whitespace: bool,
    /// Drop punctuation instead of emitting it as tokens
    pub filter_punctuation: bool,
    /// Compare tokens case-insensitively
    pub filter_case: bool,
    /// Hyphenation handling
    pub hyphenation: HyphenationFilter,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            filter_whitespace: true,
            filter_punctuation: true,
            filter_case: true,
            hyphenation: HyphenationFilter::default(),
        }
    }
}

impl TokenizerConfig {
    pub fn with_filter_whitespace(mut self, filter: bool) -> Self {
        self.filter_whitespace = filter;
        self
    }

    pub fn with_filter_punctuation(mut self, filter: bool) -> Self {
        self.filter_punctuation = filter;
        self
    }

    pub fn with_filter_case(mut self, filter: bool) -> Self {
        self.filter_case = filter;
        self
    }

    pub fn with_hyphenation(mut self, hyphenation: HyphenationFilter) -> Self {
        self.hyphenation = hyphenation;
        self
    }
}

/// The collaborators a collation call works with.
///
/// Implement this directly to wire custom collaborators, or use
/// [`CollatorConfig`].
pub trait CollatorConfiguration: Send + Sync {
    /// Tokenizes the texts being compared
    fn token_source(&self) -> &dyn TokenSource;

    /// Supplies transposition candidates for a comparison
    fn transposition_source(&self) -> &dyn TranspositionSource;

    /// Decides which tokens count as the same symbol
    fn token_comparator(&self) -> &dyn TokenComparator;

    /// Receives every difference produced
    fn difference_store(&self) -> &dyn DifferenceStore;

    /// The sequence diff primitive
    fn sequence_diff(&self) -> &dyn SequenceDiff {
        &DEFAULT_DIFF
    }

    /// Whether independent collations of one call may run concurrently
    fn parallel(&self) -> bool {
        false
    }
}

/// Configuration for collation
pub struct CollatorConfig {
    /// Token source (defaults to [`WordTokenSource`])
    pub(crate) token_source: Box<dyn TokenSource>,

    /// Transposition source (defaults to none)
    pub(crate) transposition_source: Box<dyn TranspositionSource>,

    /// Token comparator (defaults to content order)
    pub(crate) comparator: Box<dyn TokenComparator>,

    /// Built-in diff settings
    pub(crate) diff: SimilarDiff,

    /// Replaces the built-in diff when set
    pub(crate) custom_diff: Option<Box<dyn SequenceDiff>>,

    /// Run sub-collations concurrently
    pub(crate) parallel: bool,

    /// Sink for differences
    pub(crate) store: Arc<dyn DifferenceStore>,
}

impl CollatorConfig {
    /// Create a default configuration writing to `store`
    pub fn new(store: Arc<dyn DifferenceStore>) -> Self {
        Self {
            token_source: Box::new(WordTokenSource::default()),
            transposition_source: Box::new(NoTranspositions),
            comparator: Box::new(ContentComparator),
            diff: SimilarDiff::new(DiffAlgorithm::default()),
            custom_diff: None,
            parallel: false,
            store,
        }
    }

    /// Set the token source
    pub fn with_token_source(mut self, source: Box<dyn TokenSource>) -> Self {
        self.token_source = source;
        self
    }

    /// Use the built-in word token source with the given options
    pub fn with_tokenizer(self, config: TokenizerConfig) -> Self {
        self.with_token_source(Box::new(WordTokenSource::new(config)))
    }

    /// Set the transposition source
    pub fn with_transposition_source(mut self, source: Box<dyn TranspositionSource>) -> Self {
        self.transposition_source = source;
        self
    }

    /// Set the token comparator
    pub fn with_token_comparator(mut self, comparator: Box<dyn TokenComparator>) -> Self {
        self.comparator = comparator;
        self
    }

    /// Set the diff algorithm
    pub fn with_algorithm(mut self, algorithm: DiffAlgorithm) -> Self {
        self.diff = self.diff.with_algorithm(algorithm);
        self
    }

    /// Give up refining a diff after `timeout`; the result stays valid but may be less minimal
    pub fn with_diff_timeout(mut self, timeout: Duration) -> Self {
        self.diff = self.diff.with_timeout(timeout);
        self
    }

    /// Replace the diff primitive entirely
    pub fn with_sequence_diff(mut self, diff: Box<dyn SequenceDiff>) -> Self {
        self.custom_diff = Some(diff);
        self
    }

    /// Run the residual and transposition collations concurrently
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the difference store
    pub fn with_store(mut self, store: Arc<dyn DifferenceStore>) -> Self {
        self.store = store;
        self
    }
}

impl CollatorConfiguration for CollatorConfig {
    fn token_source(&self) -> &dyn TokenSource {
        self.token_source.as_ref()
    }

    fn transposition_source(&self) -> &dyn TranspositionSource {
        self.transposition_source.as_ref()
    }

    fn token_comparator(&self) -> &dyn TokenComparator {
        self.comparator.as_ref()
    }

    fn difference_store(&self) -> &dyn DifferenceStore {
        self.store.as_ref()
    }

    fn sequence_diff(&self) -> &dyn SequenceDiff {
        match &self.custom_diff {
            Some(diff) => diff.as_ref(),
            None => &self.diff,
        }
    }

    fn parallel(&self) -> bool {
        self.parallel
    }
}

impl fmt::Debug for CollatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollatorConfig")
            .field("token_source", &self.token_source.name())
            .field("diff", &self.diff)
            .field("custom_diff", &self.custom_diff.is_some())
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}
