//! Token normalization pipeline
//!
//! Chains normalizers so that each token's raw source text is turned into the
//! content used for equality and edit distance.

use std::borrow::Cow;

use crate::config::{HyphenationFilter, TokenizerConfig};
use crate::normalizers::{CollapseWhitespace, Dehyphenate, Lowercase, Normalizer};

/// An ordered chain of normalizers
#[derive(Default, Clone)]
pub struct NormalizationPipeline {
    normalizers: Vec<Box<dyn Normalizer>>,
}

impl NormalizationPipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            normalizers: Vec::new(),
        }
    }

    /// Build the pipeline implied by a tokenizer configuration
    pub fn for_config(config: &TokenizerConfig) -> Self {
        let mut pipeline = Self::new();

        match config.hyphenation {
            HyphenationFilter::IncludeAll => {}
            HyphenationFilter::FilterLinebreak => {
                pipeline = pipeline.add_normalizer(Box::new(Dehyphenate::linebreaks()));
            }
            HyphenationFilter::FilterAll => {
                pipeline = pipeline.add_normalizer(Box::new(Dehyphenate::all()));
            }
        }
        if !config.filter_whitespace {
            pipeline = pipeline.add_normalizer(Box::new(CollapseWhitespace));
        }
        if config.filter_case {
            pipeline = pipeline.add_normalizer(Box::new(Lowercase));
        }

        pipeline
    }

    /// Add a normalizer to the pipeline
    pub fn add_normalizer(mut self, normalizer: Box<dyn Normalizer>) -> Self {
        self.normalizers.push(normalizer);
        self
    }

    /// Run raw token text through every normalizer in order
    pub fn process(&self, input: &str) -> String {
        let mut current = Cow::Borrowed(input);
        for normalizer in &self.normalizers {
            let next = match normalizer.normalize(&current) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(next) => next,
            };
            current = Cow::Owned(next);
        }
        current.into_owned()
    }

    /// Get the number of normalizers in the pipeline
    pub fn len(&self) -> usize {
        self.normalizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalizers.is_empty()
    }

    /// Get the names of all normalizers in the pipeline
    pub fn normalizer_names(&self) -> Vec<String> {
        self.normalizers
            .iter()
            .map(|n| n.name().to_string())
            .collect()
    }
}
