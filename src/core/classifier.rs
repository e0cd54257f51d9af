// File: src/core/classifier.rs
use crate::core::index::VocabularyIndex;
use crate::core::normalizer;
use crate::core::types::Classification;
use crate::error::ClassifyError;

/// Computes levels of symbols and spans against a shared index.
#[derive(Debug, Clone, Copy)]
pub struct LevelClassifier<'a> {
    index: &'a VocabularyIndex,
}

impl<'a> LevelClassifier<'a> {
    pub fn new(index: &'a VocabularyIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &'a VocabularyIndex {
        self.index
    }

    pub fn classify_symbol(&self, symbol: char) -> Classification {
        self.index.lookup(symbol)
    }

    /// Level of a word or sentence: the highest level among its symbols.
    ///
    /// Any unseen symbol makes the whole span `Unknown`. A span left with no
    /// symbols after normalization is an `EmptySpan` error.
    pub fn classify_span(&self, text: &str) -> Result<Classification, ClassifyError> {
        normalizer::symbols(text)
            .map(|symbol| self.classify_symbol(symbol))
            .max()
            .ok_or_else(|| ClassifyError::EmptySpan(text.to_string()))
    }

    /// Same as `classify_span`, with an empty span reported as `Unknown`.
    pub fn classify_span_or_unknown(&self, text: &str) -> Classification {
        self.classify_span(text).unwrap_or(Classification::Unknown)
    }

    /// Per-symbol breakdown of a span, in reading order.
    pub fn classify_symbols(&self, text: &str) -> Vec<(char, Classification)> {
        normalizer::symbols(text)
            .map(|symbol| (symbol, self.classify_symbol(symbol)))
            .collect()
    }
}
