use crate::core::classifier::LevelClassifier;
use crate::core::index::VocabularyIndex;
use crate::core::types::{Classification, HskLevel};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// What `filter_by_level` hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnMode {
    Values,
    Indices,
    Mask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filtered<'a> {
    /// Passing spans, in their original order.
    Values(Vec<&'a str>),
    /// Original positions of passing spans, ascending.
    Indices(Vec<usize>),
    /// One flag per input span.
    Mask(Vec<bool>),
}

/// Word counts per classification, as produced by `count_by_level`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelCounts {
    counts: BTreeMap<Classification, usize>,
}

impl LevelCounts {
    pub fn get(&self, classification: Classification) -> usize {
        self.counts.get(&classification).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Non-zero counts, levels ascending with `Unknown` last.
    pub fn iter(&self) -> impl Iterator<Item = (Classification, usize)> + '_ {
        self.counts.iter().map(|(&class, &count)| (class, count))
    }

    /// Non-zero counts, most frequent first. Ties keep level order.
    pub fn most_common(&self) -> Vec<(Classification, usize)> {
        let mut ranked: Vec<(Classification, usize)> = self.iter().collect();
        ranked.sort_by_key(|&(_, count)| std::cmp::Reverse(count));
        ranked
    }

    fn record(&mut self, classification: Classification) {
        *self.counts.entry(classification).or_insert(0) += 1;
    }
}

/// Batch classification, counting and filtering over collections of spans.
///
/// Per-item failures never abort a batch: an empty or missing span is
/// recorded as `Unknown` and the remaining items are still processed.
#[derive(Debug, Clone, Copy)]
pub struct LevelFilter<'a> {
    classifier: LevelClassifier<'a>,
    parallel_threshold: usize,
}

impl<'a> LevelFilter<'a> {
    pub fn new(index: &'a VocabularyIndex) -> Self {
        Self {
            classifier: LevelClassifier::new(index),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Batches at least this long are classified on the rayon pool.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    pub fn classifier(&self) -> LevelClassifier<'a> {
        self.classifier
    }

    /// Classifies every span, keeping input order and length.
    pub fn classify_column<S>(&self, spans: &[S]) -> Vec<Classification>
    where
        S: AsRef<str> + Sync,
    {
        self.map_spans(spans, |classifier, span| {
            classifier.classify_span_or_unknown(span.as_ref())
        })
    }

    /// Like `classify_column` over cells that may be missing.
    /// A missing cell is `Unknown`.
    pub fn classify_cells<S>(&self, cells: &[Option<S>]) -> Vec<Classification>
    where
        S: AsRef<str> + Sync,
    {
        self.map_spans(cells, |classifier, cell| match cell {
            Some(span) => classifier.classify_span_or_unknown(span.as_ref()),
            None => Classification::Unknown,
        })
    }

    /// Counts words by exact whole-word membership in the vocabulary.
    /// Words missing from the list are counted under `Unknown`.
    pub fn count_by_level<S>(&self, words: &[S]) -> LevelCounts
    where
        S: AsRef<str>,
    {
        let index = self.classifier.index();
        let mut counts = LevelCounts::default();
        for word in words {
            counts.record(index.lookup_word(word.as_ref()));
        }
        debug!(words = words.len(), unknown = counts.get(Classification::Unknown), "counted words");
        counts
    }

    /// Keeps spans whose level is known and at most `max_level`.
    pub fn filter_by_level<'s, S>(
        &self,
        spans: &'s [S],
        max_level: HskLevel,
        mode: ReturnMode,
    ) -> Filtered<'s>
    where
        S: AsRef<str> + Sync,
    {
        let mask = self.level_mask(spans, max_level);
        match mode {
            ReturnMode::Values => Filtered::Values(
                spans
                    .iter()
                    .zip(&mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(span, _)| span.as_ref())
                    .collect(),
            ),
            ReturnMode::Indices => Filtered::Indices(
                mask.iter()
                    .enumerate()
                    .filter(|(_, keep)| **keep)
                    .map(|(position, _)| position)
                    .collect(),
            ),
            ReturnMode::Mask => Filtered::Mask(mask),
        }
    }

    /// One flag per span: does it pass the level filter.
    pub fn level_mask<S>(&self, spans: &[S], max_level: HskLevel) -> Vec<bool>
    where
        S: AsRef<str> + Sync,
    {
        let mask: Vec<bool> = self
            .classify_column(spans)
            .into_iter()
            .map(|class| class.is_at_most(max_level))
            .collect();
        debug!(
            spans = spans.len(),
            kept = mask.iter().filter(|keep| **keep).count(),
            %max_level,
            "filtered spans"
        );
        mask
    }

    fn map_spans<T, F>(&self, items: &[T], classify: F) -> Vec<Classification>
    where
        T: Sync,
        F: Fn(&LevelClassifier<'a>, &T) -> Classification + Sync,
    {
        let classifier = &self.classifier;
        if items.len() >= self.parallel_threshold {
            items.par_iter().map(|item| classify(classifier, item)).collect()
        } else {
            items.iter().map(|item| classify(classifier, item)).collect()
        }
    }
}
