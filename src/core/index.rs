// --- File: src/core/index.rs
use crate::core::normalizer;
use crate::core::types::{Classification, HskLevel, VocabEntry};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Symbol → level mapping derived from a leveled word list.
///
/// Every symbol keeps the lowest level whose word list contains it. Whole
/// words are kept as well, for exact word-membership lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyIndex {
    symbols: HashMap<char, HskLevel>,
    words: HashMap<String, HskLevel>,
}

impl VocabularyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from the word list.
    ///
    /// Entries are visited level by level in ascending order, keeping the
    /// input order inside a level. A symbol already placed at a lower level is
    /// never moved up by a later word.
    pub fn build(entries: &[VocabEntry]) -> Self {
        let mut ordered: Vec<&VocabEntry> = entries.iter().collect();
        // Stable, so words of the same level keep their order.
        ordered.sort_by_key(|entry| entry.level);

        let mut index = Self::new();
        for entry in ordered {
            index.insert_word(&entry.hanzi, entry.level);
        }

        info!(
            symbols = index.symbols.len(),
            words = index.words.len(),
            "built vocabulary index"
        );
        index
    }

    /// Builds the index straight from a (symbol, level) table.
    /// The same first-seen-wins rule applies when a symbol is listed twice.
    pub fn from_symbol_levels<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (char, HskLevel)>,
    {
        let mut ordered: Vec<(char, HskLevel)> = pairs.into_iter().collect();
        ordered.sort_by_key(|&(_, level)| level);

        let mut index = Self::new();
        for (symbol, level) in ordered {
            index.insert_symbol(symbol, level);
        }

        info!(symbols = index.symbols.len(), "built index from character table");
        index
    }

    fn insert_word(&mut self, word: &str, level: HskLevel) {
        let word = word.trim();
        if word.is_empty() {
            return;
        }
        self.words.entry(word.to_string()).or_insert(level);
        for symbol in normalizer::symbols(word) {
            self.insert_symbol(symbol, level);
        }
    }

    fn insert_symbol(&mut self, symbol: char, level: HskLevel) {
        if let Entry::Vacant(slot) = self.symbols.entry(symbol) {
            debug!(%symbol, %level, "new symbol");
            slot.insert(level);
        }
    }

    /// Level of a single symbol.
    pub fn lookup(&self, symbol: char) -> Classification {
        self.symbols.get(&symbol).copied().into()
    }

    /// Level of a word by exact whole-word match, no decomposition.
    pub fn lookup_word(&self, word: &str) -> Classification {
        self.words.get(word.trim()).copied().into()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Number of symbols first introduced at each level.
    pub fn level_histogram(&self) -> BTreeMap<HskLevel, usize> {
        let mut histogram: BTreeMap<HskLevel, usize> =
            HskLevel::all().map(|level| (level, 0)).collect();
        for level in self.symbols.values() {
            *histogram.entry(*level).or_insert(0) += 1;
        }
        histogram
    }

    /// The (symbol, level) table, ordered by level then symbol.
    pub fn symbol_levels(&self) -> Vec<(char, HskLevel)> {
        let mut table: Vec<(char, HskLevel)> =
            self.symbols.iter().map(|(&symbol, &level)| (symbol, level)).collect();
        table.sort_by_key(|&(symbol, level)| (level, symbol));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::{level, toy_index, toy_vocabulary};

    #[test]
    fn test_toy_symbol_levels() {
        let index = toy_index();
        for (symbol, expected) in [('话', 1), ('给', 2), ('干', 3), ('广', 4), ('抓', 5), ('颇', 6)] {
            assert_eq!(index.lookup(symbol), Classification::Known(level(expected)));
        }
        assert_eq!(index.lookup('龟'), Classification::Unknown);
    }

    #[test]
    fn test_first_seen_wins() {
        let index = toy_index();
        // 加 is in 加油 (3) and 加班 (4); 看 is in 看 (1) and 看法 (4).
        assert_eq!(index.lookup('加'), Classification::Known(level(3)));
        assert_eq!(index.lookup('看'), Classification::Known(level(1)));
    }

    #[test]
    fn test_first_seen_wins_regardless_of_input_order() {
        let mut entries = toy_vocabulary();
        entries.reverse();
        let index = VocabularyIndex::build(&entries);
        assert_eq!(index.lookup('加'), Classification::Known(level(3)));
        assert_eq!(index.lookup('婆'), Classification::Known(level(5)));
    }

    #[test]
    fn test_every_symbol_gets_its_lowest_level() {
        let entries = toy_vocabulary();
        let index = VocabularyIndex::build(&entries);
        for entry in &entries {
            for symbol in normalizer::symbols(&entry.hanzi) {
                let indexed = index.lookup(symbol).level().unwrap();
                assert!(indexed <= entry.level);
                let lowest = entries
                    .iter()
                    .filter(|e| e.hanzi.contains(symbol))
                    .map(|e| e.level)
                    .min()
                    .unwrap();
                assert_eq!(indexed, lowest);
            }
        }
    }

    #[test]
    fn test_word_lookup_is_exact() {
        let index = toy_index();
        assert_eq!(index.lookup_word("加班"), Classification::Known(level(4)));
        assert_eq!(index.lookup_word("婆婆"), Classification::Unknown);
        assert_eq!(index.lookup_word("加"), Classification::Unknown);
    }

    #[test]
    fn test_empty_index() {
        let index = VocabularyIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.lookup('话'), Classification::Unknown);
        assert_eq!(index.lookup_word("说话"), Classification::Unknown);
    }

    #[test]
    fn test_latin_in_words_not_indexed() {
        let index = VocabularyIndex::build(&[VocabEntry::new("卡拉OK", level(5))]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup('O'), Classification::Unknown);
    }

    #[test]
    fn test_from_symbol_levels() {
        let index = VocabularyIndex::from_symbol_levels([
            ('抓', level(5)),
            ('话', level(1)),
            ('抓', level(2)),
        ]);
        assert_eq!(index.lookup('抓'), Classification::Known(level(2)));
        assert_eq!(index.lookup('话'), Classification::Known(level(1)));
        assert_eq!(index.word_count(), 0);
    }

    #[test]
    fn test_histogram_covers_all_levels() {
        let histogram = toy_index().level_histogram();
        assert_eq!(histogram.len(), 6);
        assert_eq!(histogram.values().sum::<usize>(), toy_index().len());
        assert_eq!(histogram[&level(6)], 1);
    }

    #[test]
    fn test_symbol_levels_sorted() {
        let table = toy_index().symbol_levels();
        assert!(table.windows(2).all(|pair| pair[0].1 <= pair[1].1));
        assert_eq!(table.last(), Some(&('颇', level(6))));
    }
}
