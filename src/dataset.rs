// File: src/dataset.rs
//! Sentence datasets: ordered records with a hanzi cell that may be missing.

use crate::core::engine::LevelFilter;
use crate::core::types::{Classification, HskLevel};
use crate::error::LoadError;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

/// One example sentence. Any cell can be absent in the source sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceRecord {
    pub hanzi: Option<String>,
    pub pinyin: Option<String>,
    pub english: Option<String>,
}

impl SentenceRecord {
    pub fn new(hanzi: &str, pinyin: &str, english: &str) -> Self {
        Self {
            hanzi: cell(hanzi),
            pinyin: cell(pinyin),
            english: cell(english),
        }
    }

    /// All three cells are present.
    pub fn is_complete(&self) -> bool {
        self.hanzi.is_some() && self.pinyin.is_some() && self.english.is_some()
    }

    /// Card back "Hanzi - Pinyin".
    pub fn hanzi_with_pinyin(&self) -> Option<String> {
        joined(&self.hanzi, &self.pinyin)
    }

    /// Card back "Pinyin - English".
    pub fn pinyin_with_english(&self) -> Option<String> {
        joined(&self.pinyin, &self.english)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceTable {
    pub records: Vec<SentenceRecord>,
}

impl SentenceTable {
    pub fn new(records: Vec<SentenceRecord>) -> Self {
        Self { records }
    }

    /// Parses tab separated rows of `Hanzi, Pinyin, English`.
    ///
    /// Rows may carry a second sentence in columns four to six. Those are
    /// appended after all first sentences. A sentence with any empty cell is
    /// dropped, so a parsed table only holds complete records.
    pub fn parse_tsv(text: &str) -> Self {
        let mut first = Vec::new();
        let mut second = Vec::new();
        let mut incomplete = 0;
        for (number, line) in text.trim_start_matches('\u{feff}').lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let get = |i: usize| fields.get(i).copied().unwrap_or("");
            if fields.len() > 6 {
                warn!(line = number + 1, columns = fields.len(), "ignoring extra sentence columns");
            }
            for (columns, sentences) in [(0, &mut first), (3, &mut second)] {
                let record = SentenceRecord::new(get(columns), get(columns + 1), get(columns + 2));
                if record.is_complete() {
                    sentences.push(record);
                } else if record != SentenceRecord::default() {
                    incomplete += 1;
                }
            }
        }
        if incomplete > 0 {
            warn!(dropped = incomplete, "dropped sentences with empty cells");
        }
        first.extend(second);
        Self::new(first)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let table = Self::parse_tsv(&fs::read_to_string(path)?);
        info!(sentences = table.len(), path = %path.display(), "loaded sentences");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn hanzi_cells(&self) -> Vec<Option<&str>> {
        self.records.iter().map(|r| r.hanzi.as_deref()).collect()
    }

    /// Level of each record, in order. A missing hanzi cell is `Unknown`.
    pub fn classify(&self, filter: &LevelFilter<'_>) -> Vec<Classification> {
        filter.classify_cells(&self.hanzi_cells())
    }

    /// Records whose hanzi is known and at most `max_level`, order preserved.
    pub fn filter_by_level(&self, filter: &LevelFilter<'_>, max_level: HskLevel) -> SentenceTable {
        let records = self
            .records
            .iter()
            .zip(self.classify(filter))
            .filter(|(_, class)| class.is_at_most(max_level))
            .map(|(record, _)| record.clone())
            .collect();
        SentenceTable::new(records)
    }

    /// Writes the table with the two flashcard back columns appended.
    pub fn write_tsv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "Hanzi\tPinyin\tEnglish\tHanzi + Pinyin\tPinyin + English")?;
        for record in &self.records {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}",
                record.hanzi.as_deref().unwrap_or(""),
                record.pinyin.as_deref().unwrap_or(""),
                record.english.as_deref().unwrap_or(""),
                record.hanzi_with_pinyin().unwrap_or_default(),
                record.pinyin_with_english().unwrap_or_default(),
            )?;
        }
        writer.flush()
    }
}

fn cell(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

fn joined(left: &Option<String>, right: &Option<String>) -> Option<String> {
    Some(format!("{} - {}", left.as_deref()?, right.as_deref()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::{level, toy_index};
    use crate::core::types::Classification::{Known, Unknown};

    const SHEET: &str = "老师好\tlǎoshī hǎo\tHello teacher\t我们一起去厨房吧\twǒmen yìqǐ qù chúfáng ba\tLet's go to the kitchen\n\
                         \tmissing hanzi\tno text\t\t\t\n\
                         啤酒很难喝\tpíjiǔ hěn nán hē\tThe beer tastes bad\n";

    #[test]
    fn test_parse_paired_sheet() {
        let table = SentenceTable::parse_tsv(SHEET);
        assert_eq!(table.len(), 3);
        assert_eq!(table.records[0].hanzi.as_deref(), Some("老师好"));
        assert_eq!(table.records[1].hanzi.as_deref(), Some("啤酒很难喝"));
        assert_eq!(table.records[2].hanzi.as_deref(), Some("我们一起去厨房吧"));
        assert!(table.records.iter().all(SentenceRecord::is_complete));
    }

    #[test]
    fn test_incomplete_sentences_dropped() {
        let text = "你好\tnǐ hǎo\t\t老师好\tlǎoshī hǎo\tHello teacher\n\
                    啤酒\t\tbeer\n\
                    好\thǎo\tgood\t\t\t\n";
        let table = SentenceTable::parse_tsv(text);
        let hanzi: Vec<_> = table.hanzi_cells().into_iter().flatten().collect();
        assert_eq!(hanzi, vec!["好", "老师好"]);
    }

    #[test]
    fn test_missing_cells_classify_as_unknown() {
        let index = toy_index();
        let filter = LevelFilter::new(&index);
        let table = SentenceTable::new(vec![
            SentenceRecord::new("老师好", "lǎoshī hǎo", "Hello teacher"),
            SentenceRecord::new("", "missing hanzi", "no text"),
            SentenceRecord::new("看法", "kànfǎ", "view"),
        ]);
        assert_eq!(
            table.classify(&filter),
            vec![Known(level(1)), Unknown, Known(level(4))]
        );
        assert_eq!(
            SentenceTable::parse_tsv(SHEET).classify(&filter),
            vec![Known(level(1)), Known(level(3)), Known(level(4))]
        );
    }

    #[test]
    fn test_filter_keeps_records_in_order() {
        let index = toy_index();
        let filter = LevelFilter::new(&index);
        let filtered = SentenceTable::parse_tsv(SHEET).filter_by_level(&filter, level(3));
        let hanzi: Vec<_> = filtered.hanzi_cells().into_iter().flatten().collect();
        assert_eq!(hanzi, vec!["老师好", "啤酒很难喝"]);
    }

    #[test]
    fn test_write_card_columns() {
        let table = SentenceTable::new(vec![
            SentenceRecord::new("老师好", "lǎoshī hǎo", "Hello teacher"),
            SentenceRecord::new("你好", "", "Hi"),
        ]);
        let mut buffer = Vec::new();
        table.write_tsv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1],
            "老师好\tlǎoshī hǎo\tHello teacher\t老师好 - lǎoshī hǎo\tlǎoshī hǎo - Hello teacher"
        );
        assert_eq!(rows[2], "你好\t\tHi\t\t");
    }
}
