// File: src/vocabulary.rs
//! Readers and writers for the word list and the character table.
//!
//! Malformed lines are skipped with a warning. A bad row never fails the
//! whole load, so the index can still be built from whatever was readable.

use crate::core::index::VocabularyIndex;
use crate::core::types::{HskLevel, VocabEntry};
use crate::error::LoadError;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

const BOM: char = '\u{feff}';

/// Parses one level's word list.
///
/// Lines are tab separated: `Hanzi, Traditional, Coded Pinyin, Pinyin, English`.
/// Only the first column is required.
pub fn parse_level_list(text: &str, level: HskLevel) -> Vec<VocabEntry> {
    let mut entries = Vec::new();
    for (number, line) in lines(text) {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let hanzi = fields[0];
        if hanzi.is_empty() {
            warn!(line = number, "skipping word list row without hanzi");
            continue;
        }
        entries.push(VocabEntry {
            hanzi: hanzi.to_string(),
            level,
            traditional: field(&fields, 1),
            pinyin: field(&fields, 3),
            english: field(&fields, 4),
        });
    }
    entries
}

/// Column positions of a combined word table.
#[derive(Debug, Clone, Copy)]
struct WordColumns {
    hanzi: usize,
    traditional: Option<usize>,
    pinyin: Option<usize>,
    english: Option<usize>,
    // `None` means the last column of each row.
    level: Option<usize>,
}

impl WordColumns {
    // Headerless layout: Hanzi, Traditional, Coded Pinyin, Pinyin, English, Level.
    fn positional() -> Self {
        Self {
            hanzi: 0,
            traditional: Some(1),
            pinyin: Some(3),
            english: Some(4),
            level: None,
        }
    }

    /// Column names, matched case-insensitively. `Hanzi` and `Level` are required.
    fn from_header(header: &csv::StringRecord) -> Option<Self> {
        let find = |name: &str| header.iter().position(|cell| cell.eq_ignore_ascii_case(name));
        Some(Self {
            hanzi: find("hanzi")?,
            traditional: find("traditional"),
            pinyin: find("pinyin"),
            english: find("english"),
            level: Some(find("level")?),
        })
    }

    fn level_position(&self, record: &csv::StringRecord) -> usize {
        self.level.unwrap_or(record.len().saturating_sub(1))
    }
}

/// Parses a combined tab separated word table.
///
/// With a header row, columns are found by name; without one the level is
/// the last column and the rest follow the level list layout.
pub fn parse_vocabulary_table(text: &str) -> Vec<VocabEntry> {
    parse_word_table(text, b'\t')
}

/// Parses a combined comma separated word table with quoted fields, such as
/// a spreadsheet export with a leading index column.
pub fn parse_vocabulary_csv(text: &str) -> Vec<VocabEntry> {
    parse_word_table(text, b',')
}

fn parse_word_table(text: &str, delimiter: u8) -> Vec<VocabEntry> {
    let mut columns = WordColumns::positional();
    let mut entries = Vec::new();
    for (row, result) in table_reader(text, delimiter).records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "skipping unreadable word list row");
                continue;
            }
        };
        let number = record.position().map_or(row as u64 + 1, |p| p.line());
        if row == 0 {
            if let Some(header) = WordColumns::from_header(&record) {
                columns = header;
                continue;
            }
        }

        let level_position = columns.level_position(&record);
        let Some(level) = record.get(level_position).and_then(parse_level) else {
            warn!(line = number, "skipping word list row with invalid level");
            continue;
        };
        let hanzi = record.get(columns.hanzi).unwrap_or("");
        if hanzi.is_empty() || columns.hanzi == level_position {
            warn!(line = number, "skipping word list row without hanzi");
            continue;
        }
        let cell = |position: Option<usize>| {
            position
                .filter(|p| *p != level_position)
                .and_then(|p| record.get(p))
                .unwrap_or("")
                .to_string()
        };
        entries.push(VocabEntry {
            hanzi: hanzi.to_string(),
            level,
            traditional: cell(columns.traditional),
            pinyin: cell(columns.pinyin),
            english: cell(columns.english),
        });
    }
    entries
}

fn table_reader(text: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        // Pinyin in tab separated lists may carry stray quote marks.
        .quoting(delimiter == b',')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.trim_start_matches(BOM).as_bytes())
}

pub fn load_level_file(path: impl AsRef<Path>, level: HskLevel) -> Result<Vec<VocabEntry>, LoadError> {
    let text = fs::read_to_string(path)?;
    Ok(parse_level_list(&text, level))
}

/// Loads every `*L<n>.txt` file of a directory, `n` being the HSK level.
pub fn load_level_directory(dir: impl AsRef<Path>) -> Result<Vec<VocabEntry>, LoadError> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if let Some(level) = level_of_file(&path) {
            files.push((level, path));
        }
    }
    if files.is_empty() {
        return Err(LoadError::MissingLevels(dir.to_path_buf()));
    }
    files.sort();

    let mut entries = Vec::new();
    for (level, path) in files {
        let words = load_level_file(&path, level)?;
        info!(%level, words = words.len(), path = %path.display(), "loaded level list");
        entries.extend(words);
    }
    Ok(entries)
}

/// True for files named like a level list, `L<n>.txt` or `... L<n>.txt`.
pub fn is_level_file(path: &Path) -> bool {
    level_of_file(path).is_some()
}

fn level_of_file(path: &Path) -> Option<HskLevel> {
    if path.extension()? != "txt" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let digit = stem.strip_prefix('L').or_else(|| stem.rsplit_once(" L").map(|(_, d)| d))?;
    HskLevel::new(digit.parse().ok()?)
}

/// Loads a word list from JSON (an array of entries), a comma separated
/// table (`.csv`) or a tab separated table, picked by file extension.
pub fn load_vocabulary(path: impl AsRef<Path>) -> Result<Vec<VocabEntry>, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    let entries = match extension {
        "json" => serde_json::from_str(&text)?,
        "csv" => parse_vocabulary_csv(&text),
        _ => parse_vocabulary_table(&text),
    };
    info!(words = entries.len(), path = %path.display(), "loaded vocabulary");
    Ok(entries)
}

/// Loads a directory of level files or a single vocabulary file.
pub fn load_vocabulary_source(path: impl AsRef<Path>) -> Result<Vec<VocabEntry>, LoadError> {
    let path = path.as_ref();
    if path.is_dir() {
        load_level_directory(path)
    } else {
        load_vocabulary(path)
    }
}

/// Parses a `Hanzi,Level` character table.
///
/// A leading index column is tolerated, since the last two fields are the
/// ones read. Rows whose hanzi is not a single character are skipped.
pub fn parse_char_table(text: &str) -> Vec<(char, HskLevel)> {
    let mut table = Vec::new();
    for (row, result) in table_reader(text, b',').records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "skipping unreadable character row");
                continue;
            }
        };
        let number = record.position().map_or(row as u64 + 1, |p| p.line());
        if record.len() < 2 {
            warn!(line = number, "skipping character row with too few fields");
            continue;
        }
        let Some(level) = record.get(record.len() - 1).and_then(parse_level) else {
            if row > 0 {
                warn!(line = number, "skipping character row with invalid level");
            }
            continue;
        };
        let mut symbols = record[record.len() - 2].chars();
        match (symbols.next(), symbols.next()) {
            (Some(symbol), None) => table.push((symbol, level)),
            _ => warn!(line = number, "skipping character row without a single hanzi"),
        }
    }
    table
}

pub fn load_char_table(path: impl AsRef<Path>) -> Result<Vec<(char, HskLevel)>, LoadError> {
    let path = path.as_ref();
    let table = parse_char_table(&fs::read_to_string(path)?);
    info!(symbols = table.len(), path = %path.display(), "loaded character table");
    Ok(table)
}

/// Writes the index as a `Hanzi,Level` table, ordered by level.
pub fn write_char_table<W: Write>(index: &VocabularyIndex, mut writer: W) -> io::Result<()> {
    writeln!(writer, "Hanzi,Level")?;
    for (symbol, level) in index.symbol_levels() {
        writeln!(writer, "{},{}", symbol, level)?;
    }
    writer.flush()
}

// Accepts "3" as well as the "3.0" float formatting of spreadsheet exports.
fn parse_level(raw: &str) -> Option<HskLevel> {
    let raw = raw.strip_suffix(".0").unwrap_or(raw);
    HskLevel::new(raw.parse().ok()?)
}

fn field(fields: &[&str], position: usize) -> String {
    fields.get(position).map(|f| f.to_string()).unwrap_or_default()
}

// Non-blank lines with their 1-based line numbers, byte order mark removed.
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.trim_start_matches(BOM)
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}
