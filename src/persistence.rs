// File: src/persistence.rs
use crate::config::LevelerConfig;
use crate::core::index::VocabularyIndex;
use crate::error::{LoadError, PersistError};
use crate::vocabulary;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    Vocabulary,
    CharTable,
}

/// Fingerprint of the files an index was built from.
///
/// A snapshot is only reused while the fingerprint of its source is
/// unchanged: same kind, same path, same latest modification time and size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSource {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub bytes: u64,
}

impl IndexSource {
    /// Fingerprints a file, or the level files of a directory.
    ///
    /// Other directory entries are left out, so a snapshot kept next to the
    /// level files does not invalidate itself.
    pub fn describe(kind: SourceKind, path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let mut modified = metadata.modified().ok();
        let mut bytes = metadata.len();
        if metadata.is_dir() {
            modified = None;
            bytes = 0;
            for entry in fs::read_dir(path)? {
                let entry_path = entry?.path();
                if !vocabulary::is_level_file(&entry_path) {
                    continue;
                }
                let entry_metadata = fs::metadata(&entry_path)?;
                modified = modified.max(entry_metadata.modified().ok());
                bytes += entry_metadata.len();
            }
        }
        Ok(Self {
            kind,
            path: fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()),
            modified,
            bytes,
        })
    }

    /// The source the config points at. A character table wins over the word list.
    pub fn from_config(config: &LevelerConfig) -> io::Result<Self> {
        match &config.char_table_path {
            Some(path) => Self::describe(SourceKind::CharTable, path),
            None => Self::describe(SourceKind::Vocabulary, &config.vocabulary_path),
        }
    }
}

/// The serializable state written to disk.
#[derive(Clone, Serialize, Deserialize)]
struct Snapshot {
    source: IndexSource,
    index: VocabularyIndex,
}

/// Writes a snapshot of the index and its source, replacing `path` atomically.
pub fn save_index(index: &VocabularyIndex, source: &IndexSource, path: &Path) -> Result<(), PersistError> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let snapshot = Snapshot {
        source: source.clone(),
        index: index.clone(),
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, &snapshot)?;
        writer.flush()?;
    }

    temp_file.persist(path)?;
    info!(symbols = index.len(), path = %path.display(), "saved index snapshot");
    Ok(())
}

/// Reads a snapshot back with the source it was built from.
pub fn load_index(path: &Path) -> Result<(IndexSource, VocabularyIndex), PersistError> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;
    info!(symbols = snapshot.index.len(), path = %path.display(), "loaded index snapshot");
    Ok((snapshot.source, snapshot.index))
}

/// The snapshot at `path` if it was built from `source`, otherwise `None`.
pub fn load_fresh_index(path: &Path, source: &IndexSource) -> Option<VocabularyIndex> {
    if !path.exists() {
        return None;
    }
    match load_index(path) {
        Ok((stored, index)) if stored == *source => Some(index),
        Ok((stored, _)) => {
            info!(snapshot = %stored.path.display(), source = %source.path.display(), "index snapshot is stale, rebuilding");
            None
        }
        Err(e) => {
            warn!(error = %e, "ignoring unreadable index snapshot");
            None
        }
    }
}

/// Builds the index the config describes, going through the snapshot cache
/// when `index_cache_path` is set.
pub fn index_from_config(config: &LevelerConfig) -> Result<VocabularyIndex, LoadError> {
    let source = IndexSource::from_config(config)?;
    if let Some(cache) = &config.index_cache_path {
        if let Some(index) = load_fresh_index(cache, &source) {
            return Ok(index);
        }
    }

    let index = match source.kind {
        SourceKind::CharTable => VocabularyIndex::from_symbol_levels(vocabulary::load_char_table(&source.path)?),
        SourceKind::Vocabulary => VocabularyIndex::build(&vocabulary::load_vocabulary_source(&source.path)?),
    };

    if let Some(cache) = &config.index_cache_path {
        if let Err(e) = save_index(&index, &source, cache) {
            warn!(error = %e, "could not save index snapshot");
        }
    }
    Ok(index)
}
