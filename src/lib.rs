// src/lib.rs

pub mod config;
pub mod console;
pub mod core;
pub mod dataset;
pub mod error;
pub mod persistence;
pub mod vocabulary;

pub use crate::core::classifier::LevelClassifier;
pub use crate::core::engine::{Filtered, LevelCounts, LevelFilter, ReturnMode};
pub use crate::core::index::VocabularyIndex;
pub use crate::core::types::{Classification, HskLevel, VocabEntry};
pub use crate::error::{ClassifyError, LoadError, PersistError};
