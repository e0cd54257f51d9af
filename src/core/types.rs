// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// An HSK proficiency tier. Lower is easier.
///
/// Only values in `HskLevel::MIN..=HskLevel::MAX` can be constructed, so a
/// level coming out of the index is always a real tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HskLevel(u8);

impl HskLevel {
    pub const MIN: HskLevel = HskLevel(1);
    pub const MAX: HskLevel = HskLevel(6);

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&level)
            .then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All levels in ascending order.
    pub fn all() -> impl Iterator<Item = HskLevel> {
        (Self::MIN.0..=Self::MAX.0).map(HskLevel)
    }
}

impl TryFrom<u8> for HskLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "level {} outside of {}..={}",
                value,
                Self::MIN.0,
                Self::MAX.0
            )
        })
    }
}

impl From<HskLevel> for u8 {
    fn from(level: HskLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for HskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of classifying a symbol or a span.
///
/// The derived order puts every `Known` level below `Unknown`, so taking the
/// maximum over a span makes a single unseen symbol dominate the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    Known(HskLevel),
    Unknown,
}

impl Classification {
    pub fn level(self) -> Option<HskLevel> {
        match self {
            Classification::Known(level) => Some(level),
            Classification::Unknown => None,
        }
    }

    /// True for a known level at or below `max_level`. Unknown never passes.
    pub fn is_at_most(self, max_level: HskLevel) -> bool {
        matches!(self, Classification::Known(level) if level <= max_level)
    }
}

impl From<Option<HskLevel>> for Classification {
    fn from(level: Option<HskLevel>) -> Self {
        level.map_or(Classification::Unknown, Classification::Known)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Known(level) => write!(f, "HSK {}", level),
            Classification::Unknown => f.write_str("not in HSK"),
        }
    }
}

/// One row of the leveled word list.
/// Only `hanzi` and `level` feed the index; the rest is passed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub hanzi: String,
    pub level: HskLevel,
    #[serde(default)]
    pub traditional: String,
    #[serde(default)]
    pub pinyin: String,
    #[serde(default)]
    pub english: String,
}

impl VocabEntry {
    pub fn new(hanzi: impl Into<String>, level: HskLevel) -> Self {
        Self {
            hanzi: hanzi.into(),
            level,
            traditional: String::new(),
            pinyin: String::new(),
            english: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_range() {
        assert_eq!(HskLevel::new(0), None);
        assert_eq!(HskLevel::new(7), None);
        assert_eq!(HskLevel::new(3).map(HskLevel::get), Some(3));
        assert_eq!(HskLevel::all().count(), 6);
    }

    #[test]
    fn test_unknown_orders_above_every_level() {
        let top = Classification::Known(HskLevel::MAX);
        assert!(top < Classification::Unknown);
        assert!(Classification::Known(HskLevel::MIN) < top);
    }

    #[test]
    fn test_is_at_most() {
        let three = HskLevel::new(3).unwrap();
        assert!(Classification::Known(HskLevel::MIN).is_at_most(three));
        assert!(Classification::Known(three).is_at_most(three));
        assert!(!Classification::Known(HskLevel::MAX).is_at_most(three));
        assert!(!Classification::Unknown.is_at_most(HskLevel::MAX));
    }

    #[test]
    fn test_level_rejected_when_deserializing() {
        let ok: Result<VocabEntry, _> =
            serde_json::from_str(r#"{"hanzi": "话", "level": 1}"#);
        assert_eq!(ok.unwrap().level, HskLevel::MIN);

        let bad: Result<VocabEntry, _> =
            serde_json::from_str(r#"{"hanzi": "话", "level": 9}"#);
        assert!(bad.is_err());
    }
}
