//! Toy HSK word list shared by the unit tests.

use crate::core::index::VocabularyIndex;
use crate::core::types::{HskLevel, VocabEntry};

const TOY_LEVELS: [&[&str]; 6] = [
    &["说话", "你", "今天", "怎么样", "看", "我们", "去", "老师", "好", "喝", "很", "吗", "我"],
    &["给", "上班", "吧", "一起", "帮助"],
    &["干净", "加油", "方法", "啤酒", "难", "啊", "位", "熊猫", "奇怪", "阿姨", "把"],
    &["广告", "加班", "看法", "抽烟", "棒", "厨房"],
    &["抓", "老婆"],
    &["颇"],
];

pub fn level(n: u8) -> HskLevel {
    HskLevel::new(n).unwrap()
}

pub fn toy_vocabulary() -> Vec<VocabEntry> {
    TOY_LEVELS
        .iter()
        .zip(HskLevel::all())
        .flat_map(|(words, lvl)| words.iter().map(move |word| VocabEntry::new(*word, lvl)))
        .collect()
}

pub fn toy_index() -> VocabularyIndex {
    VocabularyIndex::build(&toy_vocabulary())
}
