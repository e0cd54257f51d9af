// File: src/core/normalizer.rs

/// Reduces a span to the symbols that take part in level classification.
///
/// Punctuation, whitespace and other non-alphanumeric characters go first.
/// What remains is then stripped of every run of Latin letters, so names and
/// inline translations do not count towards the level.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .filter(|c| !is_latin_letter(*c))
        .collect()
}

/// Iterates the classifiable symbols of `text` without allocating.
pub fn symbols(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars()
        .filter(|c| c.is_alphanumeric() && !is_latin_letter(*c))
}

// Only ASCII letters count as the foreign alphabet; full-width forms survive.
fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation_and_whitespace() {
        assert_eq!(normalize("阿姨， 帮我把！"), "阿姨帮我把");
        assert_eq!(normalize("你今天怎么样?"), "你今天怎么样");
    }

    #[test]
    fn test_strips_latin_runs() {
        assert_eq!(normalize("我叫Anna。"), "我叫");
        assert_eq!(normalize("卡拉OK"), "卡拉");
        assert_eq!(normalize("hello, world!"), "");
    }

    #[test]
    fn test_keeps_digits() {
        assert_eq!(normalize("我有3个"), "我有3个");
    }

    #[test]
    fn test_idempotent() {
        for text in ["你好, Tom!", "？？", "", "Ｌ大写", "我们一起去厨房吧"] {
            let once = normalize(text);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_symbols_matches_normalize() {
        let text = "Hi, 老师好!";
        assert_eq!(symbols(text).collect::<String>(), normalize(text));
    }
}
