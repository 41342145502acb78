//! Embedded English stop-word list.
//!
//! The standard English list, compiled in so no runtime download or data
//! directory is needed. Contraction fragments (`don`, `t`, `ve`, ...) are
//! listed in place of the apostrophized forms because punctuation stripping
//! runs before stop-word filtering and splits contractions into exactly
//! those fragments.

/// Default English stop words.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such",
    "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
    "will", "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
    "aren", "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn",
    "mustn", "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_function_words_present() {
        for word in ["we", "the", "is", "you", "don", "t"] {
            assert!(
                ENGLISH_STOP_WORDS.contains(&word),
                "expected stop word: {word}"
            );
        }
    }

    #[test]
    fn test_content_words_absent() {
        for word in ["need", "help", "water", "food", "shelter"] {
            assert!(
                !ENGLISH_STOP_WORDS.contains(&word),
                "content word wrongly listed: {word}"
            );
        }
    }

    #[test]
    fn test_list_is_lowercase_and_distinct() {
        let mut seen = std::collections::HashSet::new();
        for word in ENGLISH_STOP_WORDS {
            assert_eq!(word.to_lowercase(), *word);
            assert!(seen.insert(*word), "duplicate stop word: {word}");
        }
    }
}
