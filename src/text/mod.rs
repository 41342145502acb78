//! Message text normalization.
//!
//! Raw messages become lemmatized content tokens in four steps: lowercase,
//! strip everything that is not a letter or digit, drop stop words, then
//! lemmatize each survivor noun-first and verb-second.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

pub mod lemmatizer;
pub mod stopwords;

pub use lemmatizer::PartOfSpeech;

use lemmatizer::{apply_noun_rules, apply_verb_rules, NOUN_EXCEPTIONS, VERB_EXCEPTIONS};
use stopwords::ENGLISH_STOP_WORDS;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid literal pattern"));

static LEXICON: Lazy<Lexicon> = Lazy::new(Lexicon::build);

/// Stop list and lemma tables, built once per process.
#[derive(Debug)]
pub struct Lexicon {
    stop_words: HashSet<&'static str>,
    noun_exceptions: HashMap<&'static str, &'static str>,
    verb_exceptions: HashMap<&'static str, &'static str>,
}

impl Lexicon {
    /// Global instance. The first call builds the tables; every later call
    /// returns the same instance, so initialization is idempotent.
    pub fn global() -> &'static Lexicon {
        &LEXICON
    }

    fn build() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
            noun_exceptions: NOUN_EXCEPTIONS.iter().copied().collect(),
            verb_exceptions: VERB_EXCEPTIONS.iter().copied().collect(),
        }
    }

    /// Whether a lowercase `word` is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Reduce a lowercase `word` to its base form for the given part of
    /// speech. Words no table or rule covers come back unchanged.
    pub fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String {
        let exceptions = match pos {
            PartOfSpeech::Noun => &self.noun_exceptions,
            PartOfSpeech::Verb => &self.verb_exceptions,
        };
        if let Some(lemma) = exceptions.get(word) {
            return (*lemma).to_string();
        }
        let reduced = match pos {
            PartOfSpeech::Noun => apply_noun_rules(word),
            PartOfSpeech::Verb => apply_verb_rules(word),
        };
        reduced.unwrap_or_else(|| word.to_string())
    }
}

/// Turns raw message text into lemmatized content tokens.
pub struct Normalizer;

impl Normalizer {
    /// Tokenize one message.
    ///
    /// Stop words are filtered on the raw token, before lemmatization, so a
    /// token whose base form happens to be a stop word is kept.
    pub fn tokenize(text: &str) -> Vec<String> {
        let lexicon = Lexicon::global();
        let lowered = text.to_lowercase();
        let stripped = NON_ALPHANUMERIC.replace_all(&lowered, " ");

        stripped
            .split_whitespace()
            .filter(|token| !lexicon.is_stop_word(token))
            .map(|token| {
                let noun = lexicon.lemmatize(token, PartOfSpeech::Noun);
                lexicon.lemmatize(&noun, PartOfSpeech::Verb)
            })
            .collect()
    }
}
