use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"(?u)[^\w\s]").expect("valid regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// Query tokens are capped to bound evaluation cost on pathological input.
pub const DEFAULT_MAX_TOKENS: usize = 10;

/// Common words that carry no search signal in the phrasebook corpus.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "и", "в", "на", "с", "по", "для", "что", "как", "где", "когда", "почему", "кто",
];

/// Configuration for [`Normalizer`]. Stop words and character folds are
/// dataset-specific, so they are passed in rather than hardcoded.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    pub stop_words: HashSet<String>,
    pub max_tokens: usize,
    /// Character rewrites applied after lowercasing; `None` removes the
    /// character entirely.
    pub folds: HashMap<char, Option<char>>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            max_tokens: DEFAULT_MAX_TOKENS,
            // Cyrillic folding: ё collapses to е, hard/soft signs vanish.
            folds: [('ё', Some('е')), ('ъ', None), ('ь', None)].into_iter().collect(),
        }
    }
}

/// Lowercases, folds and strips text down to space-separated word
/// characters. Normalization is total and idempotent: any input, including
/// the empty string, yields a well-formed normalized string.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// NFKC, lowercase, apply folds, replace punctuation with spaces,
    /// collapse whitespace runs, trim.
    pub fn normalize(&self, text: &str) -> String {
        let mut folded = String::with_capacity(text.len());
        for c in text.nfkc().flat_map(char::to_lowercase) {
            match self.config.folds.get(&c) {
                Some(Some(replacement)) => folded.push(*replacement),
                Some(None) => {}
                None => folded.push(c),
            }
        }
        let spaced = NON_WORD.replace_all(&folded, " ");
        let collapsed = WHITESPACE.replace_all(&spaced, " ");
        collapsed.trim().to_string()
    }

    /// Normalize and split into search tokens, dropping one-character
    /// tokens and stop words, capped at `max_tokens`.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split(' ')
            .filter(|w| w.chars().count() > 1 && !self.config.stop_words.contains(*w))
            .map(str::to_string)
            .take(self.config.max_tokens)
            .collect()
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_case() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("Hei!  Hvordan har du det?"), "hei hvordan har du det");
    }

    #[test]
    fn folds_cyrillic_variants() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("ЁЛКА, сколько?"), "елка сколко");
    }

    #[test]
    fn normalize_is_idempotent() {
        let n = Normalizer::default();
        for s in ["  Hei, привет!!  ", "god morgen", "", "x", "ёж и ёлка"] {
            let once = n.normalize(s);
            assert_eq!(n.normalize(&once), once);
        }
    }

    #[test]
    fn tokenize_filters_short_and_stop_words() {
        let n = Normalizer::default();
        let toks = n.tokenize("как сказать привет и пока?");
        assert_eq!(toks, vec!["сказать", "привет", "пока"]);
    }

    #[test]
    fn tokenize_caps_token_count() {
        let n = Normalizer::default();
        let long = "ord ".repeat(50);
        assert_eq!(n.tokenize(&long).len(), DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn empty_input_is_empty() {
        let n = Normalizer::default();
        assert_eq!(n.normalize(""), "");
        assert!(n.tokenize("???").is_empty());
    }
}
