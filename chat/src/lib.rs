//! Conversation layer: classifies a raw user message, routes it to the
//! translation dictionary or the search engine and renders a text reply.

use rand::seq::IteratorRandom;
use std::collections::{BTreeMap, HashMap};

use phrasebook_core::{
    Dataset, Normalizer, NormalizerConfig, PhraseBook, Record, SearchEngine, SearchOptions,
};

/// Presence of any of these marks the message as a translation request,
/// checked before the general search.
const TRANSLATION_KEYWORDS: &[&str] = &[
    "перевод",
    "переведи",
    "как сказать",
    "что означает",
    "как будет",
    "translate",
    "oversett",
];

const RANDOM_WORD_KEYWORDS: &[&str] =
    &["случайное слово", "дай слово", "новое слово", "изучить слово"];

/// Filler words stripped from a translation request before lookup.
const REQUEST_FILLER: &[&str] = &["по норвежски", "пожалуйста"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Translate,
    RandomWord,
    Search,
}

fn classify(normalized: &str) -> Intent {
    if TRANSLATION_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        Intent::Translate
    } else if RANDOM_WORD_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        Intent::RandomWord
    } else {
        Intent::Search
    }
}

/// Produces a fold-free chat normalizer: intent keywords and dictionary
/// keys keep ь/ъ/ё, so chat-side matching must too. The engine applies its
/// own folds internally when searching.
fn message_normalizer() -> Normalizer {
    Normalizer::new(NormalizerConfig { folds: HashMap::new(), ..NormalizerConfig::default() })
}

pub struct Responder {
    engine: SearchEngine,
    phrases: PhraseBook,
    normalizer: Normalizer,
    categories: BTreeMap<String, String>,
    levels: BTreeMap<String, String>,
}

impl Responder {
    pub fn new(dataset: Dataset) -> Self {
        let phrases = dataset.phrasebook();
        let engine = SearchEngine::new(dataset.records);
        Self {
            engine,
            phrases,
            normalizer: message_normalizer(),
            categories: dataset.categories,
            levels: dataset.levels,
        }
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// Produce a reply for one user message. Never fails; the worst case is
    /// the canned help text.
    pub fn respond(&self, message: &str) -> String {
        let normalized = self.normalizer.normalize(message);
        let intent = classify(&normalized);
        tracing::debug!(?intent, query = %normalized, "message classified");
        match intent {
            Intent::Translate => self.translate(&normalized),
            Intent::RandomWord => self.random_word(),
            Intent::Search => self.answer(message, &normalized),
        }
    }

    fn translate(&self, normalized: &str) -> String {
        let mut text = normalized.to_string();
        for kw in TRANSLATION_KEYWORDS.iter().chain(REQUEST_FILLER) {
            text = text.replace(kw, " ");
        }
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return self.help();
        }

        if let Some(translation) = self.phrases.lookup(&text) {
            return format!(
                "Перевод: \"{text}\" — {translation}\nСовет: повторите вслух для запоминания."
            );
        }

        let similar = self.phrases.similar(&text, 3);
        if similar.is_empty() {
            format!(
                "Перевод для \"{text}\" не найден.\n\
                 Попробуйте более простые слова, например: \"переведи привет\"."
            )
        } else {
            let mut reply = String::from("Точный перевод не найден. Возможно, вы искали:\n");
            for (phrase, translation) in similar {
                reply.push_str(&format!("  - {phrase} = {translation}\n"));
            }
            reply
        }
    }

    /// Random study prompt, optionally narrowed to one category and/or
    /// level. Returns `None` when no record survives the filters.
    pub fn random_record(&self, category: Option<&str>, level: Option<&str>) -> Option<&Record> {
        self.engine
            .index()
            .records()
            .filter(|r| category.map_or(true, |c| r.category.as_deref() == Some(c)))
            .filter(|r| level.map_or(true, |l| r.level.as_deref() == Some(l)))
            .choose(&mut rand::thread_rng())
    }

    fn random_word(&self) -> String {
        match self.random_record(None, None) {
            Some(record) => self.format_record(record),
            None => self.help(),
        }
    }

    fn answer(&self, raw: &str, normalized: &str) -> String {
        let options = SearchOptions { category: None, level: None, limit: 3 };
        let hits = self.engine.search(raw, &options);
        if let Some(hit) = hits.first() {
            return self.format_record(&hit.record);
        }
        // The flat dictionary sometimes knows phrases the index does not.
        if let Some(translation) = self.phrases.lookup(normalized) {
            return format!("Перевод: {translation}");
        }
        self.help()
    }

    fn format_record(&self, record: &Record) -> String {
        let mut reply = String::new();
        if let Some(question) = &record.question {
            reply.push_str(&format!("NO: {question}\n"));
        }
        if let Some(answer) = &record.answer {
            reply.push_str(&format!("RU: {answer}\n"));
        }
        if let Some(category) = &record.category {
            let label = self.categories.get(category).unwrap_or(category);
            reply.push_str(&format!("Категория: {label}\n"));
        }
        if let Some(level) = &record.level {
            let label = self.levels.get(level).unwrap_or(level);
            reply.push_str(&format!("Уровень: {label}\n"));
        }
        reply
    }

    fn help(&self) -> String {
        "Я помогаю изучать норвежский язык!\n\
         Вы можете:\n\
         \x20 - спросить перевод: \"как сказать привет?\"\n\
         \x20 - попросить случайное слово: \"дай новое слово\"\n\
         \x20 - просто написать слово по-русски или по-норвежски\n\
         Попробуйте переформулировать запрос."
            .to_string()
    }
}
