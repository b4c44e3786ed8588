use std::collections::BTreeMap;

/// Flat phrase -> translation dictionary, consulted before the general
/// search when the user asks for a translation outright.
///
/// Lookup is exact first, then substring in either direction, mirroring the
/// OR-fallback spirit of the search engine: a loose hit beats no answer.
/// A `BTreeMap` keeps the fallback scan order deterministic.
#[derive(Debug, Clone, Default)]
pub struct PhraseBook {
    entries: BTreeMap<String, String>,
}

impl PhraseBook {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, text: &str) -> Option<&str> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        if let Some(translation) = self.entries.get(&needle) {
            return Some(translation);
        }
        for (phrase, translation) in &self.entries {
            if needle.contains(phrase.as_str()) || phrase.contains(&needle) {
                return Some(translation);
            }
        }
        None
    }

    /// Phrases loosely related to `text`, for "did you mean" suggestions
    /// when no translation is found for the full input.
    pub fn similar(&self, text: &str, limit: usize) -> Vec<(&str, &str)> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let words: Vec<&str> = needle.split_whitespace().collect();
        self.entries
            .iter()
            .filter(|(phrase, _)| words.iter().any(|w| phrase.contains(w)))
            .map(|(phrase, translation)| (phrase.as_str(), translation.as_str()))
            .take(limit)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrasebook() -> PhraseBook {
        PhraseBook::new(
            [
                ("привет".to_string(), "hei [хай]".to_string()),
                ("доброе утро".to_string(), "god morgen [гу морген]".to_string()),
                ("спасибо".to_string(), "takk [так]".to_string()),
            ]
            .into_iter()
            .collect(),
        )
    }

    #[test]
    fn exact_match_wins() {
        let pb = phrasebook();
        assert_eq!(pb.lookup("Привет"), Some("hei [хай]"));
    }

    #[test]
    fn substring_fallback_both_directions() {
        let pb = phrasebook();
        // Query contains a known phrase.
        assert_eq!(pb.lookup("ну привет тебе"), Some("hei [хай]"));
        // Known phrase contains the query.
        assert_eq!(pb.lookup("утро"), Some("god morgen [гу морген]"));
    }

    #[test]
    fn unknown_phrase_is_none() {
        let pb = phrasebook();
        assert_eq!(pb.lookup("qwerty"), None);
        assert_eq!(pb.lookup("   "), None);
    }

    #[test]
    fn similar_matches_per_word() {
        let pb = phrasebook();
        let similar = pb.similar("доброе что-то", 3);
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].0, "доброе утро");
    }
}
