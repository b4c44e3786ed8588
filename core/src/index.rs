use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::tokenizer::Normalizer;

/// Dense internal id assigned in insertion order. Candidate sets are sorted
/// by `DocId` before scoring, which makes equal-score ties deterministic.
pub type DocId = u32;

/// The unit of indexing and retrieval: a phrasebook entry with optional
/// keyword aliases, a prompt/reply text pair and category/level tags.
///
/// Fields are deliberately permissive — the dataset is duck-typed JSON and
/// unknown fields are ignored. A record without an `id` is skipped at
/// indexing time, not rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// Record ids may be JSON strings or integers; both map to `String`.
fn de_opt_id<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Num(i64),
    }
    let raw: Option<RawId> = Option::deserialize(de)?;
    Ok(raw.map(|r| match r {
        RawId::Text(s) => s,
        RawId::Num(n) => n.to_string(),
    }))
}

/// A record plus the normalized views of it the scorer needs, computed once
/// at indexing time instead of on every query.
#[derive(Debug, Clone)]
pub(crate) struct DocEntry {
    pub record: Record,
    pub keywords_norm: Vec<String>,
    pub question_tokens: HashSet<String>,
    pub answer_tokens: HashSet<String>,
}

/// Inverted index over a record set: token -> doc ids, plus dedicated
/// category and level postings for filtering.
#[derive(Debug, Default)]
pub struct SearchIndex {
    postings: HashMap<String, HashSet<DocId>>,
    by_category: HashMap<String, HashSet<DocId>>,
    by_level: HashMap<String, HashSet<DocId>>,
    docs: Vec<DocEntry>,
    doc_id_map: HashMap<String, DocId>,
}

impl SearchIndex {
    /// Index a record set from scratch. Records without an id, and records
    /// whose id was already seen, are skipped silently.
    pub fn build(records: Vec<Record>, normalizer: &Normalizer) -> Self {
        let mut index = SearchIndex::default();
        for record in records {
            index.add(record, normalizer);
        }
        tracing::info!(
            num_records = index.docs.len(),
            num_terms = index.postings.len(),
            "index built"
        );
        index
    }

    fn add(&mut self, record: Record, normalizer: &Normalizer) {
        let Some(external_id) = record.id.clone() else {
            return;
        };
        if self.doc_id_map.contains_key(&external_id) {
            tracing::warn!(id = %external_id, "duplicate record id skipped");
            return;
        }
        let doc_id = self.docs.len() as DocId;
        self.doc_id_map.insert(external_id, doc_id);

        // Keywords are normalized whole, not tokenized: a multi-word alias
        // forms a single posting term.
        let mut keywords_norm = Vec::with_capacity(record.keywords.len());
        for keyword in &record.keywords {
            let norm = normalizer.normalize(keyword);
            if norm.is_empty() {
                continue;
            }
            self.postings.entry(norm.clone()).or_default().insert(doc_id);
            keywords_norm.push(norm);
        }

        let question_tokens = self.index_text(record.question.as_deref(), doc_id, normalizer);
        let answer_tokens = self.index_text(record.answer.as_deref(), doc_id, normalizer);

        if let Some(category) = &record.category {
            let norm = normalizer.normalize(category);
            if !norm.is_empty() {
                self.by_category.entry(norm.clone()).or_default().insert(doc_id);
                // The category term is also searchable as a plain token.
                self.postings.entry(norm).or_default().insert(doc_id);
            }
        }
        if let Some(level) = &record.level {
            let norm = normalizer.normalize(level);
            if !norm.is_empty() {
                self.by_level.entry(norm).or_default().insert(doc_id);
            }
        }

        self.docs.push(DocEntry { record, keywords_norm, question_tokens, answer_tokens });
    }

    fn index_text(
        &mut self,
        text: Option<&str>,
        doc_id: DocId,
        normalizer: &Normalizer,
    ) -> HashSet<String> {
        let tokens: HashSet<String> = text
            .map(|t| normalizer.tokenize(t).into_iter().collect())
            .unwrap_or_default();
        for token in &tokens {
            self.postings.entry(token.clone()).or_default().insert(doc_id);
        }
        tokens
    }

    pub(crate) fn posting(&self, token: &str) -> Option<&HashSet<DocId>> {
        self.postings.get(token)
    }

    pub(crate) fn category_posting(&self, category: &str) -> Option<&HashSet<DocId>> {
        self.by_category.get(category)
    }

    pub(crate) fn level_posting(&self, level: &str) -> Option<&HashSet<DocId>> {
        self.by_level.get(level)
    }

    pub(crate) fn entry(&self, doc_id: DocId) -> &DocEntry {
        &self.docs[doc_id as usize]
    }

    pub(crate) fn terms(&self) -> impl Iterator<Item = &String> {
        self.postings.keys()
    }

    /// Look up a record by its external id.
    pub fn get(&self, external_id: &str) -> Option<&Record> {
        self.doc_id_map
            .get(external_id)
            .map(|&doc_id| &self.docs[doc_id as usize].record)
    }

    pub fn num_records(&self) -> usize {
        self.docs.len()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.docs.iter().map(|entry| &entry.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, question: &str) -> Record {
        Record {
            id: Some(id.into()),
            keywords: Vec::new(),
            question: Some(question.into()),
            answer: None,
            category: None,
            level: None,
        }
    }

    #[test]
    fn records_without_id_are_skipped() {
        let normalizer = Normalizer::default();
        let mut anonymous = record("x", "hei");
        anonymous.id = None;
        let index = SearchIndex::build(vec![anonymous, record("1", "takk")], &normalizer);
        assert_eq!(index.num_records(), 1);
        assert!(index.get("1").is_some());
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let normalizer = Normalizer::default();
        let index = SearchIndex::build(
            vec![record("1", "hei"), record("1", "takk")],
            &normalizer,
        );
        assert_eq!(index.num_records(), 1);
        assert_eq!(index.get("1").unwrap().question.as_deref(), Some("hei"));
    }

    #[test]
    fn id_accepts_string_or_integer_json() {
        let a: Record = serde_json::from_str(r#"{"id": 7, "question": "hei"}"#).unwrap();
        let b: Record = serde_json::from_str(r#"{"id": "7", "question": "hei"}"#).unwrap();
        assert_eq!(a.id.as_deref(), Some("7"));
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn multi_word_keywords_index_whole() {
        let normalizer = Normalizer::default();
        let mut r = record("1", "god morgen");
        r.keywords = vec!["God Morgen!".into()];
        let index = SearchIndex::build(vec![r], &normalizer);
        assert!(index.posting("god morgen").is_some());
    }
}
