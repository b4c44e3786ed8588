use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::cache::{QueryCache, QueryKey, DEFAULT_CACHE_CAPACITY};
use crate::index::{DocEntry, DocId, Record, SearchIndex};
use crate::tokenizer::{Normalizer, NormalizerConfig};

pub const DEFAULT_LIMIT: usize = 10;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Per-query knobs. Category and level are hard filters applied after the
/// AND/OR candidate phase; `limit` caps the ranked output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { category: None, level: None, limit: DEFAULT_LIMIT }
    }
}

/// A ranked result: the matched record and its cumulative relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub record: Record,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub normalizer: NormalizerConfig,
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { normalizer: NormalizerConfig::default(), cache_capacity: DEFAULT_CACHE_CAPACITY }
    }
}

/// Aggregate observability counters, in the shape of the cache stats plus
/// index sizes.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub total_searches: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cache_entries: usize,
    pub num_records: usize,
    pub num_terms: usize,
}

impl EngineStats {
    pub fn cache_hit_rate(&self) -> f64 {
        if self.total_searches == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_searches as f64
        }
    }
}

/// One engine instance owns one index and one result cache; instances share
/// nothing. Searching takes `&self` (the cache uses interior locking), so
/// an engine can sit behind an `Arc` in a server.
pub struct SearchEngine {
    normalizer: Normalizer,
    index: SearchIndex,
    cache: QueryCache,
    total_searches: AtomicUsize,
}

impl SearchEngine {
    pub fn new(records: Vec<Record>) -> Self {
        Self::with_config(records, EngineConfig::default())
    }

    pub fn with_config(records: Vec<Record>, config: EngineConfig) -> Self {
        let normalizer = Normalizer::new(config.normalizer);
        let index = SearchIndex::build(records, &normalizer);
        Self {
            normalizer,
            index,
            cache: QueryCache::new(config.cache_capacity),
            total_searches: AtomicUsize::new(0),
        }
    }

    /// Replace the record set. Postings change, so all cached results are
    /// discarded with the old index.
    pub fn rebuild(&mut self, records: Vec<Record>) {
        self.index = SearchIndex::build(records, &self.normalizer);
        self.cache.clear();
    }

    /// Evaluate a query and return ranked hits, at most `options.limit` of
    /// them. Never fails: queries that match nothing yield an empty vec.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
        let key = self.cache_key(query, options);

        if let Some(hits) = self.cache.get(&key) {
            tracing::debug!(query = %key.query, hits = hits.len(), "cache hit");
            return hits;
        }

        let hits = self.evaluate(&key);
        tracing::debug!(query = %key.query, hits = hits.len(), "query evaluated");
        self.cache.put(key, hits.clone());
        hits
    }

    fn cache_key(&self, query: &str, options: &SearchOptions) -> QueryKey {
        let normalize_tag = |tag: &Option<String>| {
            tag.as_deref()
                .map(|t| self.normalizer.normalize(t))
                .filter(|t| !t.is_empty())
        };
        QueryKey {
            query: self.normalizer.normalize(query),
            category: normalize_tag(&options.category),
            level: normalize_tag(&options.level),
            limit: if options.limit == 0 { DEFAULT_LIMIT } else { options.limit },
        }
    }

    fn evaluate(&self, key: &QueryKey) -> Vec<SearchHit> {
        let tokens = self.normalizer.tokenize(&key.query);
        if tokens.is_empty() {
            return Vec::new();
        }

        // Per-token posting sets; unseen tokens contribute an empty set.
        let empty = HashSet::new();
        let sets: Vec<&HashSet<DocId>> = tokens
            .iter()
            .map(|t| self.index.posting(t).unwrap_or(&empty))
            .collect();

        // AND phase: every token must match.
        let mut candidates: HashSet<DocId> = sets[0].clone();
        for set in &sets[1..] {
            candidates.retain(|id| set.contains(id));
        }

        // OR fallback: any token matching is better than nothing. This can
        // broaden a query into loosely related hits; that is intentional.
        if candidates.is_empty() {
            for set in &sets {
                candidates.extend(set.iter().copied());
            }
        }

        // Filters are hard constraints on the candidate set.
        if let Some(category) = &key.category {
            match self.index.category_posting(category) {
                Some(ids) => candidates.retain(|id| ids.contains(id)),
                None => candidates.clear(),
            }
        }
        if let Some(level) = &key.level {
            match self.index.level_posting(level) {
                Some(ids) => candidates.retain(|id| ids.contains(id)),
                None => candidates.clear(),
            }
        }
        if candidates.is_empty() {
            return Vec::new();
        }

        // Insertion order before the stable sort keeps equal-score ties
        // deterministic.
        let mut ids: Vec<DocId> = candidates.into_iter().collect();
        ids.sort_unstable();

        let mut hits: Vec<SearchHit> = ids
            .into_iter()
            .map(|id| {
                let entry = self.index.entry(id);
                SearchHit {
                    record: entry.record.clone(),
                    score: relevance(entry, &key.query, &tokens),
                }
            })
            .collect();
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(key.limit);
        hits
    }

    /// Prefix autocomplete over indexed terms, excluding an exact match of
    /// the input itself. Lexicographic order keeps the output stable.
    pub fn suggestions(&self, partial: &str, limit: usize) -> Vec<String> {
        let normalized = self.normalizer.normalize(partial);
        if normalized.is_empty() {
            return Vec::new();
        }
        let mut out: Vec<String> = self
            .index
            .terms()
            .filter(|t| t.starts_with(&normalized) && t.as_str() != normalized)
            .cloned()
            .collect();
        out.sort();
        out.truncate(limit);
        out
    }

    pub fn stats(&self) -> EngineStats {
        let cache = self.cache.stats();
        EngineStats {
            total_searches: self.total_searches.load(Ordering::Relaxed),
            cache_hits: cache.hits,
            cache_misses: cache.misses,
            cache_entries: cache.entries,
            num_records: self.index.num_records(),
            num_terms: self.index.num_terms(),
        }
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }
}

/// Cumulative relevance: exact keyword match dominates, substring keyword
/// match is half of that, then per-token overlap with the question and
/// answer texts, plus a bonus when the query names the record's category.
fn relevance(entry: &DocEntry, query: &str, query_tokens: &[String]) -> u32 {
    let mut score = 0;

    for keyword in &entry.keywords_norm {
        if keyword == query {
            score += 100;
        } else if keyword.contains(query) {
            score += 50;
        }
    }

    for token in query_tokens {
        if entry.question_tokens.contains(token) {
            score += 10;
        }
        if entry.answer_tokens.contains(token) {
            score += 5;
        }
    }

    if let Some(category) = &entry.record.category {
        let category = category.to_lowercase();
        if query_tokens.iter().any(|t| *t == category) {
            score += 20;
        }
    }

    score
}
