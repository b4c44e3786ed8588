//! In-memory keyword search for a language-learning phrasebook.
//!
//! The core pipeline: records are indexed into token postings
//! ([`SearchIndex`]), queries are tokenized ([`Normalizer`]), evaluated with
//! AND-then-OR set logic, scored for relevance and memoized in a bounded
//! cache ([`QueryCache`]). Everything lives in process memory; rebuilding
//! the index is the only way to change the record set.

pub mod cache;
pub mod dataset;
pub mod index;
pub mod search;
pub mod tokenizer;
pub mod translate;

pub use cache::{CacheStats, QueryCache, QueryKey};
pub use dataset::Dataset;
pub use index::{DocId, Record, SearchIndex};
pub use search::{EngineConfig, EngineStats, SearchEngine, SearchHit, SearchOptions};
pub use tokenizer::{Normalizer, NormalizerConfig};
pub use translate::PhraseBook;
