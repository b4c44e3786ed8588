use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::index::Record;
use crate::translate::PhraseBook;

/// The Norwegian-Russian starter dataset shipped with the crate.
pub const BUILTIN: &str = include_str!("../../data/phrasebook.json");

/// Everything a session needs: the indexable records, the flat translation
/// dictionary and display labels for category/level tags. The core treats
/// the tag values themselves as opaque strings; the labels exist only for
/// presentation layers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
    #[serde(default)]
    pub levels: BTreeMap<String, String>,
}

impl Dataset {
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN).expect("builtin dataset is valid JSON")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading dataset file {}", path.display()))?;
        let dataset: Dataset = serde_json::from_str(&raw)
            .with_context(|| format!("parsing dataset file {}", path.display()))?;
        Ok(dataset)
    }

    pub fn phrasebook(&self) -> PhraseBook {
        PhraseBook::new(self.translations.clone())
    }
}
