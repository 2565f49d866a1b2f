use serde::Deserialize;
use serde_json::Number;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use crate::models::{MovieQuery, ScorePair};

/// Errors that can occur when loading override entries
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("Failed to read overrides file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid overrides file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Fixed scores for movies the search index cannot find.
///
/// Entries are keyed by year, then by exact title, and are consulted before
/// any search is issued.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTable {
    entries: HashMap<i32, HashMap<String, ScorePair>>,
}

/// One entry of an overrides file
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideEntry {
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub critics_score: Option<Number>,
    #[serde(default)]
    pub audience_score: Option<Number>,
}

#[derive(Debug, Deserialize)]
struct OverridesFile {
    #[serde(default)]
    overrides: Vec<OverrideEntry>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the built-in entries
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        // "9" (2009) never comes back from the index for any query
        table.insert("9", 2009, ScorePair::from_values(57, 56));
        table
    }

    pub fn insert(&mut self, title: impl Into<String>, year: i32, scores: ScorePair) {
        self.entries.entry(year).or_default().insert(title.into(), scores);
    }

    pub fn lookup(&self, query: &MovieQuery) -> Option<&ScorePair> {
        self.entries.get(&query.year)?.get(query.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }

    /// Parse entries from TOML:
    ///
    /// ```toml
    /// [[overrides]]
    /// title = "9"
    /// year = 2009
    /// critics_score = 57
    /// audience_score = 56
    /// ```
    pub fn parse_toml(source: &str) -> Result<Vec<OverrideEntry>, OverrideError> {
        let file: OverridesFile = toml::from_str(source)?;
        Ok(file.overrides)
    }

    /// Add the entries of a TOML overrides file, replacing duplicates
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, OverrideError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let entries = Self::parse_toml(&source)?;
        let count = entries.len();
        self.extend(entries);

        tracing::debug!("Loaded {} overrides from {}", count, path.as_ref().display());

        Ok(count)
    }
}

impl Extend<OverrideEntry> for OverrideTable {
    fn extend<T: IntoIterator<Item = OverrideEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.insert(
                entry.title,
                entry.year,
                ScorePair::new(entry.critics_score, entry.audience_score),
            );
        }
    }
}
