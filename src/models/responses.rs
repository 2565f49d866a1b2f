use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::domain::CandidateHit;

/// Response body of a multi-query search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResultSet>,
}

/// Hits for one query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResultSet {
    #[serde(default)]
    pub hits: Vec<Value>,
}

impl SearchResponse {
    /// Candidates from the first result set, in upstream order.
    ///
    /// Returns `None` when the response carries no result sets at all.
    /// Hits that cannot be read as candidates are dropped.
    pub fn into_candidates(self) -> Option<Vec<CandidateHit>> {
        let first = self.results.into_iter().next()?;
        let total = first.hits.len();

        let candidates: Vec<CandidateHit> = first
            .hits
            .iter()
            .filter_map(CandidateHit::from_hit)
            .collect();

        if candidates.len() < total {
            tracing::debug!("Skipped {} malformed hits", total - candidates.len());
        }

        Some(candidates)
    }
}

/// Error body returned by the search index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: Option<String>,
}
