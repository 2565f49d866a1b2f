use crate::core::Matcher;
use crate::models::{FieldAliases, MovieQuery, OutputColumns, Record, RecordError, ScorePair};
use crate::services::search::{SearchClient, SearchError};
use std::time::Duration;
use thiserror::Error;

/// Errors that stop a batch
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("[{marker}]: search for {title} ({year}) failed: {source}")]
    Search {
        marker: String,
        title: String,
        year: i32,
        #[source]
        source: SearchError,
    },
}

/// Counts for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub overridden: usize,
}

/// Where the scores for one query came from
#[derive(Debug, Clone, PartialEq)]
pub enum Scored {
    /// Listed in the override table; no search was made
    Fixed(ScorePair),
    Matched(ScorePair),
    Unmatched { hits: usize },
}

impl Scored {
    /// The scores to write; empty when nothing matched
    pub fn into_scores(self) -> ScorePair {
        match self {
            Scored::Fixed(scores) | Scored::Matched(scores) => scores,
            Scored::Unmatched { .. } => ScorePair::default(),
        }
    }
}

/// Adds review scores to a list of movie records
///
/// Records are processed in order, one search per record, with a fixed pause
/// between searches. A record without a usable title or year stops the batch.
pub struct Enricher {
    search: SearchClient,
    matcher: Matcher,
    aliases: FieldAliases,
    columns: OutputColumns,
    request_delay: Duration,
}

impl Enricher {
    pub fn new(search: SearchClient, matcher: Matcher) -> Self {
        Self {
            search,
            matcher,
            aliases: FieldAliases::default(),
            columns: OutputColumns::default(),
            request_delay: Duration::from_secs(1),
        }
    }

    pub fn with_aliases(mut self, aliases: FieldAliases) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_columns(mut self, columns: OutputColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Scores for a single query, searching only when no override applies
    pub async fn scores_for(&self, query: &MovieQuery) -> Result<Scored, SearchError> {
        if let Some(scores) = self.matcher.lookup_override(query) {
            return Ok(Scored::Fixed(scores.clone()));
        }

        let candidates = self.search.search(&query.title).await?;
        let scored = match self.matcher.find_match(query, &candidates).hit() {
            Some(hit) => Scored::Matched(hit.scores()),
            None => Scored::Unmatched { hits: candidates.len() },
        };

        Ok(scored)
    }

    /// Enrich every record, returning them with score columns merged in
    pub async fn enrich(&self, records: Vec<Record>) -> Result<(Vec<Record>, EnrichStats), EnrichError> {
        let total = records.len();
        let mut stats = EnrichStats {
            total,
            ..EnrichStats::default()
        };
        let mut enriched = Vec::with_capacity(total);
        let mut searched = false;

        for (index, mut record) in records.into_iter().enumerate() {
            let marker = format!("{}/{}", index + 1, total);
            let query = self.aliases.resolve(&record, index, total)?;

            if self.matcher.lookup_override(&query).is_none() {
                if searched && !self.request_delay.is_zero() {
                    tokio::time::sleep(self.request_delay).await;
                }
                searched = true;

                tracing::info!("[{}]: Fetching scores for {} ({})...", marker, query.title, query.year);
            }

            let scored = self.scores_for(&query).await.map_err(|source| EnrichError::Search {
                marker: marker.clone(),
                title: query.title.clone(),
                year: query.year,
                source,
            })?;

            match &scored {
                Scored::Fixed(_) => {
                    tracing::info!("[{}]: Using fixed scores for {} ({})", marker, query.title, query.year);
                    stats.overridden += 1;
                }
                Scored::Matched(_) => stats.matched += 1,
                Scored::Unmatched { hits } => {
                    tracing::info!(
                        "[{}]: No match for {} ({}) among {} hits",
                        marker,
                        query.title,
                        query.year,
                        hits
                    );
                    stats.unmatched += 1;
                }
            }

            let scores = scored.into_scores();
            self.columns.apply(&mut record, &scores);
            enriched.push(record);
        }

        tracing::info!(
            "Enriched {} records: {} matched, {} unmatched, {} fixed",
            stats.total,
            stats.matched,
            stats.unmatched,
            stats.overridden
        );

        Ok((enriched, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchSettings;
    use serde_json::json;

    // Nothing listens here; any search attempt fails fast
    fn offline_client() -> SearchClient {
        SearchClient::new(&SearchSettings {
            endpoint_url: "http://127.0.0.1:9/queries".to_string(),
            user_token: "token".to_string(),
            user_agent: "test".to_string(),
            extra_query_params: String::new(),
            index_name: "content_rt".to_string(),
            hits_per_page: 100,
            origin: None,
            timeout_secs: 1,
        })
        .unwrap()
    }

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_override_entries_skip_the_search() {
        let enricher = Enricher::new(offline_client(), Matcher::with_default_overrides())
            .with_request_delay(Duration::ZERO);

        let (records, stats) = tokio_test::block_on(
            enricher.enrich(vec![record(json!({ "Name": "9", "Year": 2009 }))]),
        )
        .unwrap();

        assert_eq!(records[0]["RT"], json!(57));
        assert_eq!(records[0]["Audience Score"], json!(56));
        assert_eq!(stats.overridden, 1);
    }

    #[test]
    fn test_single_query_uses_fixed_scores() {
        let enricher = Enricher::new(offline_client(), Matcher::with_default_overrides());
        let query = MovieQuery::new("9", 2009).unwrap();

        let scored = tokio_test::block_on(enricher.scores_for(&query)).unwrap();

        assert_eq!(scored, Scored::Fixed(ScorePair::from_values(57, 56)));
    }

    #[test]
    fn test_missing_year_stops_the_batch() {
        let enricher = Enricher::new(offline_client(), Matcher::with_default_overrides())
            .with_request_delay(Duration::ZERO);

        let err = tokio_test::block_on(enricher.enrich(vec![
            record(json!({ "Name": "9", "Year": 2009 })),
            record(json!({ "Name": "Heat" })),
        ]))
        .unwrap_err();

        assert_eq!(err.to_string(), "[2/2]: No year found for Heat!");
    }

    #[test]
    fn test_custom_columns() {
        let enricher = Enricher::new(offline_client(), Matcher::with_default_overrides())
            .with_columns(OutputColumns::new("Critics", "Audience"))
            .with_request_delay(Duration::ZERO);

        let (records, _) = tokio_test::block_on(
            enricher.enrich(vec![record(json!({ "title": "9", "year": "2009" }))]),
        )
        .unwrap();

        assert_eq!(records[0]["Critics"], json!(57));
        assert!(records[0].get("RT").is_none());
    }
}
