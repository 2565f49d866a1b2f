use crate::config::SearchSettings;
use crate::models::{CandidateHit, ErrorResponse, SearchRequest, SearchResponse};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

static HITS_PER_PAGE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"hitsPerPage=\d+").unwrap());

/// Errors that can occur when querying the search index
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Search query failed [{status}]: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Search index client
///
/// Sends one title query per call and hands back the raw hits as
/// [`CandidateHit`]s in the order the index ranked them. Retry and pacing
/// belong to the caller.
pub struct SearchClient {
    endpoint_url: String,
    user_token: String,
    user_agent: String,
    index_name: String,
    params: String,
    origin: Option<String>,
    client: Client,
}

impl SearchClient {
    /// Create a new search client
    pub fn new(settings: &SearchSettings) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint_url: settings.endpoint_url.clone(),
            user_token: settings.user_token.clone(),
            user_agent: settings.user_agent.clone(),
            index_name: settings.index_name.clone(),
            params: with_page_size(&settings.extra_query_params, settings.hits_per_page),
            origin: settings.origin.clone().filter(|o| !o.trim().is_empty()),
            client,
        })
    }

    pub fn params(&self) -> &str {
        &self.params
    }

    /// Search the index for a title
    pub async fn search(&self, title: &str) -> Result<Vec<CandidateHit>, SearchError> {
        let body = SearchRequest::single(&self.index_name, &self.params, title);

        tracing::debug!("Searching {} for {:?}", self.endpoint_url, title);

        let mut request = self
            .client
            .post(&self.endpoint_url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header("x-algolia-usertoken", &self.user_token)
            .json(&body);

        if let Some(origin) = &self.origin {
            let origin = origin.trim_end_matches('/');
            request = request
                .header(reqwest::header::ORIGIN, origin)
                .header(reqwest::header::REFERER, format!("{}/", origin));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(text);
            tracing::error!("Search for {:?} failed: {} - {}", title, status, message);
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let candidates = parsed
            .into_candidates()
            .ok_or_else(|| SearchError::InvalidResponse("Missing results array".into()))?;

        tracing::debug!("Search for {:?} returned {} candidates", title, candidates.len());

        Ok(candidates)
    }
}

/// Force the page size in a copied query string, appending it when absent
fn with_page_size(params: &str, hits_per_page: u32) -> String {
    let param = format!("hitsPerPage={}", hits_per_page);

    if HITS_PER_PAGE_PARAM.is_match(params) {
        HITS_PER_PAGE_PARAM.replace(params, param.as_str()).into_owned()
    } else if params.is_empty() {
        param
    } else {
        format!("{}&{}", params, param)
    }
}
