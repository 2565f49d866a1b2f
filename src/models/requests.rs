use serde::{Deserialize, Serialize};

/// Multi-query body accepted by the search index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub requests: Vec<IndexQuery>,
}

/// A single query against one index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexQuery {
    #[serde(rename = "indexName")]
    pub index_name: String,
    pub params: String,
    pub query: String,
}

impl SearchRequest {
    pub fn single(index_name: &str, params: &str, query: &str) -> Self {
        Self {
            requests: vec![IndexQuery {
                index_name: index_name.to_string(),
                params: params.to_string(),
                query: query.to_string(),
            }],
        }
    }
}
