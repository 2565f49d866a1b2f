// Service exports
pub mod enricher;
pub mod search;

pub use enricher::{EnrichError, EnrichStats, Enricher, Scored};
pub use search::{SearchClient, SearchError};
