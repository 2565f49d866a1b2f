// Model exports
pub mod domain;
pub mod record;
pub mod requests;
pub mod responses;

pub use domain::{CandidateHit, MovieQuery, QueryError, ScorePair};
pub use record::{FieldAliases, OutputColumns, Record, RecordError};
pub use requests::{IndexQuery, SearchRequest};
pub use responses::{ErrorResponse, SearchResponse, SearchResultSet};
