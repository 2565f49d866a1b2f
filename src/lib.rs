//! Tomato Match - finds a movie's review scores in a loosely matching search index
//!
//! This library provides the title normalization and candidate disambiguation
//! used to pick the one search hit that is the queried movie, plus the search
//! client and batch enricher that feed it.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{normalize, MatchResult, Matcher, OverrideTable};
pub use crate::models::{CandidateHit, MovieQuery, Record, ScorePair};
