// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod normalizer;
pub mod numerals;
pub mod overrides;

pub use filters::{any_title_matches, is_close_year, is_exact_year, primary_title_matches, within_loose_window};
pub use matcher::{MatchResult, Matcher};
pub use normalizer::normalize;
pub use overrides::{OverrideEntry, OverrideError, OverrideTable};
