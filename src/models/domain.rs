use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

/// Errors raised while building a query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("movie title must not be empty")]
    EmptyTitle,
}

/// The movie being searched for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovieQuery {
    pub title: String,
    pub year: i32,
}

impl MovieQuery {
    pub fn new(title: impl Into<String>, year: i32) -> Result<Self, QueryError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QueryError::EmptyTitle);
        }
        Ok(Self { title, year })
    }
}

/// One result record returned by the search index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateHit {
    pub title: String,
    #[serde(rename = "akaTitles", default)]
    pub aka_titles: Vec<String>,
    #[serde(rename = "releaseYear", default)]
    pub release_year: Option<i32>,
    #[serde(rename = "criticsScore", default)]
    pub critics_score: Option<Number>,
    #[serde(rename = "audienceScore", default)]
    pub audience_score: Option<Number>,
}

impl CandidateHit {
    pub fn new(title: impl Into<String>, release_year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            aka_titles: Vec::new(),
            release_year,
            critics_score: None,
            audience_score: None,
        }
    }

    pub fn with_aka_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aka_titles.extend(titles.into_iter().map(Into::into));
        self
    }

    pub fn with_scores(mut self, critics: Option<Number>, audience: Option<Number>) -> Self {
        self.critics_score = critics;
        self.audience_score = audience;
        self
    }

    /// Primary title followed by every alternate title
    pub fn all_titles(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str()).chain(self.aka_titles.iter().map(String::as_str))
    }

    pub fn scores(&self) -> ScorePair {
        ScorePair::new(self.critics_score.clone(), self.audience_score.clone())
    }

    /// Build a candidate from a raw search hit.
    ///
    /// Returns `None` when the hit carries no usable title. Alternate titles come
    /// from both the `titles` and `aka` arrays, release years may be numbers or
    /// numeric strings, and scores live under `rottenTomatoes`.
    pub fn from_hit(hit: &Value) -> Option<Self> {
        let title = hit.get("title").and_then(title_text)?;

        let aka_titles = ["titles", "aka"]
            .iter()
            .filter_map(|key| hit.get(*key).and_then(Value::as_array))
            .flatten()
            .filter_map(title_text)
            .collect();

        let release_year = hit.get("releaseYear").and_then(year_value);

        let ratings = hit.get("rottenTomatoes");
        let critics_score = ratings
            .and_then(|r| r.get("criticsScore"))
            .and_then(score_value);
        let audience_score = ratings
            .and_then(|r| r.get("audienceScore"))
            .and_then(score_value);

        Some(Self {
            title,
            aka_titles,
            release_year,
            critics_score,
            audience_score,
        })
    }
}

fn title_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn year_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn score_value(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => serde_json::from_str::<Number>(s.trim()).ok(),
        _ => None,
    }
}

/// Critics and audience scores for one movie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    #[serde(rename = "criticsScore", default)]
    pub critics_score: Option<Number>,
    #[serde(rename = "audienceScore", default)]
    pub audience_score: Option<Number>,
}

impl ScorePair {
    pub fn new(critics_score: Option<Number>, audience_score: Option<Number>) -> Self {
        Self {
            critics_score,
            audience_score,
        }
    }

    pub fn from_values(critics: u32, audience: u32) -> Self {
        Self::new(Some(critics.into()), Some(audience.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.critics_score.is_none() && self.audience_score.is_none()
    }

    /// Critics score as a flat field value, empty string when absent
    pub fn critics_field(&self) -> Value {
        field_value(self.critics_score.as_ref())
    }

    /// Audience score as a flat field value, empty string when absent
    pub fn audience_field(&self) -> Value {
        field_value(self.audience_score.as_ref())
    }
}

fn field_value(score: Option<&Number>) -> Value {
    match score {
        Some(n) => Value::Number(n.clone()),
        None => Value::String(String::new()),
    }
}
