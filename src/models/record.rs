use serde_json::{Map, Value};
use thiserror::Error;
use crate::models::domain::{year_value, MovieQuery, ScorePair};

/// A flat input record, keyed by column name
pub type Record = Map<String, Value>;

/// Errors that make a record unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("[{marker}]: No title found for movie!")]
    MissingTitle { marker: String },

    #[error("[{marker}]: No year found for {title}!")]
    MissingYear { marker: String, title: String },

    #[error("[{marker}]: Invalid year {value:?} for {title}")]
    InvalidYear {
        marker: String,
        title: String,
        value: String,
    },
}

/// Declarative table of accepted source keys per canonical field.
///
/// Keys are compared case-insensitively and probed in order; the first key
/// present in the record wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAliases {
    pub title: Vec<String>,
    pub year: Vec<String>,
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            title: vec!["name".to_string(), "title".to_string()],
            year: vec!["year".to_string()],
        }
    }
}

impl FieldAliases {
    /// Resolve the query for the record at `index` (zero based) of `total`
    pub fn resolve(
        &self,
        record: &Record,
        index: usize,
        total: usize,
    ) -> Result<MovieQuery, RecordError> {
        let marker = format!("{}/{}", index + 1, total);

        let title = lookup(record, &self.title)
            .and_then(title_value)
            .ok_or_else(|| RecordError::MissingTitle {
                marker: marker.clone(),
            })?;

        let raw_year = lookup(record, &self.year)
            .filter(|v| !is_blank(v))
            .ok_or_else(|| RecordError::MissingYear {
                marker: marker.clone(),
                title: title.clone(),
            })?;

        let year = match year_value(raw_year) {
            Some(0) => {
                return Err(RecordError::MissingYear { marker, title });
            }
            Some(year) => year,
            None => {
                return Err(RecordError::InvalidYear {
                    marker,
                    title,
                    value: display_value(raw_year),
                });
            }
        };

        MovieQuery::new(title, year).map_err(|_| RecordError::MissingTitle { marker })
    }
}

fn lookup<'r>(record: &'r Record, keys: &[String]) -> Option<&'r Value> {
    keys.iter().find_map(|key| {
        record
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    })
}

fn title_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Column names the scores are written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumns {
    pub critics: String,
    pub audience: String,
}

impl Default for OutputColumns {
    fn default() -> Self {
        Self {
            critics: "RT".to_string(),
            audience: "Audience Score".to_string(),
        }
    }
}

impl OutputColumns {
    pub fn new(critics: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            critics: critics.into(),
            audience: audience.into(),
        }
    }

    /// Merge scores into the record, replacing any previous values
    pub fn apply(&self, record: &mut Record, scores: &ScorePair) {
        record.insert(self.critics.clone(), scores.critics_field());
        record.insert(self.audience.clone(), scores.audience_field());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_resolves_name_before_title() {
        let aliases = FieldAliases::default();
        let rec = record(json!({ "Title": "Wrong", "Name": "Heat", "Year": 1995 }));

        let query = aliases.resolve(&rec, 0, 1).unwrap();

        assert_eq!(query.title, "Heat");
        assert_eq!(query.year, 1995);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let aliases = FieldAliases::default();
        let rec = record(json!({ "TITLE": "Heat", "yEaR": "1995" }));

        let query = aliases.resolve(&rec, 0, 1).unwrap();

        assert_eq!(query, MovieQuery::new("Heat", 1995).unwrap());
    }

    #[test]
    fn test_numeric_title() {
        let aliases = FieldAliases::default();
        let rec = record(json!({ "Name": 9, "Year": 2009 }));

        assert_eq!(aliases.resolve(&rec, 0, 1).unwrap().title, "9");
    }

    #[test]
    fn test_missing_title_names_position() {
        let aliases = FieldAliases::default();
        let rec = record(json!({ "Name": "", "Year": 1995 }));

        let err = aliases.resolve(&rec, 2, 10).unwrap_err();

        assert_eq!(err, RecordError::MissingTitle { marker: "3/10".to_string() });
        assert_eq!(err.to_string(), "[3/10]: No title found for movie!");
    }

    #[test]
    fn test_missing_year() {
        let aliases = FieldAliases::default();

        for rec in [
            record(json!({ "Name": "Heat" })),
            record(json!({ "Name": "Heat", "Year": "" })),
            record(json!({ "Name": "Heat", "Year": 0 })),
        ] {
            let err = aliases.resolve(&rec, 0, 1).unwrap_err();
            assert!(matches!(err, RecordError::MissingYear { .. }));
        }
    }

    #[test]
    fn test_invalid_year() {
        let aliases = FieldAliases::default();
        let rec = record(json!({ "Name": "Heat", "Year": "mid nineties" }));

        let err = aliases.resolve(&rec, 0, 1).unwrap_err();

        assert!(matches!(err, RecordError::InvalidYear { value, .. } if value == "mid nineties"));
    }

    #[test]
    fn test_apply_scores() {
        let columns = OutputColumns::default();
        let mut rec = record(json!({ "Name": "Heat", "Year": 1995 }));

        columns.apply(&mut rec, &ScorePair::new(Some(88.into()), None));

        assert_eq!(rec["RT"], json!(88));
        assert_eq!(rec["Audience Score"], json!(""));
    }
}
