//! Movie documents and API payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Release year as stored in the database, either text or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    /// Year stored as a string, e.g. `"1999"`.
    Text(String),
    /// Year stored as a number.
    Number(i64),
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(year) => f.write_str(year),
            Self::Number(year) => write!(f, "{year}"),
        }
    }
}

/// Entry of a movie listing; field order is the order of the JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieListing {
    /// Movie title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year.
    #[serde(rename = "Year")]
    pub year: Year,
    /// Genres.
    #[serde(rename = "Genres", default)]
    pub genres: Vec<String>,
}

/// Movie document as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: Year,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Movie details with a generated plot summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieSummary {
    /// Movie title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year.
    #[serde(rename = "Year")]
    pub year: Year,
    /// Genres joined with `", "`.
    #[serde(rename = "Genres")]
    pub genres: String,
    /// Generated plot summary.
    #[serde(rename = "Summary")]
    pub summary: String,
}

impl MovieSummary {
    /// Combine a stored movie with its summary.
    #[must_use]
    pub fn new(record: MovieRecord, summary: String) -> Self {
        Self {
            title: record.title,
            year: record.year,
            genres: record.genres.join(", "),
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn year_keeps_stored_form() {
        let text: Year = serde_json::from_value(json!("1999")).unwrap();
        let number: Year = serde_json::from_value(json!(1999)).unwrap();
        assert_eq!(text, Year::Text("1999".into()));
        assert_eq!(number, Year::Number(1999));
        assert_eq!(text.to_string(), "1999");
        assert_eq!(number.to_string(), "1999");
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("1999"));
    }

    #[test]
    fn listing_uses_capitalized_keys() {
        let listing: MovieListing = serde_json::from_value(json!({
            "Title": "The Matrix",
            "Year": "1999",
            "Genres": ["Action", "Sci-Fi"]
        }))
        .unwrap();
        assert_eq!(listing.title, "The Matrix");
        assert_eq!(listing.genres.len(), 2);
    }

    #[test]
    fn summary_joins_genres() {
        let record = MovieRecord {
            title: "The Matrix".into(),
            year: Year::Text("1999".into()),
            genres: vec!["Action".into(), "Sci-Fi".into()],
        };
        let summary = MovieSummary::new(record, "Neo wakes up.".into());
        assert_eq!(summary.genres, "Action, Sci-Fi");
    }
}
