//! JSON rendering of API responses.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use stratus_core::Error;

use crate::Result;

/// Body returned when a title lookup finds nothing.
pub const NOT_IN_DATABASE: &str = "Movie not in database.";

const INDENT: &[u8] = b"    ";

/// Serialize `value` as JSON indented with four spaces.
///
/// Struct fields keep their declaration order.
///
/// # Errors
///
/// Returns a parse error if `value` cannot be represented as JSON.
pub fn to_pretty_json<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| Error::InternalError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovieListing, MovieRecord, MovieSummary, Year};

    #[test]
    fn listing_layout() {
        let movies = vec![MovieListing {
            title: "Heat".into(),
            year: Year::Text("1995".into()),
            genres: vec!["Crime".into(), "Drama".into()],
        }];
        let expected = "[\n    {\n        \"Title\": \"Heat\",\n        \"Year\": \"1995\",\n        \"Genres\": [\n            \"Crime\",\n            \"Drama\"\n        ]\n    }\n]";
        assert_eq!(to_pretty_json(&movies).unwrap(), expected);
    }

    #[test]
    fn empty_listing() {
        let movies: Vec<MovieListing> = Vec::new();
        assert_eq!(to_pretty_json(&movies).unwrap(), "[]");
    }

    #[test]
    fn not_in_database_is_a_json_string() {
        assert_eq!(
            to_pretty_json(NOT_IN_DATABASE).unwrap(),
            "\"Movie not in database.\""
        );
    }

    #[test]
    fn summary_key_order() {
        let summary = MovieSummary::new(
            MovieRecord {
                title: "Heat".into(),
                year: Year::Number(1995),
                genres: vec!["Crime".into()],
            },
            "A heist.".into(),
        );
        let expected = "{\n    \"Title\": \"Heat\",\n    \"Year\": 1995,\n    \"Genres\": \"Crime\",\n    \"Summary\": \"A heist.\"\n}";
        assert_eq!(to_pretty_json(&summary).unwrap(), expected);
    }
}
