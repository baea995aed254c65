//! Request handling independent of the HTTP layer.

use std::sync::Arc;

use stratus_core::Error;
use tracing::info;

use crate::format::{to_pretty_json, NOT_IN_DATABASE};
use crate::models::MovieSummary;
use crate::store::MovieStore;
use crate::summarizer::Summarizer;
use crate::Result;

/// Returned when the year segment is not an integer.
pub const YEAR_USAGE: &str = "Please provide a year as part of the url in this format: http://localhost:7071/api/getmoviesbyyear/year";
/// Returned when the movie name segment is blank.
pub const MOVIE_NAME_USAGE: &str = "Please provide a movie name as part of the url in this format: http://localhost:7071/api/getmoviesummary/movie-name";

/// Answers the three movie queries as pretty-printed JSON.
#[derive(Clone)]
pub struct MovieService {
    store: Arc<dyn MovieStore>,
    summarizer: Arc<dyn Summarizer>,
}

impl MovieService {
    /// Create a service over a store and a summarizer.
    pub fn new(store: Arc<dyn MovieStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { store, summarizer }
    }

    /// Every movie.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    pub async fn list_movies(&self) -> Result<String> {
        let movies = self.store.all_movies().await?;
        info!(count = movies.len(), "listed movies");
        to_pretty_json(&movies)
    }

    /// Movies released in `year`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] with [`YEAR_USAGE`] if `year` is not an integer,
    /// otherwise the store error.
    pub async fn movies_by_year(&self, year: &str) -> Result<String> {
        let year = parse_year(year)?;
        let movies = self.store.movies_by_year(year).await?;
        info!(year, count = movies.len(), "listed movies by year");
        to_pretty_json(&movies)
    }

    /// Details and a generated plot summary of `name`.
    ///
    /// An unknown title yields the JSON string [`NOT_IN_DATABASE`] and the language model
    /// is not called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for a blank name, otherwise the store or model
    /// error.
    pub async fn movie_summary(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(Error::ValidationError(MOVIE_NAME_USAGE.to_string()));
        }

        let Some(record) = self.store.find_by_title(name).await?.into_iter().next() else {
            info!(name, "movie not found");
            return to_pretty_json(NOT_IN_DATABASE);
        };

        let summary = self
            .summarizer
            .summarize(name, &record.year.to_string())
            .await?;
        to_pretty_json(&MovieSummary::new(record, summary))
    }
}

/// Check that `raw` is an integer and return it without surrounding whitespace.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] with [`YEAR_USAGE`] otherwise.
pub fn parse_year(raw: &str) -> Result<&str> {
    let year = raw.trim();
    match year.parse::<i64>() {
        Ok(_) => Ok(year),
        Err(_) => Err(Error::ValidationError(YEAR_USAGE.to_string())),
    }
}
