//! Movies HTTP API.
//!
//! Serves movie listings stored in a document database and asks a hosted language model
//! for a short plot summary of a single title.

#![deny(missing_docs)]

pub mod config;
pub mod format;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod summarizer;

pub use config::MoviesConfig;
pub use service::MovieService;
pub use store::{CosmosMovieStore, DocumentDbAuth, MovieStore};
pub use summarizer::{CohereSummarizer, Summarizer};

/// Convenient result alias that reuses the shared Stratus error type.
pub type Result<T> = stratus_core::Result<T>;
