//! `movies-api` server entry point.

use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use stratus_core::config::{load_env_file, ENV_FILE};
use stratus_core::credentials::StaticTokenCredential;
use stratus_movies::routes::router;
use stratus_movies::store::CosmosMovieStoreBuilder;
use stratus_movies::{CohereSummarizer, MovieService, MoviesConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stratus_movies=info,stratus_core=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = load_env_file(ENV_FILE);
    init_logger();
    env_file.context("invalid environment file")?.log();

    let config = MoviesConfig::from_env().context("invalid movies API configuration")?;

    let store = CosmosMovieStoreBuilder::new(&config.account_uri, &config.database, &config.container)?
        .build(config.account_credential.to_auth())?;
    let summarizer = CohereSummarizer::new(
        &config.cohere_endpoint,
        Arc::new(StaticTokenCredential::new(
            config.cohere_api_key.expose_secret(),
        )),
    )?;
    let service = MovieService::new(Arc::new(store), Arc::new(summarizer));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Movies API listening on {}", listener.local_addr()?);

    axum::serve(listener, router(service)).await?;
    Ok(())
}
