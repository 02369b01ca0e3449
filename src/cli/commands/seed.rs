use anyhow::Context;
use clap::Args;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::{AppConfig, MEMORY_DATABASE_URL};
use crate::database::models::NewMovie;
use crate::database::{DatabaseManager, Store};

#[derive(Args, Debug)]
pub struct SeedArgs {
    #[arg(long, help = "JSON file holding an array of movie documents")]
    pub file: PathBuf,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

pub async fn handle(args: SeedArgs, config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    config.validate()?;
    if config.database.url == MEMORY_DATABASE_URL {
        tracing::warn!("Seeding the in-memory store; data is discarded when this command exits");
    }

    let movies = read_fixture(&args.file)?;
    let store = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;

    let summary = seed_movies(store.as_ref(), movies).await?;

    output_success(
        output_format,
        &format!(
            "Seeded {} movies from {} ({} already present)",
            summary.inserted,
            args.file.display(),
            summary.skipped
        ),
        Some(json!({ "inserted": summary.inserted, "skipped": summary.skipped })),
    )
}

fn read_fixture(path: &Path) -> anyhow::Result<Vec<NewMovie>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let movies = serde_json::from_str(&raw).with_context(|| format!("invalid movie fixture {}", path.display()))?;
    Ok(movies)
}

/// Insert each movie; titles already present are skipped.
pub async fn seed_movies(store: &dyn Store, movies: Vec<NewMovie>) -> anyhow::Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for movie in movies {
        let title = movie.title.clone();
        match store.insert_movie(movie).await? {
            Some(_) => {
                tracing::debug!("Inserted movie '{}'", title);
                summary.inserted += 1;
            }
            None => {
                tracing::debug!("Skipped existing movie '{}'", title);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}
