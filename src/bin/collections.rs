// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use embedding_collections::{EmbeddingStore, SimilarityEngine, StoreConfig};

/// Inspect embedding collections stored in a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "collections", version, about)]
struct Cli {
    /// Database file (falls back to EMBEDDINGS_DB_PATH).
    #[arg(long, env = "EMBEDDINGS_DB_PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List collections with their model and size.
    List,
    /// Number of embeddings in a collection.
    Count { name: String },
    /// Whether a collection exists.
    Exists { name: String },
    /// Entries most similar to a stored entry.
    SimilarById {
        name: String,
        id: String,
        /// Number of results.
        #[arg(short, long)]
        number: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "embedding_collections=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = StoreConfig::from_env().context("loading store configuration")?;
    if let Some(db) = cli.db {
        config.path = Some(db);
    }
    let store = EmbeddingStore::open(&config).context("opening embedding store")?;

    match cli.command {
        Commands::List => {
            for (collection, count) in store.list_collections()? {
                println!("{}: {} ({} embeddings)", collection.name, collection.model_id, count);
            }
        }
        Commands::Count { name } => {
            // count() creates the schema when it is missing
            let count = if store.exists(&name)? { store.count(&name)? } else { 0 };
            println!("{}", count);
        }
        Commands::Exists { name } => {
            println!("{}", store.exists(&name)?);
        }
        Commands::SimilarById { name, id, number } => {
            let collection = store
                .find_collection(&name)?
                .with_context(|| format!("collection {name:?} does not exist"))?;
            let limit = number.unwrap_or(config.default_limit);
            info!("Searching {} for neighbors of {}", name, id);
            let results = SimilarityEngine::new(&store).search_by_id(collection.id, &id, limit)?;
            for result in results {
                println!("{}", serde_json::json!({ "id": result.id, "score": result.score }));
            }
        }
    }

    Ok(())
}
