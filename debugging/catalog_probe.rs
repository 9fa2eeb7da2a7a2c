//! Run one catalog lookup against the live service and print the result as JSON.
//! Usage:
//!   cargo run --bin catalog_probe -- random <upcoming|top-rated|popular>
//!   cargo run --bin catalog_probe -- movie <tmdb_id>
//!   cargo run --bin catalog_probe -- search <query...> [--adult]
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use reelpick::{Category, MovieApi, MovieFinder};
use serde_json::Value;
use std::env;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Probe {
    Random,
    Movie,
    Search,
}

impl FromStr for Probe {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "random" => Ok(Probe::Random),
            "movie" => Ok(Probe::Movie),
            "search" => Ok(Probe::Search),
            _ => Err(anyhow!("probe must be 'random', 'movie' or 'search'")),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: cargo run --bin catalog_probe -- random <upcoming|top-rated|popular>");
        eprintln!("       cargo run --bin catalog_probe -- movie <tmdb_id>");
        eprintln!("       cargo run --bin catalog_probe -- search <query...> [--adult]");
        std::process::exit(1);
    }

    let probe = Probe::from_str(&args[1])?;
    let finder = MovieFinder::from_env()?;

    let output: Option<Value> = match probe {
        Probe::Random => {
            let category = Category::from_str(&args[2])?;
            finder
                .random_movie(category)
                .await
                .map(serde_json::to_value)
                .transpose()?
        }
        Probe::Movie => {
            let id: i64 = args[2].parse().context("tmdb_id must be an integer")?;
            finder
                .movie_by_id(id)
                .await
                .map(serde_json::to_value)
                .transpose()?
        }
        Probe::Search => {
            let include_adult = args.iter().any(|a| a == "--adult");
            let query = args[2..]
                .iter()
                .filter(|a| a.as_str() != "--adult")
                .cloned()
                .collect::<Vec<_>>()
                .join(" ");
            finder
                .search(&query, include_adult)
                .await
                .map(serde_json::to_value)
                .transpose()?
        }
    };

    match output {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => {
            eprintln!("Nothing found");
            std::process::exit(2);
        }
    }
    Ok(())
}
