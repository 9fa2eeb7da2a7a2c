use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";

pub const REQUIRED_ENV: [&str; 1] = ["TMDB_API_KEY"];

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    pub base_url: String,
    pub language: String,
    pub timeout: Duration,
}

impl CatalogConfig {
    pub fn new(api_key: &str, base_url: Option<&str>) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(anyhow!("TMDB API key cannot be empty"));
        }
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: normalize_base_url(base_url),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY").context("TMDB_API_KEY not set")?;
        Self::from_values(
            &api_key,
            env::var("TMDB_BASE_URL").ok().as_deref(),
            env::var("TMDB_LANGUAGE").ok().as_deref(),
            env::var("TMDB_TIMEOUT_SECS").ok().as_deref(),
        )
    }

    /// Builds the config from raw variable values; `None` means unset.
    pub fn from_values(
        api_key: &str,
        base_url: Option<&str>,
        language: Option<&str>,
        timeout_secs: Option<&str>,
    ) -> Result<Self> {
        let mut config = Self::new(api_key, base_url)?;
        if let Some(lang) = language.map(str::trim).filter(|l| !l.is_empty()) {
            config.language = lang.to_string();
        }
        if let Some(raw) = timeout_secs {
            config.timeout = parse_timeout(raw)?;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_value(env::var("BIND_ADDR").ok().as_deref())
    }

    pub fn from_value(bind_addr: Option<&str>) -> Result<Self> {
        let raw = bind_addr.unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = raw
            .trim()
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {raw}"))?;
        Ok(Self { bind_addr })
    }
}

pub fn check_env() -> Result<()> {
    for key in REQUIRED_ENV {
        check_required(key, env::var(key).ok().as_deref())?;
    }
    Ok(())
}

fn check_required(key: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => anyhow::bail!("Missing required environment variable: {}", key),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("TMDB_TIMEOUT_SECS is not a number: {raw}"))?;
    Ok(Duration::from_secs(secs.max(1)))
}

fn normalize_base_url(base_url: Option<&str>) -> String {
    let trimmed = base_url
        .map(|b| b.trim().trim_end_matches('/'))
        .unwrap_or_default();
    if trimmed.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
