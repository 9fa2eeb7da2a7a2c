use crate::config::CatalogConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// GET access to the movie catalog. `path` is relative to the API base
/// (e.g. `movie/popular`); the implementation adds credentials and language.
#[async_trait]
pub trait CatalogHttp: Send + Sync {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let user_agent = format!("reelpick/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            language: config.language.clone(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&CatalogConfig::from_env()?)
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}/{}?api_key={}&language={}",
            self.base_url,
            path.trim_start_matches('/'),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}

#[async_trait]
impl CatalogHttp for TmdbClient {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = self.url(path, params);
        debug!(path = %path, ?params, "TMDB GET");
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {} {}", path, status, text));
        }
        let parsed: Value = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}
