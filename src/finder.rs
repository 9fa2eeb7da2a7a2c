use crate::error::{LookupError, LookupResult};
use crate::models::{Category, ListingPage, MovieDetail, MovieSummary, RawDetail, RawSummary};
use crate::sampler::{Draw, Entropy, Sampler, SystemEntropy};
use crate::tmdb::{CatalogHttp, TmdbClient};
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lookups offered to the chat layer. Every failure is reported as `None`.
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn random_movie(&self, category: Category) -> Option<MovieDetail>;
    async fn movie_by_id(&self, id: i64) -> Option<MovieDetail>;
    async fn search(&self, query: &str, include_adult: bool) -> Option<Vec<MovieSummary>>;

    async fn fetch_upcoming(&self) -> Option<MovieDetail> {
        self.random_movie(Category::Upcoming).await
    }

    async fn fetch_top_rated(&self) -> Option<MovieDetail> {
        self.random_movie(Category::TopRated).await
    }

    async fn fetch_popular(&self) -> Option<MovieDetail> {
        self.random_movie(Category::Popular).await
    }
}

#[derive(Clone)]
pub struct MovieFinder {
    http: Arc<dyn CatalogHttp>,
    sampler: Sampler,
}

impl MovieFinder {
    pub fn new(http: Arc<dyn CatalogHttp>, entropy: Arc<dyn Entropy>) -> Self {
        Self {
            http,
            sampler: Sampler::new(entropy),
        }
    }

    pub fn from_env() -> Result<Self> {
        let client = TmdbClient::from_env()?;
        Ok(Self::new(Arc::new(client), Arc::new(SystemEntropy)))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> LookupResult<T> {
        let value = self.http.get_json(path, params).await?;
        serde_json::from_value(value).map_err(|e| LookupError::Malformed(format!("{path}: {e}")))
    }

    async fn fetch_listing(&self, category: Category, page: u32) -> LookupResult<ListingPage> {
        self.fetch(category.path(), &[("page", page.to_string())]).await
    }

    async fn try_random(&self, category: Category) -> LookupResult<MovieDetail> {
        let first = self.fetch_listing(category, 1).await?;
        let total_pages = first.total_pages.unwrap_or(1);
        if total_pages == 0 || (total_pages == 1 && first.results.is_empty()) {
            return Err(LookupError::Empty);
        }

        let draw = self.sampler.pick(total_pages);
        debug!(
            %category,
            total_pages,
            page = draw.page,
            index = draw.index,
            "Drew listing position"
        );
        let page = if draw.page == 1 {
            first
        } else {
            self.fetch_listing(category, draw.page).await?
        };

        let id = pick_valid(&self.sampler, &page.results, draw)?;
        self.try_detail(id).await
    }

    async fn try_detail(&self, id: i64) -> LookupResult<MovieDetail> {
        if id <= 0 {
            return Err(LookupError::InvalidInput(format!("movie id {id}")));
        }
        let raw: RawDetail = self
            .fetch(
                &format!("movie/{id}"),
                &[("append_to_response", "videos".to_string())],
            )
            .await?;
        raw.into_detail(self.sampler.entropy().as_ref())
    }

    async fn try_search(
        &self,
        query: &str,
        include_adult: bool,
    ) -> LookupResult<Vec<MovieSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::InvalidInput("empty search query".into()));
        }
        let page: ListingPage = self
            .fetch(
                "search/movie",
                &[
                    ("query", query.to_string()),
                    ("include_adult", include_adult.to_string()),
                ],
            )
            .await?;
        if page.results.is_empty() {
            return Err(LookupError::Empty);
        }
        let hits: Vec<MovieSummary> = page
            .results
            .iter()
            .filter_map(RawSummary::from_value)
            .filter_map(RawSummary::into_search_hit)
            .collect();
        if hits.is_empty() {
            return Err(LookupError::Empty);
        }
        Ok(hits)
    }
}

#[async_trait]
impl MovieApi for MovieFinder {
    async fn random_movie(&self, category: Category) -> Option<MovieDetail> {
        let found = settle("random movie", self.try_random(category).await)?;
        info!(%category, movie_id = found.id, title = %found.title, "Picked random movie");
        Some(found)
    }

    async fn movie_by_id(&self, id: i64) -> Option<MovieDetail> {
        settle("movie details", self.try_detail(id).await)
    }

    async fn search(&self, query: &str, include_adult: bool) -> Option<Vec<MovieSummary>> {
        let hits = settle("movie search", self.try_search(query, include_adult).await)?;
        debug!(query = %query, hits = hits.len(), "Search matched");
        Some(hits)
    }
}

/// Returns the id at the drawn index if that entry is valid; otherwise draws
/// the remaining indices of the page without replacement until one is.
fn pick_valid(sampler: &Sampler, results: &[Value], draw: Draw) -> LookupResult<i64> {
    if results.is_empty() {
        return Err(LookupError::Empty);
    }
    let entries: Vec<Option<RawSummary>> = results.iter().map(RawSummary::from_value).collect();
    let valid_id = |i: usize| {
        entries
            .get(i)
            .and_then(Option::as_ref)
            .filter(|s| s.is_valid())
            .and_then(|s| s.id)
    };

    if let Some(id) = valid_id(draw.index) {
        return Ok(id);
    }
    let mut pool: Vec<usize> = (0..entries.len()).filter(|i| *i != draw.index).collect();
    let mut tried = 1;
    while let Some(i) = sampler.take_from(&mut pool) {
        tried += 1;
        if let Some(id) = valid_id(i) {
            debug!(page = draw.page, index = i, tried, "Re-sampled to a valid movie");
            return Ok(id);
        }
    }
    Err(LookupError::Exhausted {
        page: draw.page,
        tried,
    })
}

fn settle<T>(operation: &str, result: LookupResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_expected() => {
            debug!("{} found nothing: {}", operation, e);
            None
        }
        Err(e) => {
            warn!("{} failed: {}", operation, e);
            None
        }
    }
}
