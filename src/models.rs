use crate::error::{LookupError, LookupResult};
use crate::sampler::{Entropy, PAGE_SIZE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w300";
pub const YOUTUBE_WATCH: &str = "https://www.youtube.com/watch?v=";
pub const VIMEO_BASE: &str = "https://vimeo.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Upcoming,
    TopRated,
    Popular,
}

impl Category {
    pub fn path(&self) -> &'static str {
        match self {
            Category::Upcoming => "movie/upcoming",
            Category::TopRated => "movie/top_rated",
            Category::Popular => "movie/popular",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Upcoming => "upcoming",
            Category::TopRated => "top-rated",
            Category::Popular => "popular",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(Category::Upcoming),
            "top-rated" | "top_rated" | "toprated" => Ok(Category::TopRated),
            "popular" => Ok(Category::Popular),
            other => Err(anyhow::anyhow!(
                "unknown category '{}' (expected upcoming, top-rated or popular)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub name: Option<String>,
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    pub english_name: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub name: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub revenue: Option<u64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    pub poster: Option<String>,
    pub trailer: Option<Trailer>,
}

/// Embedded video entry from the detail endpoint, before trailer selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCandidate {
    pub id: Option<String>,
    pub key: Option<String>,
    pub name: Option<String>,
    pub site: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrailerSite {
    YouTube,
    Vimeo,
}

impl TrailerSite {
    fn parse(site: &str) -> Option<Self> {
        if site.eq_ignore_ascii_case("YouTube") {
            Some(TrailerSite::YouTube)
        } else if site.eq_ignore_ascii_case("Vimeo") {
            Some(TrailerSite::Vimeo)
        } else {
            None
        }
    }

    fn link(&self, key: &str) -> String {
        match self {
            TrailerSite::YouTube => format!("{YOUTUBE_WATCH}{key}"),
            TrailerSite::Vimeo => format!("{VIMEO_BASE}{key}"),
        }
    }
}

impl VideoCandidate {
    // Names that are only brackets clean down to nothing and don't count.
    fn playable(&self) -> Option<(TrailerSite, &str, String)> {
        let site = TrailerSite::parse(self.site.as_deref()?)?;
        let key = non_empty(self.key.as_deref())?;
        let name = clean_trailer_name(self.name.as_deref()?);
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((site, key, name.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingPage {
    #[serde(default)]
    pub results: Vec<Value>,
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawSummary {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub genres: Option<Vec<Genre>>,
    pub production_companies: Option<Vec<ProductionCompany>>,
    pub production_countries: Option<Vec<ProductionCountry>>,
    pub spoken_languages: Option<Vec<SpokenLanguage>>,
}

impl RawSummary {
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Eligible for random selection: positive id plus non-empty poster,
    /// title and overview.
    pub fn is_valid(&self) -> bool {
        self.id.is_some_and(|id| id > 0)
            && non_empty(self.poster_path.as_deref()).is_some()
            && non_empty(self.title.as_deref()).is_some()
            && non_empty(self.overview.as_deref()).is_some()
    }

    pub fn into_search_hit(self) -> Option<MovieSummary> {
        Some(MovieSummary {
            id: self.id?,
            title: self.title?,
            overview: self.overview?,
            poster_path: self.poster_path,
            release_date: self.release_date,
            genres: bounded(self.genres),
            production_companies: bounded(self.production_companies),
            production_countries: bounded(self.production_countries),
            spoken_languages: bounded(self.spoken_languages),
        })
    }
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<VideoCandidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDetail {
    #[serde(flatten)]
    summary: RawSummary,
    runtime: Option<u32>,
    tagline: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<u64>,
    revenue: Option<u64>,
    videos: Option<VideoList>,
}

impl RawDetail {
    pub fn into_detail(self, entropy: &dyn Entropy) -> LookupResult<MovieDetail> {
        let RawDetail {
            summary,
            runtime,
            tagline,
            vote_average,
            vote_count,
            revenue,
            videos,
        } = self;

        let id = summary
            .id
            .filter(|id| *id > 0)
            .ok_or_else(|| LookupError::Malformed("detail has no valid id".into()))?;
        let title = summary
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| LookupError::Malformed(format!("movie {id} has no title")))?;
        let overview = summary
            .overview
            .filter(|o| !o.trim().is_empty())
            .ok_or_else(|| LookupError::Malformed(format!("movie {id} has no overview")))?;

        let candidates = videos.map(|v| v.results).unwrap_or_default();
        let trailer = select_trailer(&candidates, entropy);

        Ok(MovieDetail {
            id,
            title,
            overview,
            tagline: tagline.filter(|t| !t.trim().is_empty()),
            release_date: summary.release_date,
            runtime,
            vote_average,
            vote_count,
            revenue,
            genres: bounded(summary.genres),
            production_companies: bounded(summary.production_companies),
            production_countries: bounded(summary.production_countries),
            spoken_languages: bounded(summary.spoken_languages),
            poster: poster_url(summary.poster_path.as_deref()),
            trailer,
        })
    }
}

pub fn poster_url(path: Option<&str>) -> Option<String> {
    let path = non_empty(path)?;
    if path.starts_with('/') {
        Some(format!("{POSTER_BASE}{path}"))
    } else {
        Some(format!("{POSTER_BASE}/{path}"))
    }
}

pub fn clean_trailer_name(name: &str) -> String {
    name.chars().filter(|c| !matches!(c, '[' | ']')).collect()
}

pub fn select_trailer(videos: &[VideoCandidate], entropy: &dyn Entropy) -> Option<Trailer> {
    let mut playable: Vec<_> = videos.iter().filter_map(|v| v.playable()).collect();
    let chosen = match playable.len() {
        0 => return None,
        1 => 0,
        n => entropy.below(n).min(n - 1),
    };
    let (site, key, name) = playable.swap_remove(chosen);
    Some(Trailer {
        name,
        link: site.link(key),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn bounded<T>(list: Option<Vec<T>>) -> Vec<T> {
    let mut list = list.unwrap_or_default();
    list.truncate(PAGE_SIZE);
    list
}
