pub mod app;
pub mod config;
pub mod error;
pub mod finder;
pub mod models;
pub mod sampler;
pub mod tmdb;

pub use finder::{MovieApi, MovieFinder};
pub use models::{Category, MovieDetail, MovieSummary, Trailer};
