use crate::config::ServerConfig;
use crate::finder::{MovieApi, MovieFinder};
use crate::models::Category;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieApi>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
    #[serde(default)]
    include_adult: bool,
}

pub async fn run_server() -> Result<()> {
    let server = ServerConfig::from_env()?;
    let movies: Arc<dyn MovieApi> = Arc::new(MovieFinder::from_env()?);
    let app = build_router(AppState { movies });

    info!("Listening on {}", server.bind_addr);
    let listener = tokio::net::TcpListener::bind(server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", server.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated with an error")?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/movies/random/:category", get(random_movie))
        .route("/movies/:id", get(movie_by_id))
        .route("/search", get(search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn random_movie(State(state): State<AppState>, Path(category): Path<String>) -> Response {
    let category: Category = match category.parse() {
        Ok(c) => c,
        Err(e) => {
            warn!("Rejecting random movie request: {}", e);
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };
    match state.movies.random_movie(category).await {
        Some(movie) => Json(movie).into_response(),
        None => not_found(&format!("No {} movie available right now", category)),
    }
}

async fn movie_by_id(State(state): State<AppState>, Path(raw): Path<String>) -> Response {
    let id: i64 = match raw.trim().parse() {
        Ok(id) => id,
        Err(_) => {
            warn!("Rejecting movie lookup with non-numeric id '{}'", raw);
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Movie id must be an integer, got '{}'", raw),
            );
        }
    };
    match state.movies.movie_by_id(id).await {
        Some(movie) => Json(movie).into_response(),
        None => not_found(&format!("Movie {} not found", id)),
    }
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    match state
        .movies
        .search(&params.query, params.include_adult)
        .await
    {
        Some(hits) => Json(hits).into_response(),
        None => not_found(&format!("No movies match '{}'", params.query.trim())),
    }
}

fn not_found(message: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, message)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": "error", "message": message }))).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
