use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use reelpick::app::{build_router, AppState};
use reelpick::models::{Genre, MovieDetail, MovieSummary, Trailer};
use reelpick::{Category, MovieApi};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

struct FakeMovies {
    movie: MovieDetail,
    hits: Vec<MovieSummary>,
    categories: Mutex<Vec<Category>>,
    searches: Mutex<Vec<(String, bool)>>,
}

#[async_trait::async_trait]
impl MovieApi for FakeMovies {
    async fn random_movie(&self, category: Category) -> Option<MovieDetail> {
        self.categories.lock().unwrap().push(category);
        match category {
            Category::Upcoming => None,
            _ => Some(self.movie.clone()),
        }
    }

    async fn movie_by_id(&self, id: i64) -> Option<MovieDetail> {
        (id == self.movie.id).then(|| self.movie.clone())
    }

    async fn search(&self, query: &str, include_adult: bool) -> Option<Vec<MovieSummary>> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), include_adult));
        if query.trim().is_empty() || !query.to_lowercase().contains("wonder") {
            return None;
        }
        Some(self.hits.clone())
    }
}

fn wonder_woman() -> MovieDetail {
    MovieDetail {
        id: 297762,
        title: "Wonder Woman".to_string(),
        overview: "An Amazon princess comes to the world of Man.".to_string(),
        tagline: Some("Power. Grace. Wisdom. Wonder.".to_string()),
        release_date: Some("2017-05-30".to_string()),
        runtime: Some(141),
        vote_average: Some(7.2),
        vote_count: Some(19000),
        revenue: Some(822_854_286),
        genres: vec![Genre {
            name: Some("Action".to_string()),
        }],
        production_companies: vec![],
        production_countries: vec![],
        spoken_languages: vec![],
        poster: Some("https://image.tmdb.org/t/p/w300/imBB.jpg".to_string()),
        trailer: Some(Trailer {
            name: "Official Trailer".to_string(),
            link: "https://www.youtube.com/watch?v=VSB4wGIdDwo".to_string(),
        }),
    }
}

fn wonder_hits() -> Vec<MovieSummary> {
    vec![MovieSummary {
        id: 297762,
        title: "Wonder Woman".to_string(),
        overview: "An Amazon princess comes to the world of Man.".to_string(),
        poster_path: Some("/imBB.jpg".to_string()),
        release_date: Some("2017-05-30".to_string()),
        genres: vec![],
        production_companies: vec![],
        production_countries: vec![],
        spoken_languages: vec![],
    }]
}

fn app_with_fake() -> (Router, Arc<FakeMovies>) {
    let movies = Arc::new(FakeMovies {
        movie: wonder_woman(),
        hits: wonder_hits(),
        categories: Mutex::new(Vec::new()),
        searches: Mutex::new(Vec::new()),
    });
    let router = build_router(AppState {
        movies: movies.clone(),
    });
    (router, movies)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = to_bytes(res.into_body(), 1024 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_is_ok() {
    let (app, _) = app_with_fake();
    let res = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn random_movie_by_category_slug() {
    let (app, movies) = app_with_fake();
    let res = app
        .clone()
        .oneshot(get("/movies/random/top-rated"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["title"], "Wonder Woman");
    assert_eq!(
        body["trailer"]["link"],
        "https://www.youtube.com/watch?v=VSB4wGIdDwo"
    );

    let res = app.oneshot(get("/movies/random/popular")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        *movies.categories.lock().unwrap(),
        vec![Category::TopRated, Category::Popular]
    );
}

#[tokio::test]
async fn absent_random_movie_is_not_found() {
    let (app, _) = app_with_fake();
    let res = app.oneshot(get("/movies/random/upcoming")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = json_body(res).await;
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn unknown_category_is_bad_request() {
    let (app, movies) = app_with_fake();
    let res = app.oneshot(get("/movies/random/latest")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(movies.categories.lock().unwrap().is_empty());
}

#[tokio::test]
async fn movie_by_id_round_trip() {
    let (app, _) = app_with_fake();
    let res = app.clone().oneshot(get("/movies/297762")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["id"], 297762);
    assert_eq!(body["poster"], "https://image.tmdb.org/t/p/w300/imBB.jpg");

    let res = app.oneshot(get("/movies/42")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_movie_id_is_json_bad_request() {
    let (app, _) = app_with_fake();
    let res = app.oneshot(get("/movies/abc")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn search_passes_query_and_adult_flag() {
    let (app, movies) = app_with_fake();
    let res = app
        .clone()
        .oneshot(get("/search?query=wonder%20woman&include_adult=true"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body[0]["title"], "Wonder Woman");

    let res = app.oneshot(get("/search?query=zzz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    assert_eq!(
        *movies.searches.lock().unwrap(),
        vec![
            ("wonder woman".to_string(), true),
            ("zzz".to_string(), false)
        ]
    );
}

#[tokio::test]
async fn search_without_query_is_not_found() {
    let (app, _) = app_with_fake();
    let res = app.oneshot(get("/search")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
