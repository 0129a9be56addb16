//! End-to-end metadata flow against a mocked OMDb endpoint.
//!
//! These tests wire the real [`OmdbProvider`] into the collection manager
//! so the whole path from HTTP lookup to stored rows is exercised.

use std::sync::Arc;

use assert_matches::assert_matches;
use cinelog::collection::CollectionManager;
use cinelog::metadata::OmdbProvider;
use cinelog_core::Error;
use cinelog_db::pool::{init_memory_pool, DbPool};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager_for(server: &MockServer) -> (CollectionManager, DbPool) {
    let db = init_memory_pool().unwrap();
    let provider = Arc::new(OmdbProvider::with_base_url(
        "test-key".to_string(),
        server.uri(),
    ));
    (CollectionManager::new(db.clone(), provider), db)
}

fn count(db: &DbPool, table: &str) -> i64 {
    let conn = db.get().unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[tokio::test]
async fn add_movie_stores_normalized_omdb_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("apikey", "test-key"))
        .and(query_param("t", "inception"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Title": "Inception",
            "Year": "2010",
            "imdbRating": "8.8",
            "Poster": "N/A",
            "Director": "Christopher Nolan",
            "imdbID": "tt1375666",
            "Response": "True"
        })))
        .mount(&server)
        .await;

    let (manager, db) = manager_for(&server);
    let alice = manager.add_user("alice").unwrap();

    let view = manager.add_movie(alice.id, "inception").await.unwrap();

    // The provider's canonical spelling wins over what the user typed.
    assert_eq!(view.name, "Inception");
    assert_eq!(view.title, "Inception");
    assert_eq!(view.director.as_deref(), Some("Christopher Nolan"));
    assert_eq!(view.year, Some(2010));
    assert_eq!(view.rating, Some(8.8));
    assert_eq!(view.poster_url, None);
    assert_eq!(
        view.imdb_link.as_deref(),
        Some("https://www.imdb.com/title/tt1375666/")
    );

    let conn = db.get().unwrap();
    let stored: String = conn
        .query_row("SELECT name FROM movies", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stored, "Inception");
}

#[tokio::test]
async fn provider_miss_leaves_no_rows_behind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Response": "False",
            "Error": "Movie not found!"
        })))
        .mount(&server)
        .await;

    let (manager, db) = manager_for(&server);
    let alice = manager.add_user("alice").unwrap();

    let err = manager.add_movie(alice.id, "No Such Film").await.unwrap_err();

    assert_matches!(err, Error::Metadata(_));
    assert_eq!(count(&db, "movies"), 0);
    assert_eq!(count(&db, "user_movies"), 0);
}

#[tokio::test]
async fn provider_outage_is_a_metadata_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (manager, db) = manager_for(&server);
    let alice = manager.add_user("alice").unwrap();

    let err = manager.add_movie(alice.id, "Heat").await.unwrap_err();

    assert_matches!(err, Error::Metadata(_));
    assert_eq!(count(&db, "movies"), 0);
}

#[tokio::test]
async fn canonical_title_from_provider_deduplicates() {
    let server = MockServer::start().await;
    // OMDb resolves the partial query to its canonical title.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Title": "The Godfather",
            "Year": "1972",
            "imdbRating": "9.2",
            "Poster": "N/A",
            "Director": "Francis Ford Coppola",
            "imdbID": "tt0068646",
            "Response": "True"
        })))
        .mount(&server)
        .await;

    let (manager, db) = manager_for(&server);
    let alice = manager.add_user("alice").unwrap();
    let bob = manager.add_user("bob").unwrap();

    manager.add_movie(alice.id, "godfather").await.unwrap();
    // Bob types the canonical title; the stored record is reused without
    // another insert even though the queried strings differ.
    manager.add_movie(bob.id, "The Godfather").await.unwrap();

    assert_eq!(count(&db, "movies"), 1);
    assert_eq!(count(&db, "user_movies"), 2);
}
