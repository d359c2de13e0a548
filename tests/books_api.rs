use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shelf_kernel::settings::{DatabaseSettings, Settings};
use tower::ServiceExt;

async fn app_with(database: DatabaseSettings) -> Router {
    let settings = Settings {
        database,
        ..Settings::default()
    };
    shelf_app::bootstrap(settings).await.unwrap().router()
}

async fn app() -> Router {
    app_with(DatabaseSettings::in_memory()).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/api/v1/books", Some(&body.to_string())).await
}

#[tokio::test]
async fn health_is_ok() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn empty_store_lists_empty_array() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn seeded_store_lists_sample_books() {
    let app = app_with(DatabaseSettings {
        seed: true,
        ..DatabaseSettings::in_memory()
    })
    .await;

    let (status, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 5);
    assert_eq!(books[1]["isbn"], "9780132350884");
}

#[tokio::test]
async fn book_lifecycle() {
    let app = app().await;

    let (status, created) = create(
        &app,
        json!({"title": "TDD", "author": "Kent Beck", "isbn": "9780000000001", "year": 2002}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_ne!(id, 0);

    let uri = format!("/api/v1/books/{id}");
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["year"], 2002);

    let (status, updated) = send(&app, Method::PUT, &uri, Some(r#"{"title":"TDD 2nd Ed"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "TDD 2nd Ed");
    assert_eq!(updated["author"], "Kent Beck");
    assert_eq!(updated["isbn"], "9780000000001");
    assert_eq!(updated["year"], 2002);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let app = app().await;
    let (status, created) = create(
        &app,
        json!({"id": 500, "title": "Refactoring", "author": "Martin Fowler", "isbn": "9780201485677"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(created["id"], 500);
    assert_eq!(created["year"], 0);
}

#[tokio::test]
async fn create_with_missing_fields_is_rejected() {
    let app = app().await;
    let (status, body) = create(&app, json!({"title": "X"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(
        body["error"]["details"],
        json!([
            {"field": "author", "error": "required"},
            {"field": "isbn", "error": "required"}
        ])
    );
}

#[tokio::test]
async fn create_matches_lowercase_keys_only() {
    let app = app().await;
    let (status, body) = create(
        &app,
        json!({"Title": "TDD", "Author": "Kent Beck", "ISBN": "9780000000001"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn create_with_empty_strings_is_rejected() {
    let app = app().await;
    let (status, _) = create(&app, json!({"title": "X", "author": "", "isbn": "1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_invalid_json_is_rejected() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/api/v1/books", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid JSON");
}

#[tokio::test]
async fn duplicate_isbn_is_a_server_error() {
    let app = app().await;
    let book = json!({"title": "TDD", "author": "Kent Beck", "isbn": "9780000000001"});

    let (status, _) = create(&app, book.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = create(&app, book).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app().await;
    let uri = "/api/v1/books/999999";

    let (status, _) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::PUT, uri, Some(r#"{"title":"Y"}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ids_beyond_the_key_range_are_not_found() {
    let app = app().await;

    for uri in ["/api/v1/books/2147483648", "/api/v1/books/9999999999"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"]["message"], "Book not found");
        let (status, _) = send(&app, Method::PUT, uri, Some(r#"{"title":"Y"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        let (status, _) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn delete_answers_no_content_as_json() {
    let app = app().await;
    let (_, created) = create(
        &app,
        json!({"title": "TDD", "author": "Kent Beck", "isbn": "9780000000001"}),
    )
    .await;

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/v1/books/{}", created["id"]))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn non_integer_ids_are_bad_requests() {
    let app = app().await;
    let uri = "/api/v1/books/abc";

    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid book ID");
    let (status, _) = send(&app, Method::PUT, uri, Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::DELETE, uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_of_missing_book_is_not_found_even_with_bad_json() {
    let app = app().await;
    let (status, _) = send(&app, Method::PUT, "/api/v1/books/4242", Some("{oops")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_bad_json_is_rejected() {
    let app = app().await;
    let (_, created) = create(
        &app,
        json!({"title": "TDD", "author": "Kent Beck", "isbn": "9780000000001"}),
    )
    .await;

    let uri = format!("/api/v1/books/{}", created["id"]);
    let (status, _) = send(&app, Method::PUT, &uri, Some("{oops")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_cannot_clear_fields() {
    let app = app().await;
    let (_, created) = create(
        &app,
        json!({"title": "TDD", "author": "Kent Beck", "isbn": "9780000000001", "year": 2002}),
    )
    .await;

    let uri = format!("/api/v1/books/{}", created["id"]);
    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(r#"{"title":"","author":"","isbn":"","year":0}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, created);
}

#[tokio::test]
async fn every_response_carries_cors_headers() {
    let app = app().await;
    let request = Request::builder()
        .uri("/api/v1/books/abc")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn preflight_is_answered_without_a_handler() {
    let app = app().await;
    for uri in ["/api/v1/books", "/api/v1/books/1"] {
        let (status, body) = send(&app, Method::OPTIONS, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }
}
