use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use shelf_http::error::AppError;

use super::models::{Book, BookPatch, NewBook};
use super::service::{decode, parse_id, BookService};

/// Routes for the books collection, relative to the module mount point.
pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(service)
}

async fn list_books(State(service): State<BookService>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(service.list().await?))
}

async fn get_book(
    State(service): State<BookService>,
    Path(raw_id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(&raw_id)?;
    Ok(Json(service.get(id).await?))
}

async fn create_book(
    State(service): State<BookService>,
    body: Bytes,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let payload: NewBook = decode(&body)?;
    let book = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(service): State<BookService>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(&raw_id)?;
    // Existence is checked before the body is looked at.
    let existing = service.get(id).await?;
    let patch: BookPatch = decode(&body)?;
    Ok(Json(service.update(existing, patch).await?))
}

async fn delete_book(
    State(service): State<BookService>,
    Path(raw_id): Path<String>,
) -> Result<(StatusCode, [(header::HeaderName, &'static str); 1]), AppError> {
    let id = parse_id(&raw_id)?;
    service.delete(id).await?;
    Ok((
        StatusCode::NO_CONTENT,
        [(header::CONTENT_TYPE, "application/json")],
    ))
}
