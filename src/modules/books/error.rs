use sea_orm::DbErr;
use serde_json::json;
use shelf_http::error::AppError;
use thiserror::Error;

/// Failures of the books service, one variant per way a request can go wrong.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("Invalid book ID")]
    InvalidId(String),

    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Title, Author, and ISBN are required")]
    MissingFields(Vec<&'static str>),

    #[error("Book not found")]
    NotFound(i64),

    #[error("storage error: {0}")]
    Storage(#[from] DbErr),
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::InvalidId(raw) => {
                tracing::debug!(id = %raw, "rejecting non-integer book id");
                AppError::bad_request("Invalid book ID")
            }
            BookError::InvalidJson(source) => {
                tracing::debug!(error = %source, "rejecting malformed JSON body");
                AppError::bad_request("Invalid JSON")
            }
            BookError::MissingFields(fields) => {
                let details = fields
                    .iter()
                    .map(|field| json!({ "field": field, "error": "required" }))
                    .collect();
                AppError::validation(details, "Title, Author, and ISBN are required")
            }
            err @ BookError::NotFound(_) => AppError::not_found(err.to_string()),
            BookError::Storage(source) => {
                AppError::Internal(anyhow::Error::new(source).context("books storage failure"))
            }
        }
    }
}
