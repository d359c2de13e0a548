use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, Unchanged};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::BookError;
use super::models::{ActiveModel, Book, BookPatch, Entity, NewBook};

/// Books persistence operations over an injected connection pool.
#[derive(Clone)]
pub struct BookService {
    db: DatabaseConnection,
}

impl BookService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All books in store order.
    pub async fn list(&self) -> Result<Vec<Book>, BookError> {
        Ok(Entity::find().all(&self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Book, BookError> {
        Entity::find_by_id(storage_key(id)?)
            .one(&self.db)
            .await?
            .ok_or(BookError::NotFound(id))
    }

    /// Validate and insert. Duplicate ISBNs surface as `BookError::Storage`.
    pub async fn create(&self, payload: NewBook) -> Result<Book, BookError> {
        let book = payload.into_active_model()?.insert(&self.db).await?;
        tracing::info!(id = book.id, isbn = %book.isbn, "book created");
        Ok(book)
    }

    /// Merge `patch` over `existing` and write every business column back.
    pub async fn update(&self, existing: Book, patch: BookPatch) -> Result<Book, BookError> {
        let merged = patch.apply(existing);

        let book = ActiveModel {
            id: Unchanged(merged.id),
            title: Set(merged.title),
            author: Set(merged.author),
            isbn: Set(merged.isbn),
            year: Set(merged.year),
        }
        .update(&self.db)
        .await?;

        tracing::info!(id = book.id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> Result<(), BookError> {
        let result = Entity::delete_by_id(storage_key(id)?).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(BookError::NotFound(id));
        }

        tracing::info!(id, "book deleted");
        Ok(())
    }
}

/// Parse a path segment as a book id. A leading sign is accepted.
pub fn parse_id(raw: &str) -> Result<i64, BookError> {
    raw.parse::<i64>()
        .map_err(|_| BookError::InvalidId(raw.to_string()))
}

/// Stored keys are 32-bit; larger ids cannot name a stored book.
fn storage_key(id: i64) -> Result<i32, BookError> {
    i32::try_from(id).map_err(|_| BookError::NotFound(id))
}

/// Decode a request body regardless of its content type.
///
/// The body must be a JSON object; a literal `null` decodes to the payload's
/// default value.
pub fn decode<T>(body: &[u8]) -> Result<T, BookError>
where
    T: DeserializeOwned + Default,
{
    let value: Value = serde_json::from_slice(body).map_err(BookError::InvalidJson)?;

    match value {
        Value::Null => Ok(T::default()),
        Value::Object(_) => serde_json::from_value(value).map_err(BookError::InvalidJson),
        _ => Err(BookError::InvalidJson(serde::de::Error::custom(
            "expected a JSON object",
        ))),
    }
}
