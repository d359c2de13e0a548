use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};

use super::models::{ActiveModel, Entity};

const SAMPLE_BOOKS: &[(&str, &str, &str, i32)] = &[
    ("The Go Programming Language", "Alan Donovan", "9780134190440", 2015),
    ("Clean Code", "Robert C. Martin", "9780132350884", 2008),
    ("The Pragmatic Programmer", "David Thomas", "9780201616224", 1999),
    ("Design Patterns", "Gang of Four", "9780201633612", 1994),
    ("Refactoring", "Martin Fowler", "9780201485677", 1999),
];

/// Insert the sample catalogue when the table is empty.
///
/// Returns the number of rows inserted.
pub async fn seed_if_empty(db: &DatabaseConnection) -> Result<usize, DbErr> {
    let existing = Entity::find().count(db).await?;
    if existing > 0 {
        tracing::debug!(existing, "books table already populated, skipping seed");
        return Ok(0);
    }

    let rows = SAMPLE_BOOKS
        .iter()
        .map(|(title, author, isbn, year)| ActiveModel {
            title: Set(title.to_string()),
            author: Set(author.to_string()),
            isbn: Set(isbn.to_string()),
            year: Set(*year),
            ..Default::default()
        });

    Entity::insert_many(rows).exec(db).await?;

    tracing::info!(count = SAMPLE_BOOKS.len(), "database seeded with sample books");
    Ok(SAMPLE_BOOKS.len())
}
