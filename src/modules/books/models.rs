use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use super::error::BookError;

/// A stored book. Serialized as the public JSON shape of the API.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    /// Surrogate key assigned by the store
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Unique across all books
    #[sea_orm(unique)]
    pub isbn: String,
    /// Publication year, `0` when unknown
    pub year: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub type Book = Model;

/// Create payload. Any client-supplied `id` is ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NewBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub year: Option<i32>,
}

impl NewBook {
    /// Names of required fields that are absent or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("author", &self.author),
            ("isbn", &self.isbn),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().unwrap_or_default().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Validate and turn the payload into an insertable row.
    pub fn into_active_model(self) -> Result<ActiveModel, BookError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(BookError::MissingFields(missing));
        }

        Ok(ActiveModel {
            title: Set(self.title.unwrap_or_default()),
            author: Set(self.author.unwrap_or_default()),
            isbn: Set(self.isbn.unwrap_or_default()),
            year: Set(self.year.unwrap_or_default()),
            ..Default::default()
        })
    }
}

/// Update payload.
///
/// Empty strings and a zero `year` mean "keep the stored value", exactly like
/// an omitted or `null` field. A field therefore cannot be cleared through an
/// update.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub year: Option<i32>,
}

impl BookPatch {
    /// Merge the patch over `existing`, field by field.
    pub fn apply(self, existing: Book) -> Book {
        Book {
            id: existing.id,
            title: merge_text(self.title, existing.title),
            author: merge_text(self.author, existing.author),
            isbn: merge_text(self.isbn, existing.isbn),
            year: self.year.filter(|year| *year != 0).unwrap_or(existing.year),
        }
    }
}

fn merge_text(candidate: Option<String>, current: String) -> String {
    candidate.filter(|value| !value.is_empty()).unwrap_or(current)
}
