//! Book model and search field types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Book record from the catalog.
///
/// `total_copies` is the full holding for the title; how many are out at a
/// given moment is derived from the lending ledger, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub location_tag: String,
    pub total_copies: i64,
}

/// Searchable catalog fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookField {
    Title,
    Author,
    Genre,
    Location,
}

impl BookField {
    /// Column backing this field in the books table.
    pub(crate) fn column(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::Location => "location_tag",
        }
    }
}
