//! Catalog management service

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{Book, BookField},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book to the catalog.
    ///
    /// `total_copies` is trusted to be positive; validating it is the
    /// caller's (or the import pipeline's) job.
    pub async fn add(
        &self,
        title: &str,
        author: &str,
        location_tag: &str,
        genre: Option<&str>,
        total_copies: i64,
    ) -> AppResult<Uuid> {
        let book = Book {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.map(str::to_string),
            location_tag: location_tag.to_string(),
            total_copies,
        };

        self.repository.books.insert(&book).await?;
        tracing::info!(id = %book.id, title, "book added");
        Ok(book.id)
    }

    /// Get book by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        self.repository.books.get_by_id(id).await
    }

    /// List books, optionally filtered by location tag
    pub async fn list(&self, location_tag: Option<&str>) -> AppResult<Vec<Book>> {
        self.repository.books.list(location_tag).await
    }

    /// Case-insensitive substring search over one field. An empty query
    /// matches nothing, not everything.
    pub async fn search(&self, query: &str, field: BookField) -> AppResult<Vec<Book>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.books.search(field, query).await
    }
}
