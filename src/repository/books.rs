//! Books repository for database operations

use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{Book, BookField},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: SqlitePool,
}

impl BooksRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new book
    pub async fn insert(&self, book: &Book) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, genre, location_tag, total_copies)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(&book.location_tag)
        .bind(book.total_copies)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// List books, optionally filtered by location tag
    pub async fn list(&self, location_tag: Option<&str>) -> AppResult<Vec<Book>> {
        let books = if let Some(tag) = location_tag {
            sqlx::query_as::<_, Book>("SELECT * FROM books WHERE location_tag = ?")
                .bind(tag)
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_as::<_, Book>("SELECT * FROM books")
                .fetch_all(&self.pool)
                .await?
        };

        Ok(books)
    }

    /// Search one field by case-insensitive substring
    pub async fn search(&self, field: BookField, query: &str) -> AppResult<Vec<Book>> {
        let sql = format!("SELECT * FROM books WHERE LOWER({}) LIKE ?", field.column());

        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(format!("%{}%", query.to_lowercase()))
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }
}
