//! Repository layer for database operations

pub mod books;
pub mod identities;
pub mod loans;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::{config::DatabaseConfig, error::AppResult};

/// Schema statements, each idempotent. No foreign key clauses: references
/// between the three tables are kept referential only, deleting a referenced
/// row is a caller hazard rather than a constraint violation.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS identities (
        id BLOB PRIMARY KEY,
        display_name TEXT NOT NULL,
        group_tag TEXT NOT NULL,
        role TEXT NOT NULL,
        password_salt TEXT,
        password_hash TEXT,
        points INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id BLOB PRIMARY KEY,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        genre TEXT,
        location_tag TEXT NOT NULL,
        total_copies INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS loans (
        id BLOB PRIMARY KEY,
        book_id BLOB NOT NULL,
        borrower_id BLOB NOT NULL,
        loan_date TEXT NOT NULL,
        due_date TEXT NOT NULL,
        worksheet_submitted INTEGER NOT NULL DEFAULT 0,
        early_return_bonus_applied INTEGER NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_loans_book ON loans(book_id)",
    "CREATE INDEX IF NOT EXISTS idx_loans_due ON loans(due_date)",
];

/// Main repository struct holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: SqlitePool,
    pub identities: identities::IdentitiesRepository,
    pub books: books::BooksRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository around an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            identities: identities::IdentitiesRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open (creating if missing) the store configured in `config`
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    /// Run the idempotent schema migration
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}
