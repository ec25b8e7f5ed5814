//! Loans repository for database operations

use chrono::{Duration, NaiveDate, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::Book,
        identity::Role,
        loan::{CreateLoan, LendOutcome, Loan, LoanView},
    },
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: SqlitePool,
}

impl LoansRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(loan)
    }

    /// Count active loans for a book
    pub async fn count_active_for_book(&self, book_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = ?")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Free copies of a book, floored at zero; None when the book itself
    /// does not exist. Derived by counting active loan rows, never cached.
    pub async fn available_count(&self, book_id: Uuid) -> AppResult<Option<i64>> {
        let total: Option<i64> = sqlx::query_scalar("SELECT total_copies FROM books WHERE id = ?")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(total) = total else {
            return Ok(None);
        };

        let active = self.count_active_for_book(book_id).await?;
        Ok(Some((total - active).max(0)))
    }

    /// Create a new loan after checking the precondition chain.
    ///
    /// Checks run in order and the first failure short-circuits: acting
    /// identity holds the leader role, borrower exists, book exists, a copy
    /// is free. The whole read-then-check-then-insert sequence runs inside
    /// one transaction so the availability invariant holds under concurrent
    /// callers.
    pub async fn create(&self, request: &CreateLoan) -> AppResult<LendOutcome> {
        let mut tx = self.pool.begin().await?;

        let role: Option<Role> = sqlx::query_scalar("SELECT role FROM identities WHERE id = ?")
            .bind(request.acting_leader_id)
            .fetch_optional(&mut *tx)
            .await?;
        if role != Some(Role::Leader) {
            return Ok(LendOutcome::NotAuthorized);
        }

        let borrower_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM identities WHERE id = ?)")
                .bind(request.borrower_id)
                .fetch_one(&mut *tx)
                .await?;
        if !borrower_exists {
            return Ok(LendOutcome::NoSuchBorrower);
        }

        let total: Option<i64> = sqlx::query_scalar("SELECT total_copies FROM books WHERE id = ?")
            .bind(request.book_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(total) = total else {
            return Ok(LendOutcome::NoSuchBook);
        };

        let active: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = ?")
            .bind(request.book_id)
            .fetch_one(&mut *tx)
            .await?;
        if active >= total {
            return Ok(LendOutcome::Unavailable);
        }

        let loan_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO loans (
                id, book_id, borrower_id, loan_date, due_date,
                worksheet_submitted, early_return_bonus_applied
            ) VALUES (?, ?, ?, ?, ?, 0, 0)
            "#,
        )
        .bind(loan_id)
        .bind(request.book_id)
        .bind(request.borrower_id)
        .bind(Utc::now().date_naive())
        .bind(request.due_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(LendOutcome::Lent(loan_id))
    }

    /// Return a loan: leader-gated, records the worksheet flag, then deletes
    /// the row (which implicitly frees one copy).
    pub async fn return_loan(
        &self,
        loan_id: Uuid,
        acting_leader_id: Uuid,
        worksheet_submitted: bool,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let role: Option<Role> = sqlx::query_scalar("SELECT role FROM identities WHERE id = ?")
            .bind(acting_leader_id)
            .fetch_optional(&mut *tx)
            .await?;
        if role != Some(Role::Leader) {
            return Ok(false);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE id = ?)")
            .bind(loan_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Ok(false);
        }

        // Record the flag before dropping the row, for collaborators that
        // observe the store transactionally.
        sqlx::query("UPDATE loans SET worksheet_submitted = ? WHERE id = ?")
            .bind(worksheet_submitted)
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM loans WHERE id = ?")
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Push a loan's due date forward by `days`
    pub async fn extend(&self, loan_id: Uuid, days: i64) -> AppResult<bool> {
        let Some(loan) = self.get_by_id(loan_id).await? else {
            return Ok(false);
        };

        let Some(new_due) = loan.due_date.checked_add_signed(Duration::days(days)) else {
            return Ok(false);
        };

        let result = sqlx::query("UPDATE loans SET due_date = ? WHERE id = ?")
            .bind(new_due)
            .bind(loan_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Joined view of active loans ordered by ascending due date, optionally
    /// limited to books with a given location tag and/or to due dates at or
    /// before a cutoff.
    pub async fn joined(
        &self,
        location_tag: Option<&str>,
        due_before: Option<NaiveDate>,
    ) -> AppResult<Vec<LoanView>> {
        let mut conditions = Vec::new();
        if location_tag.is_some() {
            conditions.push("b.location_tag = ?");
        }
        if due_before.is_some() {
            conditions.push("l.due_date <= ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            r#"
            SELECT l.id, l.book_id, l.borrower_id, l.loan_date, l.due_date,
                   l.worksheet_submitted, l.early_return_bonus_applied,
                   b.title, b.author, b.genre, b.location_tag, b.total_copies,
                   i.display_name AS borrower_name
            FROM loans l
            JOIN books b ON l.book_id = b.id
            JOIN identities i ON l.borrower_id = i.id
            {}
            ORDER BY l.due_date
            "#,
            where_clause
        );

        let mut builder = sqlx::query(&query);
        if let Some(tag) = location_tag {
            builder = builder.bind(tag);
        }
        if let Some(cutoff) = due_before {
            builder = builder.bind(cutoff);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        let today = Utc::now().date_naive();

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let due_date: NaiveDate = row.get("due_date");
            result.push(LoanView {
                loan: Loan {
                    id: row.get("id"),
                    book_id: row.get("book_id"),
                    borrower_id: row.get("borrower_id"),
                    loan_date: row.get("loan_date"),
                    due_date,
                    worksheet_submitted: row.get("worksheet_submitted"),
                    early_return_bonus_applied: row.get("early_return_bonus_applied"),
                },
                book: Book {
                    id: row.get("book_id"),
                    title: row.get("title"),
                    author: row.get("author"),
                    genre: row.get("genre"),
                    location_tag: row.get("location_tag"),
                    total_copies: row.get("total_copies"),
                },
                borrower_name: row.get("borrower_name"),
                overdue: due_date < today,
            });
        }

        Ok(result)
    }
}
