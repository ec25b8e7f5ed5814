//! Loan model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::book::Book;

/// Loan record from the lending ledger.
///
/// A row's existence is the sole source of truth for "this copy is out";
/// returning a loan deletes the row. `early_return_bonus_applied` is stored
/// for external gamification collaborators and never read by the core.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: Uuid,
    pub book_id: Uuid,
    pub borrower_id: Uuid,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub worksheet_submitted: bool,
    pub early_return_bonus_applied: bool,
}

/// Loan with joined details for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanView {
    pub loan: Loan,
    pub book: Book,
    pub borrower_name: String,
    /// Computed at read time by comparing the due date to today.
    pub overdue: bool,
}

/// Create loan request
#[derive(Debug, Clone)]
pub struct CreateLoan {
    pub book_id: Uuid,
    pub borrower_id: Uuid,
    pub due_date: NaiveDate,
    pub acting_leader_id: Uuid,
}

/// Outcome of a lend attempt.
///
/// Failed preconditions are reported distinctly so callers can tell an
/// authorization failure apart from an availability failure. None of the
/// rejections are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LendOutcome {
    /// Loan created; carries the new loan id.
    Lent(Uuid),
    /// Acting identity is not a leader.
    NotAuthorized,
    /// Borrower id does not resolve to an identity.
    NoSuchBorrower,
    /// Book id does not resolve to a catalog record.
    NoSuchBook,
    /// Every copy of the book is already out.
    Unavailable,
}

impl LendOutcome {
    pub fn is_lent(&self) -> bool {
        matches!(self, LendOutcome::Lent(_))
    }
}
