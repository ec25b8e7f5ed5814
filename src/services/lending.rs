//! Lending ledger service

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    config::LendingConfig,
    error::AppResult,
    models::loan::{CreateLoan, LendOutcome, LoanView},
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    config: LendingConfig,
}

impl LendingService {
    pub fn new(repository: Repository, config: LendingConfig) -> Self {
        Self { repository, config }
    }

    /// Free copies of a book, floored at zero; None when the book does not
    /// exist (reported distinctly from "zero available").
    pub async fn available_count(&self, book_id: Uuid) -> AppResult<Option<i64>> {
        self.repository.loans.available_count(book_id).await
    }

    /// Lend a copy to a borrower, acting on a leader's authority.
    ///
    /// Preconditions check in order, first failure short-circuits, and the
    /// outcome names which one failed. The loan date is today.
    pub async fn lend(
        &self,
        book_id: Uuid,
        borrower_id: Uuid,
        due_date: NaiveDate,
        acting_leader_id: Uuid,
    ) -> AppResult<LendOutcome> {
        let request = CreateLoan {
            book_id,
            borrower_id,
            due_date,
            acting_leader_id,
        };

        let outcome = self.repository.loans.create(&request).await?;
        match outcome {
            LendOutcome::Lent(loan_id) => {
                tracing::info!(%loan_id, %book_id, %borrower_id, "loan created");
            }
            other => {
                tracing::warn!(%book_id, %borrower_id, ?other, "lend rejected");
            }
        }
        Ok(outcome)
    }

    /// Return a loan, leader-gated. Records the worksheet flag and deletes
    /// the loan row, implicitly freeing one copy.
    pub async fn return_loan(
        &self,
        loan_id: Uuid,
        acting_leader_id: Uuid,
        worksheet_submitted: bool,
    ) -> AppResult<bool> {
        let returned = self
            .repository
            .loans
            .return_loan(loan_id, acting_leader_id, worksheet_submitted)
            .await?;
        if returned {
            tracing::info!(%loan_id, "loan returned");
        }
        Ok(returned)
    }

    /// Push a loan's due date forward; `days` defaults from configuration.
    ///
    /// Deliberately does not re-check who is asking: any caller holding a
    /// valid loan id may extend it.
    pub async fn extend(&self, loan_id: Uuid, days: Option<i64>) -> AppResult<bool> {
        let days = days.unwrap_or(self.config.extend_days);
        self.repository.loans.extend(loan_id, days).await
    }

    /// All active loans joined with book and borrower, ordered by ascending
    /// due date.
    pub async fn current_loans(&self, location_tag: Option<&str>) -> AppResult<Vec<LoanView>> {
        self.repository.loans.joined(location_tag, None).await
    }

    /// Loans due within the threshold window (defaults from configuration),
    /// which by construction includes everything already overdue.
    pub async fn due_soon(
        &self,
        days_threshold: Option<i64>,
        location_tag: Option<&str>,
    ) -> AppResult<Vec<LoanView>> {
        let days = days_threshold.unwrap_or(self.config.due_soon_days);
        let cutoff = Utc::now().date_naive() + Duration::days(days);
        self.repository.loans.joined(location_tag, Some(cutoff)).await
    }
}
