//! Domain models

pub mod book;
pub mod identity;
pub mod import;
pub mod loan;

pub use book::{Book, BookField};
pub use identity::{Identity, Role};
pub use import::ImportOutcome;
pub use loan::{CreateLoan, LendOutcome, Loan, LoanView};
