//! Lectern Classroom Lending Library Core
//!
//! A single-process lending-library data service: book catalog, lending
//! ledger with derived availability accounting, salted-credential identity
//! store, explicit login sessions, and bulk delimited-file importers, all
//! over an embedded SQLite store. There is no presentation layer here; a
//! GUI or CLI embeds [`Services`] and translates its results.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use repository::Repository;
pub use services::Services;
