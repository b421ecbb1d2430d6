//! Storage crate: SQLite persistence for feedback events, users and preference profiles.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – FeedbackRecord, FeedbackQuery, FeedbackStats, UserRecord
//! - [`feedback_repo`] – FeedbackRepository (SQLite), implements `FeedbackStore` and `ProfileStore`
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod feedback_repo;
mod models;
mod sqlite_pool;
mod timestamp;


pub use error::StorageError;
pub use feedback_repo::FeedbackRepository;
pub use models::{FeedbackQuery, FeedbackRecord, FeedbackStats, UserRecord};
pub use sqlite_pool::SqlitePoolManager;
