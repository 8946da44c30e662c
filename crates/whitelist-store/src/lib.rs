//! SQLite persistence for application records.

pub mod db;
pub mod sqlite_application_repository;

pub use db::SqliteDatabase;
pub use sqlite_application_repository::SqliteApplicationRepository;
