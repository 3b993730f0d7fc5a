//! Author registry
//!
//! Validated author entities for the bootcamp site:
//! - Per-field normalization and validation with field-attributed errors
//! - An immutable `Author` value that never serializes its password hash
//! - In-memory and PostgreSQL repositories behind one async trait
//! - Configuration, structured logging and schema migrations

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::author::{Author, AuthorFields, AuthorId, AuthorRepository, AuthorValidationError};
pub use domain::DomainError;
pub use infrastructure::author::{AuthorService, AuthorServiceError};
