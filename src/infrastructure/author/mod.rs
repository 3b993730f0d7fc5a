//! Author infrastructure module
//!
//! This module provides repository implementations for authors (in-memory
//! and PostgreSQL) and the author service.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresAuthorRepository;
pub use repository::InMemoryAuthorRepository;
pub use service::{AuthorService, AuthorServiceError};
