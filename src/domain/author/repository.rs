//! Author repository trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::Author;
use super::fields::{AuthorId, Email};
use super::validation::sanitize_text;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for author persistence.
///
/// Only validated [`Author`] values cross this boundary. Implementations
/// enforce uniqueness of id, email and username.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync + Debug {
    /// Store a new author
    async fn insert(&self, author: &Author) -> Result<(), DomainError>;

    /// Replace every column of an existing author
    async fn update(&self, author: &Author) -> Result<(), DomainError>;

    /// Delete an author, returning whether a row was removed
    async fn delete(&self, id: &AuthorId) -> Result<bool, DomainError>;

    /// Find an author by primary key
    async fn find_by_id(&self, id: &AuthorId) -> Result<Option<Author>, DomainError>;

    /// Find authors with the given email
    async fn find_by_email(&self, email: &Email) -> Result<Vec<Author>, DomainError>;

    /// Find authors whose username contains the fragment
    async fn search_by_username(&self, fragment: &str) -> Result<Vec<Author>, DomainError>;

    /// List all authors
    async fn list(&self) -> Result<Vec<Author>, DomainError>;
}

/// Trim and sanitize a username search fragment
pub fn normalize_search_fragment(fragment: &str) -> Result<String, DomainError> {
    let fragment = sanitize_text(fragment.trim());
    let fragment = fragment.trim();

    if fragment.is_empty() {
        return Err(DomainError::validation("Username search fragment is empty"));
    }

    Ok(fragment.to_string())
}
