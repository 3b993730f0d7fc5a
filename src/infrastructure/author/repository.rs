//! In-memory author repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::author::{
    normalize_search_fragment, Author, AuthorId, AuthorRepository, Email,
};
use crate::domain::DomainError;

/// In-memory implementation of AuthorRepository
#[derive(Debug, Default)]
pub struct InMemoryAuthorRepository {
    authors: Arc<RwLock<HashMap<AuthorId, Author>>>,
}

impl InMemoryAuthorRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial authors
    pub fn with_authors(authors: Vec<Author>) -> Self {
        let authors = authors
            .into_iter()
            .map(|author| (*author.id(), author))
            .collect();

        Self {
            authors: Arc::new(RwLock::new(authors)),
        }
    }
}

/// Reject an author whose email or username is taken by a different id
fn check_unique(authors: &HashMap<AuthorId, Author>, author: &Author) -> Result<(), DomainError> {
    for other in authors.values().filter(|a| a.id() != author.id()) {
        if other.email() == author.email() {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                author.email()
            )));
        }

        if other.username() == author.username() {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                author.username()
            )));
        }
    }

    Ok(())
}

fn sorted(mut authors: Vec<Author>) -> Vec<Author> {
    authors.sort_by(|a, b| a.username().cmp(b.username()));
    authors
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn insert(&self, author: &Author) -> Result<(), DomainError> {
        let mut authors = self.authors.write().await;

        if authors.contains_key(author.id()) {
            return Err(DomainError::conflict(format!(
                "Author with ID '{}' already exists",
                author.id()
            )));
        }

        check_unique(&authors, author)?;

        authors.insert(*author.id(), author.clone());
        Ok(())
    }

    async fn update(&self, author: &Author) -> Result<(), DomainError> {
        let mut authors = self.authors.write().await;

        if !authors.contains_key(author.id()) {
            return Err(DomainError::not_found(format!(
                "Author '{}' not found",
                author.id()
            )));
        }

        check_unique(&authors, author)?;

        authors.insert(*author.id(), author.clone());
        Ok(())
    }

    async fn delete(&self, id: &AuthorId) -> Result<bool, DomainError> {
        let mut authors = self.authors.write().await;
        Ok(authors.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &AuthorId) -> Result<Option<Author>, DomainError> {
        let authors = self.authors.read().await;
        Ok(authors.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Vec<Author>, DomainError> {
        let authors = self.authors.read().await;

        let result = authors
            .values()
            .filter(|a| a.email() == email.as_str())
            .cloned()
            .collect();

        Ok(sorted(result))
    }

    async fn search_by_username(&self, fragment: &str) -> Result<Vec<Author>, DomainError> {
        let fragment = normalize_search_fragment(fragment)?;
        let authors = self.authors.read().await;

        let result = authors
            .values()
            .filter(|a| a.username().contains(fragment.as_str()))
            .cloned()
            .collect();

        Ok(sorted(result))
    }

    async fn list(&self) -> Result<Vec<Author>, DomainError> {
        let authors = self.authors.read().await;
        Ok(sorted(authors.values().cloned().collect()))
    }
}
