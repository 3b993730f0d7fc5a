//! Author service for registration and profile management

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::author::{
    Author, AuthorFields, AuthorId, AuthorRepository, AuthorValidationError, Email,
};
use crate::domain::DomainError;

/// Errors returned by [`AuthorService`].
///
/// Input-shape failures and persistence failures stay in separate variants.
#[derive(Debug, Error)]
pub enum AuthorServiceError {
    #[error(transparent)]
    Validation(#[from] AuthorValidationError),

    #[error(transparent)]
    Repository(#[from] DomainError),

    #[error("Activation token does not match for author '{0}'")]
    TokenMismatch(AuthorId),
}

impl AuthorServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Author service tying validation to persistence
pub struct AuthorService<R: AuthorRepository> {
    repository: Arc<R>,
}

impl<R: AuthorRepository> AuthorService<R> {
    /// Create a new author service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate raw fields and store the resulting author
    pub async fn register(&self, fields: AuthorFields) -> Result<Author, AuthorServiceError> {
        let author = fields.validate().inspect_err(|e| {
            debug!(field = %e.field(), error = %e, "Rejected author registration");
        })?;

        self.repository.insert(&author).await?;

        info!(author_id = %author.id(), username = author.username(), "Registered author");
        Ok(author)
    }

    /// Get an author by textual ID
    pub async fn get(&self, id: &str) -> Result<Option<Author>, AuthorServiceError> {
        let id = AuthorId::parse(id)?;
        Ok(self.repository.find_by_id(&id).await?)
    }

    /// Find authors by email
    pub async fn find_by_email(&self, email: &str) -> Result<Vec<Author>, AuthorServiceError> {
        let email = Email::new(email)?;
        Ok(self.repository.find_by_email(&email).await?)
    }

    /// Find authors whose username contains the fragment
    pub async fn search_by_username(
        &self,
        fragment: &str,
    ) -> Result<Vec<Author>, AuthorServiceError> {
        Ok(self.repository.search_by_username(fragment).await?)
    }

    /// List all authors
    pub async fn list(&self) -> Result<Vec<Author>, AuthorServiceError> {
        Ok(self.repository.list().await?)
    }

    /// Change an author's email
    pub async fn change_email(&self, id: &str, email: &str) -> Result<Author, AuthorServiceError> {
        self.modify(id, |author| author.with_email(email)).await
    }

    /// Change an author's username
    pub async fn change_username(
        &self,
        id: &str,
        username: &str,
    ) -> Result<Author, AuthorServiceError> {
        self.modify(id, |author| author.with_username(username)).await
    }

    /// Change or clear an author's avatar URL
    pub async fn change_avatar_url(
        &self,
        id: &str,
        avatar_url: Option<&str>,
    ) -> Result<Author, AuthorServiceError> {
        self.modify(id, |author| author.with_avatar_url(avatar_url))
            .await
    }

    /// Replace the stored password hash
    pub async fn change_password_hash(
        &self,
        id: &str,
        password_hash: &str,
    ) -> Result<Author, AuthorServiceError> {
        self.modify(id, |author| author.with_password_hash(password_hash))
            .await
    }

    /// Confirm an account by consuming its activation token.
    ///
    /// Activating an already active author with any token is a mismatch.
    pub async fn activate(&self, id: &str, token: &str) -> Result<Author, AuthorServiceError> {
        let author = self.load(id).await?;

        if !author.activation_token_matches(token) {
            warn!(author_id = %author.id(), "Activation token mismatch");
            return Err(AuthorServiceError::TokenMismatch(*author.id()));
        }

        let activated = author.without_activation_token();
        self.repository.update(&activated).await?;

        info!(author_id = %activated.id(), "Activated author");
        Ok(activated)
    }

    /// Delete an author
    pub async fn delete(&self, id: &str) -> Result<bool, AuthorServiceError> {
        let id = AuthorId::parse(id)?;
        let deleted = self.repository.delete(&id).await?;

        if deleted {
            info!(author_id = %id, "Deleted author");
        }

        Ok(deleted)
    }

    async fn load(&self, id: &str) -> Result<Author, AuthorServiceError> {
        let id = AuthorId::parse(id)?;

        self.repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Author '{}' not found", id)).into())
    }

    async fn modify<F>(&self, id: &str, change: F) -> Result<Author, AuthorServiceError>
    where
        F: FnOnce(&Author) -> Result<Author, AuthorValidationError>,
    {
        let author = self.load(id).await?;

        let updated = change(&author).inspect_err(|e| {
            debug!(
                author_id = %author.id(),
                field = %e.field(),
                error = %e,
                "Rejected author change"
            );
        })?;

        self.repository.update(&updated).await?;
        Ok(updated)
    }
}
