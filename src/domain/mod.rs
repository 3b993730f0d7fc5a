//! Domain layer - Author entity, validation rules and repository traits

pub mod author;
pub mod error;

pub use author::{
    ActivationToken, Author, AuthorField, AuthorFields, AuthorId, AuthorRepository,
    AuthorValidationError, AvatarUrl, Email, FieldError, FieldErrorKind, PasswordHash, Username,
};
pub use error::DomainError;
