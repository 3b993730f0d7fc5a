//! Author domain
//!
//! This module provides the validated author entity, the per-field
//! normalization rules and the repository trait for persistence.

mod entity;
mod fields;
mod repository;
mod validation;

pub use entity::{Author, AuthorFields};
pub use fields::{ActivationToken, AuthorId, AvatarUrl, Email, PasswordHash, Username};
pub use repository::{normalize_search_fragment, AuthorRepository};
pub use validation::{
    normalize_activation_token, normalize_avatar_url, normalize_email, normalize_password_hash,
    normalize_username, sanitize_text, AuthorField, AuthorValidationError, FieldError,
    FieldErrorKind, ACTIVATION_TOKEN_LENGTH, MAX_AVATAR_URL_LENGTH, MAX_EMAIL_LENGTH,
    MAX_USERNAME_LENGTH, PASSWORD_HASH_LENGTH,
};

#[cfg(test)]
pub use repository::MockAuthorRepository;
