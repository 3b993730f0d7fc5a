//! Validated author field types

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    normalize_activation_token, normalize_avatar_url, normalize_email, normalize_password_hash,
    normalize_username, AuthorValidationError, FieldError,
};

/// Author identifier - a UUID, rendered in canonical hyphenated form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(Uuid);

impl AuthorId {
    /// Parse an identifier from text.
    ///
    /// Accepts hyphenated or simple form in any letter case.
    pub fn parse(id: &str) -> Result<Self, AuthorValidationError> {
        Uuid::parse_str(id.trim())
            .map(Self)
            .map_err(|e| AuthorValidationError::InvalidIdentifier(FieldError::Uuid(e)))
    }

    /// Generate a new random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The 16 raw bytes as stored
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl From<Uuid> for AuthorId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<AuthorId> for Uuid {
    fn from(id: AuthorId) -> Self {
        id.0
    }
}

impl std::str::FromStr for AuthorId {
    type Err = AuthorValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// One-time activation credential - 32 lower-case hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ActivationToken(String);

impl ActivationToken {
    pub fn new(token: &str) -> Result<Self, AuthorValidationError> {
        normalize_activation_token(token)
            .map(Self)
            .map_err(AuthorValidationError::InvalidToken)
    }

    /// Generate a fresh random token
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Check a candidate token against this one after normalization
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate.trim().to_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Sanitized avatar URL, at most 255 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    pub fn new(url: &str) -> Result<Self, AuthorValidationError> {
        normalize_avatar_url(url)
            .map(Self)
            .map_err(AuthorValidationError::InvalidAvatar)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Email address, at most 128 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(email: &str) -> Result<Self, AuthorValidationError> {
        normalize_email(email)
            .map(Self)
            .map_err(AuthorValidationError::InvalidEmail)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored password hash - 97 lower-case hex characters.
///
/// Has no `Serialize` impl and is redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: &str) -> Result<Self, AuthorValidationError> {
        normalize_password_hash(hash)
            .map(Self)
            .map_err(AuthorValidationError::InvalidHash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Sanitized username, at most 32 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(username: &str) -> Result<Self, AuthorValidationError> {
        normalize_username(username)
            .map(Self)
            .map_err(AuthorValidationError::InvalidUsername)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
