//! Author field validation and normalization

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use validator::ValidateEmail;

/// Exact length of an activation token (hex characters)
pub const ACTIVATION_TOKEN_LENGTH: usize = 32;

/// Maximum length of an avatar URL
pub const MAX_AVATAR_URL_LENGTH: usize = 255;

/// Maximum length of an email address
pub const MAX_EMAIL_LENGTH: usize = 128;

/// Exact length of a stored password hash (hex characters)
pub const PASSWORD_HASH_LENGTH: usize = 97;

/// Maximum length of a username
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Start of a markup tag: `<` followed by a non-space character or end of input
static TAG_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(?:\S|$)").unwrap());

/// Coarse classification of a field failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Value is empty (after trimming/sanitization)
    Empty,
    /// Value does not fit its column
    TooLong,
    /// Value has the wrong shape
    Malformed,
}

/// Why a single field value was rejected
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("value is empty")]
    Empty,

    #[error("value is {actual} characters, maximum is {max}")]
    TooLong { max: usize, actual: usize },

    #[error("value must be exactly {expected} characters, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("{0}")]
    Malformed(String),

    #[error("malformed UUID: {0}")]
    Uuid(#[source] uuid::Error),
}

impl FieldError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }

    /// Classify the failure as empty, too long or malformed
    pub fn kind(&self) -> FieldErrorKind {
        match self {
            Self::Empty => FieldErrorKind::Empty,
            Self::TooLong { .. } => FieldErrorKind::TooLong,
            Self::WrongLength { expected, actual } if actual > expected => {
                FieldErrorKind::TooLong
            }
            Self::WrongLength { .. } | Self::Malformed(_) | Self::Uuid(_) => {
                FieldErrorKind::Malformed
            }
        }
    }
}

/// The author field a validation error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorField {
    Id,
    ActivationToken,
    AvatarUrl,
    Email,
    PasswordHash,
    Username,
}

impl AuthorField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ActivationToken => "activation_token",
            Self::AvatarUrl => "avatar_url",
            Self::Email => "email",
            Self::PasswordHash => "password_hash",
            Self::Username => "username",
        }
    }
}

impl fmt::Display for AuthorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while validating an author
///
/// Every variant is attributable to exactly one field and wraps the
/// underlying [`FieldError`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthorValidationError {
    #[error("Invalid author ID: {0}")]
    InvalidIdentifier(#[source] FieldError),

    #[error("Invalid activation token: {0}")]
    InvalidToken(#[source] FieldError),

    #[error("Invalid avatar URL: {0}")]
    InvalidAvatar(#[source] FieldError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[source] FieldError),

    #[error("Invalid password hash: {0}")]
    InvalidHash(#[source] FieldError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[source] FieldError),
}

impl AuthorValidationError {
    /// The field that failed
    pub fn field(&self) -> AuthorField {
        match self {
            Self::InvalidIdentifier(_) => AuthorField::Id,
            Self::InvalidToken(_) => AuthorField::ActivationToken,
            Self::InvalidAvatar(_) => AuthorField::AvatarUrl,
            Self::InvalidEmail(_) => AuthorField::Email,
            Self::InvalidHash(_) => AuthorField::PasswordHash,
            Self::InvalidUsername(_) => AuthorField::Username,
        }
    }

    /// The underlying reason
    pub fn reason(&self) -> &FieldError {
        match self {
            Self::InvalidIdentifier(e)
            | Self::InvalidToken(e)
            | Self::InvalidAvatar(e)
            | Self::InvalidEmail(e)
            | Self::InvalidHash(e)
            | Self::InvalidUsername(e) => e,
        }
    }

    pub fn kind(&self) -> FieldErrorKind {
        self.reason().kind()
    }
}

/// Strip markup tags and control characters.
///
/// Text without `<` or control characters comes back unchanged.
pub fn sanitize_text(value: &str) -> String {
    strip_tags(value).chars().filter(|c| !c.is_control()).collect()
}

/// Remove every tag, including nested `<` inside a tag, up to its balancing `>`
fn strip_tags(value: &str) -> String {
    let mut stripped = String::with_capacity(value.len());
    let mut pos = 0;

    while let Some(open) = TAG_OPEN.find_at(value, pos) {
        stripped.push_str(&value[pos..open.start()]);
        pos = tag_end(value, open.start());
    }

    stripped.push_str(&value[pos..]);
    stripped
}

/// Byte offset just past the `>` that closes the tag opened at `start`
fn tag_end(value: &str, start: usize) -> usize {
    let mut depth = 0usize;

    for (offset, c) in value[start..].char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return start + offset + 1;
                }
            }
            _ => {}
        }
    }

    value.len()
}

/// Normalize an activation token: trim, lower-case, 32 hex characters
pub fn normalize_activation_token(token: &str) -> Result<String, FieldError> {
    let token = token.trim().to_lowercase();

    if token.is_empty() {
        return Err(FieldError::Empty);
    }

    if !is_hex(&token) {
        return Err(FieldError::malformed(
            "activation token must be hexadecimal",
        ));
    }

    expect_length(&token, ACTIVATION_TOKEN_LENGTH)?;

    Ok(token)
}

/// Normalize an avatar URL: trim, sanitize, at most 255 characters
pub fn normalize_avatar_url(url: &str) -> Result<String, FieldError> {
    let url = sanitize_text(url.trim());
    let url = url.trim();

    if url.is_empty() {
        return Err(FieldError::Empty);
    }

    expect_at_most(url, MAX_AVATAR_URL_LENGTH)?;

    Ok(url.to_string())
}

/// Normalize an email address: trim, address grammar, at most 128 characters
pub fn normalize_email(email: &str) -> Result<String, FieldError> {
    let email = email.trim().to_string();

    if email.is_empty() {
        return Err(FieldError::Empty);
    }

    if !email.validate_email() {
        return Err(FieldError::malformed(format!(
            "'{}' is not a valid email address",
            email
        )));
    }

    if !has_routable_domain(&email) {
        return Err(FieldError::malformed(format!(
            "'{}' has no dotted domain",
            email
        )));
    }

    expect_at_most(&email, MAX_EMAIL_LENGTH)?;

    Ok(email)
}

/// The domain after the last `@` is dotted or an `[ip]` literal
fn has_routable_domain(email: &str) -> bool {
    let domain = email.rsplit_once('@').map_or("", |(_, domain)| domain);
    domain.contains('.') || (domain.starts_with('[') && domain.ends_with(']'))
}

/// Normalize a password hash: trim, lower-case, 97 hex characters.
///
/// Only the storage shape is checked, the hash itself is never computed here.
pub fn normalize_password_hash(hash: &str) -> Result<String, FieldError> {
    let hash = hash.trim().to_lowercase();

    if hash.is_empty() {
        return Err(FieldError::Empty);
    }

    if !is_hex(&hash) {
        return Err(FieldError::malformed("password hash must be hexadecimal"));
    }

    expect_length(&hash, PASSWORD_HASH_LENGTH)?;

    Ok(hash)
}

/// Normalize a username: trim, sanitize, at most 32 characters
pub fn normalize_username(username: &str) -> Result<String, FieldError> {
    let username = sanitize_text(username.trim());
    let username = username.trim();

    if username.is_empty() {
        return Err(FieldError::Empty);
    }

    expect_at_most(username, MAX_USERNAME_LENGTH)?;

    Ok(username.to_string())
}

fn is_hex(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_hexdigit())
}

fn expect_length(value: &str, expected: usize) -> Result<(), FieldError> {
    let actual = value.chars().count();

    if actual != expected {
        return Err(FieldError::WrongLength { expected, actual });
    }

    Ok(())
}

fn expect_at_most(value: &str, max: usize) -> Result<(), FieldError> {
    let actual = value.chars().count();

    if actual > max {
        return Err(FieldError::TooLong { max, actual });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sanitization
    #[test]
    fn test_sanitize_keeps_safe_ascii() {
        let url = "https://creativeimagelicensing.com/how-to-find-non-copyrighted-pictures/";
        assert_eq!(sanitize_text(url), url);
        assert_eq!(sanitize_text("audialb"), "audialb");
        assert_eq!(sanitize_text("o'brien \"quoted\" & co"), "o'brien \"quoted\" & co");
    }

    #[test]
    fn test_sanitize_strips_tags() {
        assert_eq!(sanitize_text("<b>bold</b>"), "bold");
        assert_eq!(sanitize_text("name<script>alert(1)</script>"), "namealert(1)");
        assert_eq!(sanitize_text("open<tag"), "open");
        assert_eq!(sanitize_text("empty<>tag"), "emptytag");
    }

    #[test]
    fn test_sanitize_strips_nested_tags() {
        assert_eq!(sanitize_text("<<script>>x"), "x");
        assert_eq!(sanitize_text("a<b<c>d>e"), "ae");
        assert_eq!(sanitize_text("<b>>text"), ">text");
    }

    #[test]
    fn test_sanitize_keeps_lone_less_than() {
        assert_eq!(sanitize_text("a < b"), "a < b");
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_text("ab\0c\u{7}d"), "abcd");
    }

    // Activation token
    #[test]
    fn test_activation_token_normalized() {
        assert_eq!(
            normalize_activation_token("  F6CAC5F10E4D14BF1CF85CFEC2A0A24C "),
            Ok("f6cac5f10e4d14bf1cf85cfec2a0a24c".to_string())
        );
    }

    #[test]
    fn test_activation_token_wrong_length() {
        assert_eq!(
            normalize_activation_token("abc123"),
            Err(FieldError::WrongLength {
                expected: 32,
                actual: 6
            })
        );
        let long = "a".repeat(33);
        assert_eq!(
            normalize_activation_token(&long).unwrap_err().kind(),
            FieldErrorKind::TooLong
        );
    }

    #[test]
    fn test_activation_token_not_hex() {
        let token = "g".repeat(32);
        assert_eq!(
            normalize_activation_token(&token).unwrap_err().kind(),
            FieldErrorKind::Malformed
        );
    }

    #[test]
    fn test_activation_token_empty() {
        assert_eq!(normalize_activation_token("   "), Err(FieldError::Empty));
    }

    // Avatar URL
    #[test]
    fn test_avatar_url_trimmed() {
        assert_eq!(
            normalize_avatar_url("  https://example.com/a.png  "),
            Ok("https://example.com/a.png".to_string())
        );
    }

    #[test]
    fn test_avatar_url_empty_after_sanitization() {
        assert_eq!(normalize_avatar_url("<img>"), Err(FieldError::Empty));
        assert_eq!(normalize_avatar_url(""), Err(FieldError::Empty));
    }

    #[test]
    fn test_avatar_url_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(250));
        assert_eq!(
            normalize_avatar_url(&url),
            Err(FieldError::TooLong {
                max: 255,
                actual: 270
            })
        );
    }

    // Email
    #[test]
    fn test_email_trimmed() {
        assert_eq!(normalize_email("  a@b.com "), Ok("a@b.com".to_string()));
    }

    #[test]
    fn test_email_invalid() {
        for email in ["not-an-email", "missing@", "@nodomain.com", "two@@b.com"] {
            assert_eq!(
                normalize_email(email).unwrap_err().kind(),
                FieldErrorKind::Malformed,
                "{} should be rejected",
                email
            );
        }
        assert_eq!(normalize_email(""), Err(FieldError::Empty));
    }

    #[test]
    fn test_email_requires_dotted_domain() {
        for email in ["a@b", "audialb@yahoo"] {
            assert_eq!(
                normalize_email(email).unwrap_err().kind(),
                FieldErrorKind::Malformed,
                "{} should be rejected",
                email
            );
        }
        assert!(normalize_email("audialb@yahoo.com").is_ok());
    }

    #[test]
    fn test_email_length_limit() {
        let at_limit = format!("{}@{}.{}.com", "a".repeat(60), "b".repeat(32), "c".repeat(30));
        assert_eq!(at_limit.len(), 128);
        assert!(normalize_email(&at_limit).is_ok());

        let too_long = format!("{}@{}.{}.com", "a".repeat(60), "b".repeat(32), "c".repeat(31));
        assert_eq!(too_long.len(), 129);
        assert_eq!(
            normalize_email(&too_long),
            Err(FieldError::TooLong {
                max: 128,
                actual: 129
            })
        );
    }

    // Password hash
    #[test]
    fn test_password_hash_exact_length() {
        let hash = "A".repeat(97);
        assert_eq!(normalize_password_hash(&hash), Ok("a".repeat(97)));
    }

    #[test]
    fn test_password_hash_wrong_length() {
        assert_eq!(
            normalize_password_hash(&"a".repeat(96)).unwrap_err().kind(),
            FieldErrorKind::Malformed
        );
        assert_eq!(
            normalize_password_hash(&"a".repeat(98)).unwrap_err().kind(),
            FieldErrorKind::TooLong
        );
    }

    #[test]
    fn test_password_hash_not_hex() {
        let hash = format!("{}z", "a".repeat(96));
        assert_eq!(
            normalize_password_hash(&hash).unwrap_err().kind(),
            FieldErrorKind::Malformed
        );
        assert_eq!(normalize_password_hash(" "), Err(FieldError::Empty));
    }

    // Username
    #[test]
    fn test_username_trimmed() {
        assert_eq!(normalize_username("  audialb  "), Ok("audialb".to_string()));
    }

    #[test]
    fn test_username_whitespace_only() {
        assert_eq!(normalize_username("    "), Err(FieldError::Empty));
        assert_eq!(normalize_username(" <br> "), Err(FieldError::Empty));
    }

    #[test]
    fn test_username_too_long() {
        assert!(normalize_username(&"u".repeat(32)).is_ok());
        assert_eq!(
            normalize_username(&"u".repeat(33)),
            Err(FieldError::TooLong {
                max: 32,
                actual: 33
            })
        );
    }

    #[test]
    fn test_error_attribution() {
        let error = AuthorValidationError::InvalidEmail(FieldError::Empty);
        assert_eq!(error.field(), AuthorField::Email);
        assert_eq!(error.kind(), FieldErrorKind::Empty);
        assert_eq!(error.to_string(), "Invalid email: value is empty");
    }
}
