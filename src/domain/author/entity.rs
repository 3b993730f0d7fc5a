//! Author entity and related types

use serde::{Deserialize, Serialize};

use super::fields::{ActivationToken, AuthorId, AvatarUrl, Email, PasswordHash, Username};
use super::validation::AuthorValidationError;

/// Author entity.
///
/// Immutable once built: every field has passed its validation rule, and
/// changing a field produces a new `Author` through the same rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Primary key
    id: AuthorId,
    /// Pending activation credential, absent once activated
    activation_token: Option<ActivationToken>,
    avatar_url: Option<AvatarUrl>,
    /// Unique across authors
    email: Email,
    /// Never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
    /// Unique across authors
    username: Username,
}

impl Author {
    /// Build an author from raw field values.
    ///
    /// Fields are checked in declaration order and the first failure is
    /// returned.
    pub fn new(
        id: AuthorId,
        activation_token: Option<&str>,
        avatar_url: Option<&str>,
        email: &str,
        password_hash: &str,
        username: &str,
    ) -> Result<Self, AuthorValidationError> {
        Ok(Self {
            id,
            activation_token: activation_token.map(ActivationToken::new).transpose()?,
            avatar_url: avatar_url.map(AvatarUrl::new).transpose()?,
            email: Email::new(email)?,
            password_hash: PasswordHash::new(password_hash)?,
            username: Username::new(username)?,
        })
    }

    // Getters

    pub fn id(&self) -> &AuthorId {
        &self.id
    }

    pub fn activation_token(&self) -> Option<&str> {
        self.activation_token.as_ref().map(ActivationToken::as_str)
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_ref().map(AvatarUrl::as_str)
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// True when no activation token is pending
    pub fn is_activated(&self) -> bool {
        self.activation_token.is_none()
    }

    /// Check a candidate against the pending activation token
    pub fn activation_token_matches(&self, candidate: &str) -> bool {
        self.activation_token
            .as_ref()
            .is_some_and(|token| token.matches(candidate))
    }

    // Re-validating setters; each checks only its own field

    pub fn with_activation_token(
        &self,
        token: Option<&str>,
    ) -> Result<Self, AuthorValidationError> {
        Ok(Self {
            activation_token: token.map(ActivationToken::new).transpose()?,
            ..self.clone()
        })
    }

    /// Copy of this author with the activation token cleared
    pub fn without_activation_token(&self) -> Self {
        Self {
            activation_token: None,
            ..self.clone()
        }
    }

    pub fn with_avatar_url(&self, url: Option<&str>) -> Result<Self, AuthorValidationError> {
        Ok(Self {
            avatar_url: url.map(AvatarUrl::new).transpose()?,
            ..self.clone()
        })
    }

    pub fn with_email(&self, email: &str) -> Result<Self, AuthorValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            ..self.clone()
        })
    }

    pub fn with_password_hash(&self, hash: &str) -> Result<Self, AuthorValidationError> {
        Ok(Self {
            password_hash: PasswordHash::new(hash)?,
            ..self.clone()
        })
    }

    pub fn with_username(&self, username: &str) -> Result<Self, AuthorValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            ..self.clone()
        })
    }
}

/// Raw, unvalidated author fields as they arrive from outside
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorFields {
    pub id: String,
    #[serde(default)]
    pub activation_token: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub username: String,
}

impl AuthorFields {
    /// Parse the identifier, then validate the remaining fields in order
    pub fn validate(&self) -> Result<Author, AuthorValidationError> {
        let id = AuthorId::parse(&self.id)?;

        Author::new(
            id,
            self.activation_token.as_deref(),
            self.avatar_url.as_deref(),
            &self.email,
            &self.password_hash,
            &self.username,
        )
    }
}

impl TryFrom<AuthorFields> for Author {
    type Error = AuthorValidationError;

    fn try_from(fields: AuthorFields) -> Result<Self, Self::Error> {
        fields.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::author::validation::{AuthorField, FieldErrorKind};

    const ID: &str = "f7286cc1-5d88-4a91-844e-588cbb940c67";
    const TOKEN: &str = "f6cac5f10e4d14bf1cf85cfec2a0a24c";
    const AVATAR: &str = "https://creativeimagelicensing.com/how-to-find-non-copyrighted-pictures/";
    const EMAIL: &str = "audialb@yahoo.com";
    const HASH: &str = "4a21312be53b16e88c5f78bcfddd16058f773cbc15ead7985b4dcb967dc85c698fcd080fe5ff93a9399c2003084abc3d8";

    fn test_fields() -> AuthorFields {
        AuthorFields {
            id: ID.to_string(),
            activation_token: Some(TOKEN.to_string()),
            avatar_url: Some(AVATAR.to_string()),
            email: EMAIL.to_string(),
            password_hash: HASH.to_string(),
            username: "audialb".to_string(),
        }
    }

    fn create_test_author() -> Author {
        test_fields().validate().unwrap()
    }

    #[test]
    fn test_author_creation() {
        let author = create_test_author();

        assert_eq!(author.id().to_string(), ID);
        assert_eq!(author.activation_token(), Some(TOKEN));
        assert_eq!(author.avatar_url(), Some(AVATAR));
        assert_eq!(author.email(), EMAIL);
        assert_eq!(author.password_hash(), HASH);
        assert_eq!(author.username(), "audialb");
        assert!(!author.is_activated());
    }

    #[test]
    fn test_author_normalizes_fields() {
        let fields = AuthorFields {
            id: ID.to_uppercase(),
            activation_token: Some(format!("  {}  ", TOKEN.to_uppercase())),
            avatar_url: Some(format!(" {} ", AVATAR)),
            email: "  audialb@yahoo.com ".to_string(),
            password_hash: format!(" {} ", HASH.to_uppercase()),
            username: "  audialb  ".to_string(),
        };

        assert_eq!(fields.validate().unwrap(), create_test_author());
    }

    #[test]
    fn test_author_optional_fields_absent() {
        let fields = AuthorFields {
            activation_token: None,
            avatar_url: None,
            ..test_fields()
        };

        let author = Author::try_from(fields).unwrap();
        assert!(author.activation_token().is_none());
        assert!(author.avatar_url().is_none());
        assert!(author.is_activated());
    }

    #[test]
    fn test_author_first_failure_wins() {
        let fields = AuthorFields {
            id: "nope".to_string(),
            email: "also nope".to_string(),
            username: String::new(),
            ..test_fields()
        };
        assert_eq!(fields.validate().unwrap_err().field(), AuthorField::Id);

        let fields = AuthorFields {
            email: "also nope".to_string(),
            username: String::new(),
            ..test_fields()
        };
        assert_eq!(fields.validate().unwrap_err().field(), AuthorField::Email);
    }

    #[test]
    fn test_author_rejects_each_field() {
        let cases = [
            (
                AuthorFields {
                    activation_token: Some("123".to_string()),
                    ..test_fields()
                },
                AuthorField::ActivationToken,
            ),
            (
                AuthorFields {
                    avatar_url: Some("   ".to_string()),
                    ..test_fields()
                },
                AuthorField::AvatarUrl,
            ),
            (
                AuthorFields {
                    email: "audialb".to_string(),
                    ..test_fields()
                },
                AuthorField::Email,
            ),
            (
                AuthorFields {
                    password_hash: HASH[..96].to_string(),
                    ..test_fields()
                },
                AuthorField::PasswordHash,
            ),
            (
                AuthorFields {
                    username: "u".repeat(33),
                    ..test_fields()
                },
                AuthorField::Username,
            ),
        ];

        for (fields, field) in cases {
            assert_eq!(fields.validate().unwrap_err().field(), field);
        }
    }

    #[test]
    fn test_serialization_excludes_password_hash() {
        let author = create_test_author();

        let json = serde_json::to_value(&author).unwrap();
        assert_eq!(json["id"], ID);
        assert_eq!(json["activationToken"], TOKEN);
        assert_eq!(json["avatarUrl"], AVATAR);
        assert_eq!(json["email"], EMAIL);
        assert_eq!(json["username"], "audialb");
        assert!(json.get("passwordHash").is_none());

        let text = serde_json::to_string(&author).unwrap();
        assert!(!text.contains(HASH));
    }

    #[test]
    fn test_serialization_renders_absent_fields_as_null() {
        let author = create_test_author()
            .without_activation_token()
            .with_avatar_url(None)
            .unwrap();

        let json = serde_json::to_value(&author).unwrap();
        assert!(json["activationToken"].is_null());
        assert!(json["avatarUrl"].is_null());
    }

    #[test]
    fn test_deserialize_fields() {
        let json = format!(
            r#"{{"id":"{}","email":"{}","passwordHash":"{}","username":"audialb"}}"#,
            ID, EMAIL, HASH
        );

        let fields: AuthorFields = serde_json::from_str(&json).unwrap();
        let author = fields.validate().unwrap();
        assert_eq!(author.email(), EMAIL);
        assert!(author.activation_token().is_none());
    }

    #[test]
    fn test_with_email_leaves_original_untouched() {
        let author = create_test_author();
        let updated = author.with_email(" new@example.com ").unwrap();

        assert_eq!(updated.email(), "new@example.com");
        assert_eq!(author.email(), EMAIL);
        assert_eq!(updated.username(), author.username());
    }

    #[test]
    fn test_setters_validate_only_their_field() {
        let author = create_test_author();

        let error = author.with_username("").unwrap_err();
        assert_eq!(error.field(), AuthorField::Username);
        assert_eq!(error.kind(), FieldErrorKind::Empty);

        let error = author.with_password_hash("xyz").unwrap_err();
        assert_eq!(error.field(), AuthorField::PasswordHash);

        let error = author.with_activation_token(Some("xyz")).unwrap_err();
        assert_eq!(error.field(), AuthorField::ActivationToken);
    }

    #[test]
    fn test_activation_token_lifecycle() {
        let author = create_test_author();
        assert!(author.activation_token_matches(&TOKEN.to_uppercase()));

        let activated = author.without_activation_token();
        assert!(activated.is_activated());
        assert!(!activated.activation_token_matches(TOKEN));
    }

    #[test]
    fn test_debug_hides_password_hash() {
        let author = create_test_author();
        assert!(!format!("{:?}", author).contains(HASH));
    }
}
