//! PostgreSQL author repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::author::{
    normalize_search_fragment, Author, AuthorId, AuthorRepository, Email,
};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str =
    "SELECT id, activation_token, avatar_url, email, password_hash, username FROM author";

/// PostgreSQL implementation of AuthorRepository
#[derive(Debug, Clone)]
pub struct PostgresAuthorRepository {
    pool: PgPool,
}

impl PostgresAuthorRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a select with at most one text parameter
    async fn fetch_many(
        &self,
        sql: &str,
        param: Option<&str>,
        action: &str,
    ) -> Result<Vec<Author>, DomainError> {
        let mut query = sqlx::query(sql);

        if let Some(param) = param {
            query = query.bind(param);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to {}: {}", action, e)))?;

        rows.iter().map(row_to_author).collect()
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn insert(&self, author: &Author) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO author (id, activation_token, avatar_url, email, password_hash, username)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(*author.id().as_uuid())
        .bind(author.activation_token())
        .bind(author.avatar_url())
        .bind(author.email())
        .bind(author.password_hash())
        .bind(author.username())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, author, "insert author"))?;

        Ok(())
    }

    async fn update(&self, author: &Author) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE author
            SET activation_token = $2, avatar_url = $3, email = $4,
                password_hash = $5, username = $6
            WHERE id = $1
            "#,
        )
        .bind(*author.id().as_uuid())
        .bind(author.activation_token())
        .bind(author.avatar_url())
        .bind(author.email())
        .bind(author.password_hash())
        .bind(author.username())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, author, "update author"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Author '{}' not found",
                author.id()
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: &AuthorId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM author WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete author: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: &AuthorId) -> Result<Option<Author>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get author: {}", e)))?;

        row.as_ref().map(row_to_author).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Vec<Author>, DomainError> {
        let sql = format!("{} WHERE email = $1 ORDER BY username", SELECT_COLUMNS);

        self.fetch_many(&sql, Some(email.as_str()), "get authors by email")
            .await
    }

    async fn search_by_username(&self, fragment: &str) -> Result<Vec<Author>, DomainError> {
        let fragment = normalize_search_fragment(fragment)?;
        let pattern = format!("%{}%", escape_like(&fragment));

        let sql = format!(
            r#"{} WHERE username LIKE $1 ESCAPE '\' ORDER BY username"#,
            SELECT_COLUMNS
        );
        self.fetch_many(&sql, Some(&pattern), "search authors by username")
            .await
    }

    async fn list(&self) -> Result<Vec<Author>, DomainError> {
        let sql = format!("{} ORDER BY username", SELECT_COLUMNS);

        self.fetch_many(&sql, None, "list authors").await
    }
}

/// Rows go back through the validating constructor
fn row_to_author(row: &sqlx::postgres::PgRow) -> Result<Author, DomainError> {
    let id: Uuid = row.get("id");
    let activation_token: Option<String> = row.get("activation_token");
    let avatar_url: Option<String> = row.get("avatar_url");
    let email: String = row.get("email");
    let password_hash: String = row.get("password_hash");
    let username: String = row.get("username");

    Author::new(
        AuthorId::from(id),
        activation_token.as_deref(),
        avatar_url.as_deref(),
        &email,
        &password_hash,
        &username,
    )
    .map_err(|e| DomainError::storage(format!("Invalid author '{}' in database: {}", id, e)))
}

fn map_write_error(error: sqlx::Error, author: &Author, action: &str) -> DomainError {
    let unique_constraint = error
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .map(|db| db.constraint().unwrap_or_default().to_string());

    match unique_constraint {
        Some(constraint) => conflict_for(&constraint, author),
        None => DomainError::storage(format!("Failed to {}: {}", action, error)),
    }
}

fn conflict_for(constraint: &str, author: &Author) -> DomainError {
    if constraint.contains("email") {
        DomainError::conflict(format!("Email '{}' already exists", author.email()))
    } else if constraint.contains("username") {
        DomainError::conflict(format!(
            "Username '{}' already exists",
            author.username()
        ))
    } else {
        DomainError::conflict(format!("Author with ID '{}' already exists", author.id()))
    }
}

/// Escape LIKE wildcards so the fragment matches literally
fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
