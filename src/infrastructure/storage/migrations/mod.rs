//! Database migrations for the author table

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations
    async fn run(&self) -> Result<(), DomainError>;

    /// Reverts the last applied migration
    async fn revert(&self) -> Result<(), DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// A single schema change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    /// SQL applied on upgrade
    pub up: &'static str,
    /// SQL applied on revert
    pub down: &'static str,
}

/// Migrations for the author store, in ascending version order
pub fn author_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Create author table",
        up: r#"
            CREATE TABLE IF NOT EXISTS author (
                id UUID PRIMARY KEY,
                activation_token CHAR(32),
                avatar_url VARCHAR(255),
                email VARCHAR(128) NOT NULL UNIQUE,
                password_hash CHAR(97) NOT NULL,
                username VARCHAR(32) NOT NULL UNIQUE
            );
            CREATE INDEX IF NOT EXISTS idx_author_username_pattern
                ON author (username varchar_pattern_ops);
            "#,
        down: r#"
            DROP TABLE IF EXISTS author;
            "#,
    }]
}

/// PostgreSQL migrator tracking applied versions in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    migrations: Vec<Migration>,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool, migrations: Vec<Migration>) -> Self {
        Self { pool, migrations }
    }

    /// Migrator for the author schema
    pub fn for_authors(pool: PgPool) -> Self {
        Self::new(pool, author_migrations())
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DomainError> {
        sqlx::raw_sql(migration.up)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        info!(version = migration.version, "Applied migration: {}", migration.description);
        Ok(())
    }
}

#[async_trait]
impl Migrator for PostgresMigrator {
    async fn run(&self) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        for migration in &self.migrations {
            if !self.is_applied(migration.version).await? {
                self.apply(migration).await?;
            }
        }

        Ok(())
    }

    async fn revert(&self) -> Result<(), DomainError> {
        let Some(version) = self.version().await? else {
            return Ok(());
        };

        let migration = self
            .migrations
            .iter()
            .find(|m| m.version == version)
            .ok_or_else(|| {
                DomainError::configuration(format!("Unknown applied migration {}", version))
            })?;

        sqlx::raw_sql(migration.down)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to revert migration {}: {}", version, e))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(version)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    version, e
                ))
            })?;

        info!(version, "Reverted migration: {}", migration.description);
        Ok(())
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Runs all pending author migrations
pub async fn run_author_migrations(pool: &PgPool) -> Result<(), DomainError> {
    PostgresMigrator::for_authors(pool.clone()).run().await
}
