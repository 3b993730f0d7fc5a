//! Storage infrastructure - connection pool and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{
    author_migrations, run_author_migrations, Migration, Migrator, PostgresMigrator,
};
pub use postgres::connect;
