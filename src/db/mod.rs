//! Database module providing connection management, migrations, and queries.

pub mod companies;
pub mod evaluations;
pub mod placements;
pub mod requests;
pub mod results_reports;
pub mod site_visits;
pub mod users;
pub mod weekly_logs;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Database connection pool wrapper around SeaORM's `DatabaseConnection`.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Connect to PostgreSQL using the configured database URL.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(20)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(config.is_development());

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool { conn })
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;
        Ok(())
    }

    /// Get access to the underlying connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Wrap an existing connection (used by tests and tooling).
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        DbPool { conn }
    }
}

/// Whether a database error is a unique-constraint violation.
///
/// Get-or-create paths insert first and treat this error as "somebody else
/// won the race"; the caller re-fetches the winner's row.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
