//! PostgreSQL connection pool and error mapping

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// Connect a pool sized from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to database: {}", e)))?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool ready"
    );

    Ok(pool)
}

/// Map a sqlx error, turning unique violations into `Conflict`
pub fn map_write_error(err: sqlx::Error, action: &str, conflict: impl FnOnce() -> String) -> DomainError {
    let is_unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if is_unique {
        DomainError::conflict(conflict())
    } else {
        DomainError::storage(format!("Failed to {}: {}", action, err))
    }
}

/// Name of the violated constraint, if the database reported one
pub fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db| db.constraint())
        .map(str::to_string)
}

pub fn read_error(err: sqlx::Error, action: &str) -> DomainError {
    DomainError::storage(format!("Failed to {}: {}", action, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_storage() {
        let err = map_write_error(sqlx::Error::RowNotFound, "create user", || {
            "duplicate".to_string()
        });
        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(violated_constraint(&sqlx::Error::RowNotFound).is_none());
    }
}
