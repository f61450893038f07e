use sqlx::{Executor, PgPool};
use tracing::info;

use crate::database::manager::DatabaseError;

/// The accounts table. Email uniqueness is also enforced here so concurrent
/// writers that both pass the existence pre-check still cannot store a
/// duplicate. Email has no length cap; any address the validator accepts
/// must be storable. `gen_random_uuid()` is built in from PostgreSQL 13.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email       TEXT         NOT NULL UNIQUE,
    first_name  VARCHAR(50)  NOT NULL,
    last_name   VARCHAR(50)  NOT NULL,
    created_at  TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ  NOT NULL DEFAULT NOW()
);

ALTER TABLE accounts ALTER COLUMN email TYPE TEXT;
"#;

/// Create the accounts table if it is missing
pub async fn init_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    info!("Running database initialization script...");
    pool.execute(SCHEMA_SQL).await?;
    info!("Database initialized successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_column_is_unbounded_and_unique() {
        assert!(SCHEMA_SQL.contains("email       TEXT         NOT NULL UNIQUE"));
        assert!(SCHEMA_SQL.contains("ALTER COLUMN email TYPE TEXT"));
        assert!(!SCHEMA_SQL.contains("VARCHAR(255)"));
    }
}
