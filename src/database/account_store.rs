use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::models::account::{Account, AccountFields};

/// Errors raised by account persistence
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    #[error("Email already in use: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// True when the backend could not be reached at all, as opposed to a
    /// query that reached it and failed.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            StoreError::Database(
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
            )
        )
    }
}

/// Data access for the accounts table. Every method is a single round trip;
/// no transaction spans two calls.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Owner of `email` other than the account `id`
    async fn find_by_email_excluding(
        &self,
        email: &str,
        id: Uuid,
    ) -> Result<Option<Account>, StoreError>;

    /// Insert a new account. Fails with `Conflict` when the email is taken.
    async fn insert(&self, fields: &AccountFields) -> Result<Account, StoreError>;

    /// Replace the mutable fields and refresh `updated_at`. Fails with
    /// `NotFound` for an unknown id and `Conflict` when another account owns
    /// the new email.
    async fn update(&self, id: Uuid, fields: &AccountFields) -> Result<Account, StoreError>;

    /// Hard delete. Fails with `NotFound` for an unknown id.
    async fn remove(&self, id: Uuid) -> Result<(), StoreError>;

    /// Cheap liveness probe against the backend
    async fn ping(&self) -> Result<(), StoreError>;
}

const ACCOUNT_COLUMNS: &str = "id, email, first_name, last_name, created_at, updated_at";

/// PostgreSQL implementation. All user input travels as bind parameters.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        debug!("Looking up account by id {}", id);
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        debug!("Looking up account by email");
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_email_excluding(
        &self,
        email: &str,
        id: Uuid,
    ) -> Result<Option<Account>, StoreError> {
        debug!("Looking up other owner of email for account {}", id);
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1 AND id <> $2"
        ))
        .bind(email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, fields: &AccountFields) -> Result<Account, StoreError> {
        // ON CONFLICT turns a lost race on the unique email into "no row"
        let inserted = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts (email, first_name, last_name, created_at, updated_at)
             VALUES ($1, $2, $3, NOW(), NOW())
             ON CONFLICT (email) DO NOTHING
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&fields.email)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(account) => {
                debug!("Inserted account {}", account.id);
                Ok(account)
            }
            None => {
                warn!("Account insert rejected by unique email constraint");
                Err(StoreError::Conflict(fields.email.clone()))
            }
        }
    }

    async fn update(&self, id: Uuid, fields: &AccountFields) -> Result<Account, StoreError> {
        let result = sqlx::query_as::<_, Account>(&format!(
            "UPDATE accounts
             SET email = $1, first_name = $2, last_name = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&fields.email)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(account)) => {
                debug!("Updated account {}", account.id);
                Ok(account)
            }
            Ok(None) => Err(StoreError::NotFound(id)),
            Err(err) if is_unique_violation(&err) => {
                warn!("Account update rejected by unique email constraint");
                Err(StoreError::Conflict(fields.email.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!("Deleted account {}", id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
