use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::database::account_store::{AccountStore, StoreError};
use crate::database::models::account::{CreatedAccount, UpdatedAccount};
use crate::validation::{validate_account, AccountInput};

pub const ACCOUNT_NOT_FOUND: &str = "Account not found";
pub const EMAIL_TAKEN: &str = "An account with this email already exists";
pub const EMAIL_IN_USE: &str = "This email is already in use by another account";

/// Outcome of an account operation that did not succeed
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Account not found")]
    NotFound,

    #[error("{0}")]
    Conflict(&'static str),

    #[error(transparent)]
    Backend(StoreError),
}

impl AccountError {
    /// Map a store failure that slipped past the pre-checks (a concurrent
    /// writer got there first) onto the same outcome the pre-check would give.
    fn from_store(err: StoreError, conflict_message: &'static str) -> Self {
        match err {
            StoreError::NotFound(_) => AccountError::NotFound,
            StoreError::Conflict(_) => AccountError::Conflict(conflict_message),
            other => AccountError::Backend(other),
        }
    }
}

/// Account create/update/delete flows. Validation and the not-found and
/// conflict checks are handled here; anything else the store reports is
/// returned as `Backend` for the error boundary.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Validate, reject a taken email, insert
    pub async fn create(&self, input: &AccountInput) -> Result<CreatedAccount, AccountError> {
        let fields = validate_account(input).map_err(AccountError::Validation)?;

        let existing = self
            .store
            .find_by_email(&fields.email)
            .await
            .map_err(AccountError::Backend)?;
        if existing.is_some() {
            return Err(AccountError::Conflict(EMAIL_TAKEN));
        }

        let account = self
            .store
            .insert(&fields)
            .await
            .map_err(|e| AccountError::from_store(e, EMAIL_TAKEN))?;

        info!("Created account {}", account.id);
        Ok(account.into())
    }

    /// Validate, require the account, reject an email owned by someone else,
    /// update. Keeping the current email is never a conflict.
    pub async fn update(
        &self,
        id: &str,
        input: &AccountInput,
    ) -> Result<UpdatedAccount, AccountError> {
        let fields = validate_account(input).map_err(AccountError::Validation)?;
        let id = parse_account_id(id)?;

        let existing = self
            .store
            .find_by_id(id)
            .await
            .map_err(AccountError::Backend)?
            .ok_or(AccountError::NotFound)?;

        if fields.email != existing.email {
            let owner = self
                .store
                .find_by_email_excluding(&fields.email, id)
                .await
                .map_err(AccountError::Backend)?;
            if owner.is_some() {
                return Err(AccountError::Conflict(EMAIL_IN_USE));
            }
        }

        let account = self
            .store
            .update(id, &fields)
            .await
            .map_err(|e| AccountError::from_store(e, EMAIL_IN_USE))?;

        info!("Updated account {}", account.id);
        Ok(account.into())
    }

    /// Require the account, then remove it for good
    pub async fn delete(&self, id: &str) -> Result<(), AccountError> {
        let id = parse_account_id(id)?;

        self.store
            .find_by_id(id)
            .await
            .map_err(AccountError::Backend)?
            .ok_or(AccountError::NotFound)?;

        self.store
            .remove(id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => AccountError::NotFound,
                other => AccountError::Backend(other),
            })?;

        info!("Deleted account {}", id);
        Ok(())
    }

    /// Backend liveness for the health endpoint
    pub async fn health(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}

/// An id that is not a UUID cannot name any stored account
fn parse_account_id(raw: &str) -> Result<Uuid, AccountError> {
    Uuid::parse_str(raw).map_err(|_| AccountError::NotFound)
}
