use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::account_store::{AccountStore, StoreError};
use crate::database::models::account::{Account, AccountFields};

/// In-process account store. Holds the same contract as the PostgreSQL store,
/// with the email uniqueness check and the write done under one lock.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

fn owner_of<'a>(
    accounts: &'a HashMap<Uuid, Account>,
    email: &str,
    except: Option<Uuid>,
) -> Option<&'a Account> {
    accounts
        .values()
        .find(|a| a.email == email && Some(a.id) != except)
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(owner_of(&accounts, email, None).cloned())
    }

    async fn find_by_email_excluding(
        &self,
        email: &str,
        id: Uuid,
    ) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(owner_of(&accounts, email, Some(id)).cloned())
    }

    async fn insert(&self, fields: &AccountFields) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        if owner_of(&accounts, &fields.email, None).is_some() {
            return Err(StoreError::Conflict(fields.email.clone()));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: fields.email.clone(),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, id: Uuid, fields: &AccountFields) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        if !accounts.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if owner_of(&accounts, &fields.email, Some(id)).is_some() {
            return Err(StoreError::Conflict(fields.email.clone()));
        }

        let account = accounts.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        account.email = fields.email.clone();
        account.first_name = fields.first_name.clone();
        account.last_name = fields.last_name.clone();
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        self.accounts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(email: &str) -> AccountFields {
        AccountFields {
            email: email.to_string(),
            first_name: "Jo".to_string(),
            last_name: "Do".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let store = MemoryAccountStore::new();
        let account = store.insert(&fields("jo@example.com")).await.unwrap();

        assert_eq!(account.created_at, account.updated_at);
        let found = store.find_by_id(account.id).await.unwrap();
        assert_eq!(found, Some(account));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let store = MemoryAccountStore::new();
        store.insert(&fields("jo@example.com")).await.unwrap();

        let err = store.insert(&fields("jo@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_refreshes_updated_at() {
        let store = MemoryAccountStore::new();
        let original = store.insert(&fields("jo@example.com")).await.unwrap();

        let updated = store
            .update(original.id, &fields("jo.new@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
        assert_eq!(updated.email, "jo.new@example.com");
    }

    #[tokio::test]
    async fn update_to_own_email_is_not_a_conflict() {
        let store = MemoryAccountStore::new();
        let original = store.insert(&fields("jo@example.com")).await.unwrap();

        assert!(store.update(original.id, &fields("jo@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn update_to_foreign_email_conflicts() {
        let store = MemoryAccountStore::new();
        store.insert(&fields("taken@example.com")).await.unwrap();
        let mine = store.insert(&fields("mine@example.com")).await.unwrap();

        let err = store
            .update(mine.id, &fields("taken@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        let unchanged = store.find_by_id(mine.id).await.unwrap().unwrap();
        assert_eq!(unchanged, mine);
    }

    #[tokio::test]
    async fn find_by_email_excluding_skips_self() {
        let store = MemoryAccountStore::new();
        let account = store.insert(&fields("jo@example.com")).await.unwrap();

        let hit = store
            .find_by_email_excluding("jo@example.com", account.id)
            .await
            .unwrap();
        assert!(hit.is_none());
        let hit = store
            .find_by_email_excluding("jo@example.com", Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(hit.map(|a| a.id), Some(account.id));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = MemoryAccountStore::new();
        let id = Uuid::new_v4();

        assert!(matches!(
            store.update(id, &fields("jo@example.com")).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.remove(id).await, Err(StoreError::NotFound(_))));
        assert!(store.is_empty().await);
    }
}
