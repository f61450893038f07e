pub mod account_store;
pub mod manager;
pub mod memory;
pub mod models;
pub mod schema;

pub use account_store::{AccountStore, PgAccountStore, StoreError};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryAccountStore;
pub use models::account::{Account, AccountFields, CreatedAccount, UpdatedAccount};
