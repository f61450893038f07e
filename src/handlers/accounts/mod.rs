// handlers/accounts/mod.rs - Account handlers
//
// One file per operation, mounted under /api/accounts by app::app().

pub mod create; // POST   /api/accounts
pub mod delete; // DELETE /api/accounts/:id
pub mod update; // PUT    /api/accounts/:id

pub use create::create_post;
pub use delete::delete_account;
pub use update::update_put;
