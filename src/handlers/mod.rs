// handlers/mod.rs - HTTP handlers
//
// Handlers stay thin: extract, call AccountService, wrap the result.
// Expected failures come back as ApiError; the envelope is built there.

pub mod accounts; // /api/accounts[/:id]
pub mod system; // / and /health
