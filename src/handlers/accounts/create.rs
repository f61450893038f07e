// handlers/accounts/create.rs - POST /api/accounts handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::app::AppState;
use crate::database::models::account::CreatedAccount;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::AccountInput;

/**
 * POST /api/accounts - Create a new account
 *
 * Expected Input:
 * ```json
 * {
 *   "email": "string",      // Required: local@domain.tld, unique
 *   "firstName": "string",  // Required: 2-50 characters
 *   "lastName": "string"    // Required: 2-50 characters
 * }
 * ```
 *
 * @returns 201 with { id, email, firstName, lastName, createdAt }
 *          400 on validation failure, 409 when the email is taken
 */
pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<AccountInput>, JsonRejection>,
) -> ApiResult<CreatedAccount> {
    let Json(input) = payload?;
    let account = state.accounts.create(&input).await?;
    Ok(ApiResponse::created(account))
}
