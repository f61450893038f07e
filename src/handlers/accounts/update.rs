// handlers/accounts/update.rs - PUT /api/accounts/:id handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::account::UpdatedAccount;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::AccountInput;

/// PUT /api/accounts/:id - Replace email and names of an existing account.
///
/// Body is validated before the id is looked at, so a bad body on an
/// unknown id is still a 400. Keeping the account's current email is not a
/// conflict. Responds 200 with `{ id, email, firstName, lastName, updatedAt }`.
pub async fn update_put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AccountInput>, JsonRejection>,
) -> ApiResult<UpdatedAccount> {
    let Json(input) = payload?;
    let account = state.accounts.update(&id, &input).await?;
    Ok(ApiResponse::success(account))
}
