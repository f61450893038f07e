// handlers/accounts/delete.rs - DELETE /api/accounts/:id handler

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// DELETE /api/accounts/:id - Hard delete; 204 with an empty body, 404 when
/// no such account exists (including on a repeated delete).
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.accounts.delete(&id).await?;
    Ok(ApiResponse::no_content())
}
