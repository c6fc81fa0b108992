use crate::AppState;
use crate::error::GatewayError;
use crate::models::DeleteResult;
use axum::{
    Json,
    extract::{Path, State},
};

/// 列举存储桶中的全部对象键
///
/// GET /list/files
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<String>>, GatewayError> {
    Ok(Json(state.service.list().await?))
}

/// 删除对象
///
/// DELETE /s3/{id}
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, GatewayError> {
    Ok(Json(state.service.delete(&id).await?))
}
