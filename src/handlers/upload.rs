use super::constants::{FILES_FIELD, FILES_FIELD_ALIAS, UPLOAD_SUCCESS_MESSAGE};
use crate::AppState;
use crate::config::UploadSettings;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{StagedFile, UploadResult};
use crate::utils::path::{sanitize_file_name, staging_file_name};
use crate::utils::temp::remove_file_if_exists;
use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub status_code: u16,
    pub message: &'static str,
    #[serde(flatten)]
    pub result: UploadResult,
}

/// 处理文件上传请求
///
/// 把 `files[]` 字段逐个流式写入暂存目录，再交给服务层上传。
/// 无论成功与否，返回前都会清理剩余的暂存文件。
///
/// # 请求方法
///
/// POST /upload
///
/// # 返回值
///
/// * `Ok(Json)` - 上传结果，包含短标识符、对象键和原始文件名
/// * `Err(GatewayError)` - 校验失败（422/413）或下游失败（500）
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, GatewayError> {
    let staged = stage_files(&state.uploads, &mut multipart).await?;

    let result = state.service.upload(&staged).await;
    discard_staged(&staged).await;

    Ok(Json(UploadResponse {
        status_code: 200,
        message: UPLOAD_SUCCESS_MESSAGE,
        result: result?,
    }))
}

/// 暂存所有文件字段，失败时删除已写入的部分
async fn stage_files(
    settings: &UploadSettings,
    multipart: &mut Multipart,
) -> GatewayResult<Vec<StagedFile>> {
    let mut staged = Vec::new();
    match collect_parts(settings, multipart, &mut staged).await {
        Ok(()) => Ok(staged),
        Err(e) => {
            discard_staged(&staged).await;
            Err(e)
        }
    }
}

async fn collect_parts(
    settings: &UploadSettings,
    multipart: &mut Multipart,
    staged: &mut Vec<StagedFile>,
) -> GatewayResult<()> {
    tokio::fs::create_dir_all(&settings.upload_dir).await?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default();
        if field_name != FILES_FIELD && field_name != FILES_FIELD_ALIAS {
            debug!(field = field_name, "Skipping unexpected multipart field");
            continue;
        }

        if staged.len() >= settings.max_files {
            return Err(GatewayError::Validation(format!(
                "Too many files, at most {} are accepted",
                settings.max_files
            )));
        }

        let original_name = field
            .file_name()
            .and_then(sanitize_file_name)
            .ok_or_else(|| GatewayError::Validation("File part is missing a filename".to_string()))?;
        let content_type = field.content_type().map(str::to_string);
        let path = settings.upload_dir.join(staging_file_name(&original_name));

        let mut output = tokio::fs::File::create(&path).await?;
        // 先登记，写入中途失败时也能被清理
        staged.push(StagedFile {
            original_name,
            path,
            content_type,
            size: 0,
        });

        let mut size = 0u64;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| GatewayError::Validation(format!("Failed to read file part: {e}")))?
        {
            size += chunk.len() as u64;
            if size > settings.max_file_size {
                return Err(GatewayError::PayloadTooLarge(format!(
                    "File too large, maximum size is {} bytes",
                    settings.max_file_size
                )));
            }
            output.write_all(&chunk).await?;
        }
        output.flush().await?;

        if let Some(file) = staged.last_mut() {
            file.size = size;
            debug!(original_name = %file.original_name, size, "Staged upload part");
        }
    }

    Ok(())
}

async fn discard_staged(files: &[StagedFile]) {
    for file in files {
        if let Err(e) = remove_file_if_exists(&file.path).await {
            warn!(path = %file.path.display(), error = %e, "Failed to remove staged file");
        }
    }
}
