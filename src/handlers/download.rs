use crate::AppState;
use crate::error::GatewayError;
use crate::utils::headers::content_disposition;
use crate::utils::temp::TempFileGuard;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use tokio_util::io::ReaderStream;

/// 处理文件下载请求
///
/// 服务层先把对象下载到本地，这里以流的形式返回该文件。
/// 本地副本由 [`TempFileGuard`] 持有，响应体流被丢弃（发送完成或客户端断开）时
/// 连同它所在的 token 目录一起删除。
///
/// # 请求方法
///
/// GET /download/{id}
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, GatewayError> {
    let guard = TempFileGuard::new(state.service.download(&id).await?);

    let file = tokio::fs::File::open(guard.path()).await?;
    let length = file.metadata().await?.len();

    let file_name = guard
        .path()
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("download")
        .to_string();
    let content_type = mime_guess::from_path(&file_name)
        .first_or_octet_stream()
        .to_string();

    let stream = ReaderStream::new(file).map(move |chunk| {
        let _guard = &guard;
        chunk
    });

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_LENGTH, length.to_string()),
        ],
        [(header::CONTENT_DISPOSITION, content_disposition(&file_name))],
        [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        Body::from_stream(stream),
    )
        .into_response())
}
