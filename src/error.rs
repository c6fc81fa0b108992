//! 错误类型模块
//!
//! 服务层把下游失败归类为 [`GatewayError`]，HTTP 层再把它渲染成
//! `{statusCode, message}` 形式的 JSON 响应。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// 对外统一返回的内部错误信息
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// 没有任何元数据记录匹配给定的标识符
    #[error("no file matches id `{0}`")]
    NotFound(String),

    /// 上传内容的形状不合法（零文件、超出数量、缺少文件名等）
    #[error("{0}")]
    Validation(String),

    /// 单个文件超过大小限制
    #[error("{0}")]
    PayloadTooLarge(String),

    /// 对象存储、元数据存储或下载传输失败
    #[error("{context}: {source:#}")]
    Upstream {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// 本地暂存文件或下载文件的读写失败
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// 包装一个下游调用失败。
    ///
    /// # 参数
    ///
    /// * `context` - 失败的操作名称，只用于日志。
    /// * `source` - 原始错误。
    pub fn upstream(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Upstream {
            context,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream { .. } | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();

        // 内部错误只记录日志，不把原因暴露给客户端
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            tracing::debug!(error = %self, "request rejected");
            self.to_string()
        };

        let body = Json(json!({
            "statusCode": status.as_u16(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
