//! S3模块
//!
//! 该模块负责与对象存储桶的交互，包括客户端配置、对象读写、
//! 分页列举和预签名 URL 生成。

pub mod config;
mod store;

pub use store::S3ObjectStore;

use crate::models::{ListPage, StagedFile};
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// 对象存储能力。
///
/// 服务层只通过该 trait 访问存储桶，所有实现都绑定到单个存储桶。
#[automock]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 把本地暂存文件写入 `key`。
    async fn put_file(&self, key: &str, file: &StagedFile) -> Result<()>;

    /// 为 `key` 生成限时有效的 GET 预签名 URL。
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String>;

    /// 列举一页对象键。
    ///
    /// # 参数
    ///
    /// * `continuation_token` - 上一页返回的续传令牌，首页传 `None`。
    async fn list_page(&self, continuation_token: Option<String>) -> Result<ListPage>;

    async fn delete(&self, key: &str) -> Result<()>;
}
