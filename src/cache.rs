//! 标识符缓存模块
//!
//! 缓存短标识符到对象键的映射，避免每次下载、删除都查询元数据存储。
//! 缓存值是结构化的 JSON，同时保存对象键和原始文件名；
//! 旧版本写入的纯对象键字符串仍然可以被解析。

mod memory;
mod redis_cache;

pub use memory::MemoryKeyCache;
pub use redis_cache::RedisKeyCache;

use crate::models::{KEY_SEPARATOR, ResolvedFile};
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait KeyCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// 把解析结果编码为缓存值
pub fn encode_entry(file: &ResolvedFile) -> serde_json::Result<String> {
    serde_json::to_string(file)
}

/// 解码缓存值。
///
/// 优先按 JSON 解析；失败时视为旧格式 `<token>_<原始文件名>`，
/// 取第一个分隔符之后的部分作为原始文件名。
///
/// # 参数
///
/// * `raw` - 缓存中存储的字符串。
///
/// # 返回值
///
/// 对象键与原始文件名。
pub fn decode_entry(raw: &str) -> ResolvedFile {
    if let Ok(file) = serde_json::from_str::<ResolvedFile>(raw) {
        return file;
    }

    let original_name = raw
        .split_once(KEY_SEPARATOR)
        .map_or(raw, |(_, name)| name)
        .to_string();

    ResolvedFile {
        original_name,
        object_key: raw.to_string(),
    }
}
