use super::FileService;
use crate::cache::{decode_entry, encode_entry};
use crate::error::{GatewayError, GatewayResult};
use crate::models::ResolvedFile;
use tracing::{debug, warn};

impl FileService {
    /// 把短标识符解析为原始文件名和对象键。
    ///
    /// 先查缓存，命中直接返回；未命中时按对象键前缀查询元数据存储，
    /// 并把结果写回缓存。缓存读写失败只记录日志，按未命中处理。
    ///
    /// # 参数
    ///
    /// * `id` - 上传时返回的短标识符（对象键前缀）。
    ///
    /// # Errors
    ///
    /// 没有匹配记录时返回 `NotFound`，元数据查询失败时返回 `Upstream`。
    pub async fn resolve(&self, id: &str) -> GatewayResult<ResolvedFile> {
        match self.cache.get(id).await {
            Ok(Some(raw)) => {
                debug!(id, "Resolved id from cache");
                return Ok(decode_entry(&raw));
            }
            Ok(None) => debug!(id, "Cache miss, querying metadata store"),
            Err(e) => warn!(id, error = %e, "Cache lookup failed, querying metadata store"),
        }

        let record = self
            .records
            .find_by_key_prefix(id)
            .await
            .map_err(|e| GatewayError::upstream("find file record", e))?
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;

        let file = ResolvedFile::from(record);
        self.remember(id, &file).await;
        Ok(file)
    }

    /// 写入缓存，失败只记录日志
    pub(super) async fn remember(&self, id: &str, file: &ResolvedFile) {
        let value = match encode_entry(file) {
            Ok(value) => value,
            Err(e) => {
                warn!(id, error = %e, "Failed to encode cache entry");
                return;
            }
        };

        if let Err(e) = self.cache.set(id, &value).await {
            warn!(id, object_key = %file.object_key, error = %e, "Failed to write cache entry");
        }
    }
}
