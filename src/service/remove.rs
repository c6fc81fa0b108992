use super::FileService;
use crate::error::{GatewayError, GatewayResult};
use crate::models::DeleteResult;
use tracing::info;

impl FileService {
    /// 删除标识符对应的对象。
    ///
    /// 只删除存储桶中的对象，元数据记录和缓存条目保持不变。
    pub async fn delete(&self, id: &str) -> GatewayResult<DeleteResult> {
        let file = self.resolve(id).await?;

        self.objects
            .delete(&file.object_key)
            .await
            .map_err(|e| GatewayError::upstream("delete object", e))?;

        info!(id, object_key = %file.object_key, "Object deleted");

        Ok(DeleteResult {
            message: "Object deleted successfully!".to_string(),
        })
    }
}
