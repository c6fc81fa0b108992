use super::FileService;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{FileRecord, ResolvedFile, StagedFile, UploadResult, object_key};
use crate::utils::temp::remove_file_if_exists;
use tracing::{error, info, warn};
use uuid::Uuid;

impl FileService {
    /// 上传一批暂存文件中的第一个。
    ///
    /// 顺序：写入对象存储 → 创建元数据记录 → 写缓存 → 删除暂存文件。
    /// 对象写入成功但记录创建失败时，对象会成为孤儿，不做回滚。
    ///
    /// # 参数
    ///
    /// * `files` - 已经写入本地暂存目录的文件，只使用第一个。
    ///
    /// # 返回值
    ///
    /// 短标识符、对象键和原始文件名。
    pub async fn upload(&self, files: &[StagedFile]) -> GatewayResult<UploadResult> {
        let Some(file) = files.first() else {
            return Err(GatewayError::Validation(
                "at least one file is required".to_string(),
            ));
        };
        if files.len() > 1 {
            warn!(
                count = files.len(),
                "Multiple files received, only the first one is stored"
            );
        }

        let token = Uuid::new_v4().to_string();
        let key = object_key(&token, &file.original_name);

        self.objects
            .put_file(&key, file)
            .await
            .map_err(|e| GatewayError::upstream("put object", e))?;

        let record = FileRecord::new(&file.original_name, &key);
        if let Err(e) = self.records.create(&record).await {
            error!(orphaned_key = %key, error = %e, "Object stored without a file record");
            return Err(GatewayError::upstream("create file record", e));
        }

        let resolved = ResolvedFile::from(record);
        self.remember(&token, &resolved).await;

        if let Err(e) = remove_file_if_exists(&file.path).await {
            warn!(path = %file.path.display(), error = %e, "Failed to remove staged file");
        }

        info!(
            id = %token,
            object_key = %key,
            original_name = %file.original_name,
            size = file.size,
            "File uploaded"
        );

        Ok(UploadResult {
            id: token,
            object_key: resolved.object_key,
            original_name: resolved.original_name,
        })
    }
}
