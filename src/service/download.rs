use super::FileService;
use crate::error::{GatewayError, GatewayResult};
use crate::utils::path::sanitize_file_name;
use crate::utils::temp::remove_file_if_exists;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

impl FileService {
    /// 把对象下载到本地文件，返回文件路径。
    ///
    /// 通过限时预签名 URL 拉取对象，写入 `<download_dir>/<token>/<原始文件名>`，
    /// 传输完成后才返回。不同对象即使原始文件名相同也落在不同目录。
    /// 调用方负责在使用完毕后删除该文件。
    pub async fn download(&self, id: &str) -> GatewayResult<PathBuf> {
        let file = self.resolve(id).await?;

        let unusable = |what: &str, value: &str| {
            GatewayError::upstream(
                "resolve download name",
                anyhow::anyhow!("stored {what} {value:?} is not a usable path component"),
            )
        };
        let file_name = sanitize_file_name(&file.original_name)
            .ok_or_else(|| unusable("name", &file.original_name))?;
        let token = sanitize_file_name(file.token())
            .filter(|token| token == file.token())
            .ok_or_else(|| unusable("key", &file.object_key))?;

        let url = self
            .objects
            .presign_get(&file.object_key, self.settings.presign_expires)
            .await
            .map_err(|e| GatewayError::upstream("presign object", e))?;

        let dir = self.settings.download_dir.join(token);
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(file_name);

        debug!(id, object_key = %file.object_key, path = %path.display(), "Downloading object");

        if let Err(e) = self.fetch_to_file(&url, &path).await {
            // 不保留传输不完整的文件
            if let Err(cleanup) = remove_file_if_exists(&path).await {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove partial download");
            }
            let _ = tokio::fs::remove_dir(&dir).await;
            return Err(e);
        }

        info!(id, object_key = %file.object_key, "Download completed");
        Ok(path)
    }

    async fn fetch_to_file(&self, url: &str, path: &Path) -> GatewayResult<()> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| GatewayError::upstream("fetch object", e))?;

        let mut output = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| GatewayError::upstream("fetch object", e))?;
            output.write_all(&chunk).await?;
        }
        output.flush().await?;

        Ok(())
    }
}
