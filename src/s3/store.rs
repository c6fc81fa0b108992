//! 基于 `aws-sdk-s3` 的对象存储实现。

use super::ObjectStore;
use crate::models::{ListPage, StagedFile};
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Arc<Client>,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Arc<Client>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_file(&self, key: &str, file: &StagedFile) -> Result<()> {
        let body = ByteStream::from_path(&file.path)
            .await
            .with_context(|| format!("failed to open staged file {}", file.path.display()))?;

        // 客户端未提供 Content-Type 时按文件名猜测
        let content_type = file.content_type.clone().or_else(|| {
            mime_guess::from_path(&file.original_name)
                .first()
                .map(|mime| mime.to_string())
        });

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_length(i64::try_from(file.size).context("staged file too large")?)
            .set_content_type(content_type)
            .body(body)
            .send()
            .await
            .with_context(|| format!("PutObject {key} failed"))?;

        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String> {
        let presigning_config = PresigningConfig::expires_in(expires_in)?;

        // 生成预签名 URL
        let presigned_request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .with_context(|| format!("failed to presign GetObject {key}"))?;

        Ok(presigned_request.uri().to_string())
    }

    async fn list_page(&self, continuation_token: Option<String>) -> Result<ListPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .set_continuation_token(continuation_token)
            .send()
            .await
            .context("ListObjectsV2 failed")?;

        let keys = output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();

        let next_token = if output.is_truncated().unwrap_or(false) {
            output.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ListPage { keys, next_token })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("DeleteObject {key} failed"))?;

        Ok(())
    }
}
