//! 文件服务模块
//!
//! [`FileService`] 负责编排对象存储、元数据存储和标识符缓存：
//! - 标识符解析（缓存优先，未命中时查询元数据并回填缓存）
//! - 上传、下载、删除和列举
//!
//! 每个操作对下游只调用一次，不做重试，也不做跨存储的补偿。

mod download;
mod list;
mod remove;
mod resolve;
mod upload;

use crate::cache::KeyCache;
use crate::metadata::MetadataStore;
use crate::s3::ObjectStore;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// 预签名下载 URL 的有效期
    pub presign_expires: Duration,
    /// 下载文件的本地落地目录
    pub download_dir: PathBuf,
}

#[derive(Clone)]
pub struct FileService {
    objects: Arc<dyn ObjectStore>,
    records: Arc<dyn MetadataStore>,
    cache: Arc<dyn KeyCache>,
    http_client: Client,
    settings: ServiceSettings,
}

impl FileService {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        records: Arc<dyn MetadataStore>,
        cache: Arc<dyn KeyCache>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            objects,
            records,
            cache,
            http_client: Client::new(),
            settings,
        }
    }
}
