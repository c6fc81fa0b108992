//! 集成测试共用的内存实现
//!
//! 对象存储、元数据存储和缓存都用内存结构替代；预签名 URL 指向一个
//! wiremock 服务器，由它从内存存储桶中读出对象内容。

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum_test::TestServer;
use file_gateway::AppState;
use file_gateway::cache::KeyCache;
use file_gateway::config::UploadSettings;
use file_gateway::metadata::MetadataStore;
use file_gateway::models::{FileRecord, ListPage, StagedFile};
use file_gateway::s3::ObjectStore;
use file_gateway::service::{FileService, ServiceSettings};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const BUCKET: &str = "files";

type Bucket = Arc<Mutex<BTreeMap<String, Vec<u8>>>>;

pub struct InMemoryObjectStore {
    objects: Bucket,
    base_url: String,
    page_size: usize,
}

impl InMemoryObjectStore {
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_file(&self, key: &str, file: &StagedFile) -> Result<()> {
        let bytes = tokio::fs::read(&file.path).await?;
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn presign_get(&self, key: &str, _expires_in: Duration) -> Result<String> {
        Ok(format!("{}/{BUCKET}/{key}?X-Amz-Signature=test", self.base_url))
    }

    /// 续传令牌是上一页的最后一个键
    async fn list_page(&self, continuation_token: Option<String>) -> Result<ListPage> {
        let objects = self.objects.lock().unwrap();
        let keys: Vec<String> = objects
            .keys()
            .filter(|key| continuation_token.as_ref().is_none_or(|token| *key > token))
            .take(self.page_size + 1)
            .cloned()
            .collect();

        if keys.len() > self.page_size {
            let page = keys[..self.page_size].to_vec();
            let next_token = page.last().cloned();
            Ok(ListPage {
                keys: page,
                next_token,
            })
        } else {
            Ok(ListPage {
                keys,
                next_token: None,
            })
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

/// 从内存存储桶中返回对象内容
struct BucketResponder(Bucket);

impl Respond for BucketResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let prefix = format!("/{BUCKET}/");
        let key = request.url.path().strip_prefix(&prefix).unwrap_or_default();
        match self.0.lock().unwrap().get(key) {
            Some(bytes) => ResponseTemplate::new(200).set_body_bytes(bytes.clone()),
            None => ResponseTemplate::new(404),
        }
    }
}

#[derive(Default)]
pub struct InMemoryMetadataStore {
    records: Mutex<Vec<FileRecord>>,
    queries: Mutex<usize>,
}

impl InMemoryMetadataStore {
    pub fn records(&self) -> Vec<FileRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        *self.queries.lock().unwrap()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn create(&self, record: &FileRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn find_by_key_prefix(&self, prefix: &str) -> Result<Option<FileRecord>> {
        *self.queries.lock().unwrap() += 1;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.object_key.starts_with(prefix))
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryKeyCache {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

#[async_trait]
impl KeyCache for InMemoryKeyCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub server: TestServer,
    pub objects: Arc<InMemoryObjectStore>,
    pub records: Arc<InMemoryMetadataStore>,
    pub cache: Arc<InMemoryKeyCache>,
    pub upload_dir: PathBuf,
    pub download_dir: PathBuf,
    _remote: MockServer,
    _root: TempDir,
}

pub async fn harness() -> Harness {
    harness_with(100, 50 * 1024 * 1024).await
}

pub async fn harness_with(max_files: usize, max_file_size: u64) -> Harness {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("assets");
    let download_dir = root.path().join("assets/downloads");

    let bucket: Bucket = Arc::default();
    let remote = MockServer::start().await;
    Mock::given(wiremock::matchers::method("GET"))
        .respond_with(BucketResponder(bucket.clone()))
        .mount(&remote)
        .await;

    let objects = Arc::new(InMemoryObjectStore {
        objects: bucket,
        base_url: remote.uri(),
        page_size: 2,
    });
    let records = Arc::new(InMemoryMetadataStore::default());
    let cache = Arc::new(InMemoryKeyCache::default());

    let service = FileService::new(
        objects.clone(),
        records.clone(),
        cache.clone(),
        ServiceSettings {
            presign_expires: Duration::from_secs(60),
            download_dir: download_dir.clone(),
        },
    );
    let state = AppState::new(
        service,
        UploadSettings {
            upload_dir: upload_dir.clone(),
            download_dir: download_dir.clone(),
            max_files,
            max_file_size,
        },
    );

    Harness {
        server: TestServer::new(file_gateway::app(state)).unwrap(),
        objects,
        records,
        cache,
        upload_dir,
        download_dir,
        _remote: remote,
        _root: root,
    }
}

/// 暂存目录中残留的文件数
pub fn staged_file_count(harness: &Harness) -> usize {
    std::fs::read_dir(&harness.upload_dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .count()
        })
        .unwrap_or(0)
}

/// 等待下载副本被删除；删除在阻塞线程池中异步完成
pub async fn eventually_removed(path: &Path) -> bool {
    for _ in 0..100 {
        if !path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
