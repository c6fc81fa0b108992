use super::KeyCache;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use cached::{Cached, SizedCache};
use std::sync::Mutex;

/// 进程内缓存实现
///
/// 容量满时按 LRU 淘汰，适合单实例或本地开发部署。
pub struct MemoryKeyCache {
    entries: Mutex<SizedCache<String, String>>,
}

impl MemoryKeyCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(SizedCache::with_size(capacity.max(1))),
        }
    }
}

#[async_trait]
impl KeyCache for MemoryKeyCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory cache lock poisoned"))?;
        Ok(entries.cache_get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory cache lock poisoned"))?;
        entries.cache_set(key.to_string(), value.to_string());
        Ok(())
    }
}
