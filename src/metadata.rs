//! 文件元数据存储模块

mod mongo;

pub use mongo::MongoMetadataStore;

use crate::models::FileRecord;
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn create(&self, record: &FileRecord) -> Result<()>;

    /// 查找对象键以 `prefix` 开头的第一条记录。
    ///
    /// `prefix` 按字面量匹配，其中的正则元字符不会生效。
    async fn find_by_key_prefix(&self, prefix: &str) -> Result<Option<FileRecord>>;
}
