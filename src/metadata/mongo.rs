use super::MetadataStore;
use crate::config::MongoSettings;
use crate::models::FileRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::bson::{Document, doc};
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info};

#[derive(Clone)]
pub struct MongoMetadataStore {
    collection: Collection<FileRecord>,
}

impl MongoMetadataStore {
    /// 连接 MongoDB 并确保对象键索引存在。
    ///
    /// 数据库名优先取配置，其次取连接串中的默认库。
    pub async fn connect(settings: &MongoSettings) -> Result<Self> {
        let client = Client::with_uri_str(&settings.uri)
            .await
            .context("failed to create MongoDB client")?;

        let database = match &settings.database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(MongoSettings::fallback_database())),
        };

        info!(
            database = database.name(),
            collection = %settings.collection,
            "Connected metadata store"
        );

        let store = Self {
            collection: database.collection(&settings.collection),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// 前缀锚定的正则查询可以走该索引
    async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "s3Name": 1 })
            .build();

        self.collection
            .create_index(index)
            .await
            .context("failed to create s3Name index")?;

        debug!("Ensured s3Name index");
        Ok(())
    }
}

/// 构造"以 `prefix` 开头"的查询条件
fn key_prefix_filter(prefix: &str) -> Document {
    doc! {
        "s3Name": {
            "$regex": format!("^{}", regex::escape(prefix)),
        }
    }
}

#[async_trait]
impl MetadataStore for MongoMetadataStore {
    async fn create(&self, record: &FileRecord) -> Result<()> {
        self.collection
            .insert_one(record)
            .await
            .context("failed to insert file record")?;
        Ok(())
    }

    async fn find_by_key_prefix(&self, prefix: &str) -> Result<Option<FileRecord>> {
        self.collection
            .find_one(key_prefix_filter(prefix))
            .await
            .context("failed to query file record")
    }
}
