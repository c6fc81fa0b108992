use super::KeyCache;
use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, IntoConnectionInfo};
use std::time::Duration;

/// Redis 缓存实现，使用 0 号库
#[derive(Clone)]
pub struct RedisKeyCache {
    connection: ConnectionManager,
    ttl: Option<Duration>,
}

impl RedisKeyCache {
    /// 连接 Redis。
    ///
    /// # 参数
    ///
    /// * `url` - Redis 连接地址。
    /// * `password` - 可选密码，覆盖地址中携带的密码。
    /// * `ttl` - 缓存条目的过期时间，`None` 表示不过期。
    pub async fn connect(url: &str, password: Option<&str>, ttl: Option<Duration>) -> Result<Self> {
        let mut info = url
            .into_connection_info()
            .context("invalid REDIS_HOST")?;
        info.redis.db = 0;
        if let Some(password) = password {
            info.redis.password = Some(password.to_string());
        }

        let client = redis::Client::open(info).context("failed to create Redis client")?;
        let connection = ConnectionManager::new(client)
            .await
            .context("failed to connect to Redis")?;

        Ok(Self { connection, ttl })
    }
}

#[async_trait]
impl KeyCache for RedisKeyCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut connection = self.connection.clone();
        let value: Option<String> = connection.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut connection = self.connection.clone();
        match self.ttl {
            Some(ttl) => connection.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?,
            None => connection.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }
}
