//! 文件网关的配置模块。
//!
//! 该模块负责从环境变量加载、校验配置。配置在启动时一次性构造完成，
//! 校验失败时进程直接退出，不存在"部分初始化"的状态。

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// 默认监听地址
const DEFAULT_LISTEN_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 3000);

/// 预签名 URL 默认有效期（秒）
const DEFAULT_PRESIGN_EXPIRES_SECS: u64 = 60;

/// S3 预签名 URL 允许的最长有效期（7 天）
const MAX_PRESIGN_EXPIRES_SECS: u64 = 7 * 24 * 60 * 60;

const DEFAULT_MONGO_DATABASE: &str = "file_gateway";
const DEFAULT_MONGO_COLLECTION: &str = "s3files";

/// 内存缓存的默认容量：32768 个条目（32 * 1024）
const DEFAULT_CACHE_CAPACITY: usize = 32 * 1024;

const DEFAULT_UPLOAD_DIR: &str = "assets";
const DEFAULT_DOWNLOAD_DIR: &str = "assets/downloads";
const DEFAULT_MAX_UPLOAD_FILES: usize = 100;
const DEFAULT_MAX_UPLOAD_FILE_SIZE: u64 = 50 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value `{value}`: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub s3: S3Settings,
    pub mongo: MongoSettings,
    pub cache: CacheSettings,
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// S3 兼容服务（如 MinIO）的端点，设置后使用 path-style 寻址
    pub endpoint: Option<String>,
    /// 未设置时走 AWS 默认凭据链
    pub credentials: Option<StaticCredentials>,
    pub presign_expires: Duration,
}

#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    /// 为空时使用连接串中的默认数据库
    pub database: Option<String>,
    pub collection: String,
}

impl MongoSettings {
    pub fn fallback_database() -> &'static str {
        DEFAULT_MONGO_DATABASE
    }
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    pub ttl: Option<Duration>,
}

#[derive(Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Redis {
        url: String,
        password: Option<String>,
    },
    Memory {
        capacity: usize,
    },
}

impl std::fmt::Debug for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redis { url, password } => f
                .debug_struct("Redis")
                .field("url", url)
                .field("password", &password.as_ref().map(|_| "***"))
                .finish(),
            Self::Memory { capacity } => {
                f.debug_struct("Memory").field("capacity", capacity).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub upload_dir: PathBuf,
    pub download_dir: PathBuf,
    pub max_files: usize,
    pub max_file_size: u64,
}

impl Config {
    /// 从进程环境变量加载配置。
    ///
    /// 调用前应先执行 `dotenvy::dotenv()` 以加载 `.env` 文件。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 使用任意查找函数加载并校验配置。
    ///
    /// # 参数
    ///
    /// * `lookup` - 根据变量名返回变量值的函数，空字符串视为未设置。
    ///
    /// # 返回值
    ///
    /// 校验通过的完整配置，或第一个遇到的配置错误。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let listen_addr =
            env.parse_or("LISTEN_ADDR", || SocketAddr::from(DEFAULT_LISTEN_ADDR))?;

        let s3 = S3Settings {
            bucket: env.required("BUCKET_NAME")?,
            region: env.required("S3_BUCKET_REGION")?,
            endpoint: env.optional("S3_ENDPOINT"),
            credentials: match (
                env.optional("AWS_ACCESS_KEY_ID"),
                env.optional("AWS_SECRET_ACCESS_KEY"),
            ) {
                (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                    access_key_id,
                    secret_access_key,
                }),
                (None, None) => None,
                (Some(_), None) => return Err(ConfigError::Missing("AWS_SECRET_ACCESS_KEY")),
                (None, Some(_)) => return Err(ConfigError::Missing("AWS_ACCESS_KEY_ID")),
            },
            presign_expires: {
                let secs: u64 =
                    env.parse_or("PRESIGN_EXPIRES_SECS", || DEFAULT_PRESIGN_EXPIRES_SECS)?;
                if !(1..=MAX_PRESIGN_EXPIRES_SECS).contains(&secs) {
                    return Err(ConfigError::Invalid {
                        name: "PRESIGN_EXPIRES_SECS",
                        value: secs.to_string(),
                        reason: format!("must be between 1 and {MAX_PRESIGN_EXPIRES_SECS}"),
                    });
                }
                Duration::from_secs(secs)
            },
        };

        let mongo = MongoSettings {
            uri: env.required("MONGO_URL")?,
            database: env.optional("MONGO_DATABASE"),
            collection: env
                .optional("MONGO_COLLECTION")
                .unwrap_or_else(|| DEFAULT_MONGO_COLLECTION.to_string()),
        };

        let backend = match env.optional("CACHE_BACKEND").as_deref() {
            None | Some("redis") => {
                let auth_required = env.parse_or("REDIS_AUTH_REQUIRED", || false)?;
                let password = if auth_required {
                    Some(env.required("REDIS_AUTH")?)
                } else {
                    None
                };
                CacheBackend::Redis {
                    url: env.required("REDIS_HOST")?,
                    password,
                }
            }
            Some("memory") => CacheBackend::Memory {
                capacity: env.parse_or("CACHE_CAPACITY", || DEFAULT_CACHE_CAPACITY)?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "CACHE_BACKEND",
                    value: other.to_string(),
                    reason: "expected `redis` or `memory`".to_string(),
                });
            }
        };

        let cache = CacheSettings {
            backend,
            ttl: env
                .parse::<u64>("CACHE_TTL_SECS")?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        };

        let uploads = UploadSettings {
            upload_dir: env
                .optional("UPLOAD_DIR")
                .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string())
                .into(),
            download_dir: env
                .optional("DOWNLOAD_DIR")
                .unwrap_or_else(|| DEFAULT_DOWNLOAD_DIR.to_string())
                .into(),
            max_files: {
                let max_files = env.parse_or("MAX_UPLOAD_FILES", || DEFAULT_MAX_UPLOAD_FILES)?;
                if max_files == 0 {
                    return Err(ConfigError::Invalid {
                        name: "MAX_UPLOAD_FILES",
                        value: "0".to_string(),
                        reason: "must be at least 1".to_string(),
                    });
                }
                max_files
            },
            max_file_size: env
                .parse_or("MAX_UPLOAD_FILE_SIZE", || DEFAULT_MAX_UPLOAD_FILE_SIZE)?,
        };

        Ok(Self {
            listen_addr,
            s3,
            mongo,
            cache,
            uploads,
        })
    }
}

/// 环境变量查找的薄封装
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn parse<T>(&self, name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(name)
            .map(|value| {
                value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                    name,
                    reason: e.to_string(),
                    value,
                })
            })
            .transpose()
    }

    fn parse_or<T>(&self, name: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse(name)?.unwrap_or_else(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("BUCKET_NAME", "files"),
            ("S3_BUCKET_REGION", "eu-central-1"),
            ("MONGO_URL", "mongodb://localhost:27017/files"),
            ("REDIS_HOST", "redis://localhost:6379"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.s3.bucket, "files");
        assert_eq!(config.s3.presign_expires, Duration::from_secs(60));
        assert!(config.s3.credentials.is_none());
        assert_eq!(config.mongo.collection, "s3files");
        assert_eq!(
            config.cache.backend,
            CacheBackend::Redis {
                url: "redis://localhost:6379".to_string(),
                password: None,
            }
        );
        assert!(config.cache.ttl.is_none());
        assert_eq!(config.uploads.max_files, 100);
        assert_eq!(config.uploads.max_file_size, 50 * 1024 * 1024);
        assert_eq!(config.uploads.download_dir, PathBuf::from("assets/downloads"));
    }

    #[test]
    fn test_missing_bucket_fails_at_startup() {
        let mut vars = base_vars();
        vars.remove("BUCKET_NAME");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("BUCKET_NAME"));

        // 空白值等同于未设置
        vars.insert("BUCKET_NAME", "   ");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("BUCKET_NAME"));
    }

    #[test]
    fn test_memory_backend_does_not_need_redis() {
        let mut vars = base_vars();
        vars.remove("REDIS_HOST");
        vars.insert("CACHE_BACKEND", "memory");
        vars.insert("CACHE_CAPACITY", "16");

        let config = load(&vars).unwrap();
        assert_eq!(config.cache.backend, CacheBackend::Memory { capacity: 16 });
    }

    #[test]
    fn test_redis_auth_required_needs_password() {
        let mut vars = base_vars();
        vars.insert("REDIS_AUTH_REQUIRED", "true");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("REDIS_AUTH"));

        vars.insert("REDIS_AUTH", "hunter2");
        let config = load(&vars).unwrap();
        assert!(matches!(
            config.cache.backend,
            CacheBackend::Redis { password: Some(ref p), .. } if p == "hunter2"
        ));
        assert!(!format!("{:?}", config.cache.backend).contains("hunter2"));
    }

    #[test]
    fn test_partial_credentials_rejected() {
        let mut vars = base_vars();
        vars.insert("AWS_ACCESS_KEY_ID", "AKIA");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Missing("AWS_SECRET_ACCESS_KEY")
        );
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let mut vars = base_vars();
        vars.insert("PRESIGN_EXPIRES_SECS", "soon");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { name: "PRESIGN_EXPIRES_SECS", .. }
        ));

        vars.insert("PRESIGN_EXPIRES_SECS", "0");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { name: "PRESIGN_EXPIRES_SECS", .. }
        ));

        vars.insert("PRESIGN_EXPIRES_SECS", "300");
        vars.insert("MAX_UPLOAD_FILES", "0");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { name: "MAX_UPLOAD_FILES", .. }
        ));
    }

    #[test]
    fn test_unknown_cache_backend_rejected() {
        let mut vars = base_vars();
        vars.insert("CACHE_BACKEND", "memcached");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { name: "CACHE_BACKEND", .. }
        ));
    }
}
