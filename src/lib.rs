//! 文件网关服务库
//!
//! 这是一个基于Axum的文件存储网关，主要功能包括：
//! - 接收 multipart 上传并写入 S3 存储桶
//! - 在 MongoDB 中记录文件元数据
//! - 通过 Redis（或进程内缓存）缓存短标识符到对象键的映射
//! - 提供下载、删除和列举接口

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metadata;
pub mod models;
pub mod s3;
pub mod service;
pub mod utils;

use crate::cache::{KeyCache, MemoryKeyCache, RedisKeyCache};
use crate::config::{CacheBackend, Config, UploadSettings};
use crate::metadata::MongoMetadataStore;
use crate::s3::S3ObjectStore;
use crate::service::{FileService, ServiceSettings};
use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use http::Method;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// 请求处理器共享的应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: FileService,
    pub uploads: Arc<UploadSettings>,
}

impl AppState {
    pub fn new(service: FileService, uploads: UploadSettings) -> Self {
        Self {
            service,
            uploads: Arc::new(uploads),
        }
    }
}

/// 根据配置连接所有下游并构造应用状态
///
/// 所有客户端在这里一次性创建完成，任何一个失败都会中止启动，
/// 服务不会在部分初始化的状态下接收请求。
///
/// # Errors
///
/// MongoDB 或 Redis 连接失败时返回错误。
pub async fn connect(config: &Config) -> anyhow::Result<AppState> {
    let s3_client = Arc::new(s3::config::create_s3_client(&config.s3).await);
    let objects = S3ObjectStore::new(s3_client, config.s3.bucket.clone());
    info!(bucket = objects.bucket(), region = %config.s3.region, "Configured object store");

    let records = MongoMetadataStore::connect(&config.mongo)
        .await
        .context("failed to initialise metadata store")?;

    let cache: Arc<dyn KeyCache> = match &config.cache.backend {
        CacheBackend::Redis { url, password } => {
            let cache = RedisKeyCache::connect(url, password.as_deref(), config.cache.ttl)
                .await
                .context("failed to initialise Redis cache")?;
            info!("Connected Redis cache");
            Arc::new(cache)
        }
        CacheBackend::Memory { capacity } => {
            info!(capacity, "Using in-process cache");
            Arc::new(MemoryKeyCache::new(*capacity))
        }
    };

    let service = FileService::new(
        Arc::new(objects),
        Arc::new(records),
        cache,
        ServiceSettings {
            presign_expires: config.s3.presign_expires,
            download_dir: config.uploads.download_dir.clone(),
        },
    );

    Ok(AppState::new(service, config.uploads.clone()))
}

/// 创建并配置Axum应用程序
///
/// 此函数设置了完整的路由，包括：
/// - CORS配置
/// - 请求追踪中间件
/// - 上传、下载、列举和删除路由
///
/// 上传请求体不受默认大小限制，单个文件的大小在暂存时逐块检查。
///
/// # Returns
///
/// 返回配置好的Axum Router实例
pub fn app(state: AppState) -> axum::Router {
    // 配置 CORS
    let cors = CorsLayer::permissive()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::any());

    axum::Router::new()
        .route("/upload", post(handlers::handle_upload))
        .route("/list/files", get(handlers::handle_list))
        .route("/download/{id}", get(handlers::handle_download))
        .route("/s3/{id}", delete(handlers::handle_delete))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
