//! S3配置模块
//!
//! 该模块负责根据启动配置创建 S3 客户端。

use crate::config::S3Settings;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;

/// 使用启动配置创建 S3 客户端。
///
/// 未配置静态凭据时使用 AWS 默认凭据链；配置了自定义端点时
/// 启用 path-style 寻址以兼容 MinIO 等 S3 兼容服务。
///
/// # 参数
///
/// * `settings` - 已校验的 S3 配置。
///
/// # 返回值
///
/// 配置好的 `aws_sdk_s3::Client`。
pub async fn create_s3_client(settings: &S3Settings) -> Client {
    let region_provider =
        RegionProviderChain::first_try(Some(Region::new(settings.region.clone())));

    let mut config_builder = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    if let Some(credentials) = &settings.credentials {
        config_builder = config_builder.credentials_provider(Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            "manual-credentials",
        ));
    }

    if let Some(endpoint) = &settings.endpoint {
        config_builder = config_builder.endpoint_url(endpoint);
    }

    let aws_config = config_builder.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(settings.endpoint.is_some())
        .build();

    Client::from_conf(s3_config)
}
