//! HTTP请求处理模块
//!
//! 此模块包含了处理不同类型HTTP请求的所有处理器：
//! - 上传处理器（multipart 暂存 + 上传）
//! - 下载处理器（下载到本地并在响应后清理）
//! - 列举、删除处理器

pub mod constants;
pub mod download;
pub mod files;
pub mod upload;

// 重新导出主要的公共接口
pub use download::handle_download;
pub use files::{handle_delete, handle_list};
pub use upload::handle_upload;
