//! 工具函数模块
//!
//! 此模块包含了项目中使用的各种工具函数：
//! - HTTP头部处理工具（下载文件的 Content-Disposition）
//! - 路径处理工具（文件名清理、暂存文件命名）
//! - 临时文件清理工具

pub mod headers;
pub mod path;
pub mod temp;
