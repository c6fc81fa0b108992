use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 在被丢弃时删除所指向的本地文件，以及变空的所在目录
///
/// 下载响应把它移入响应体流中：响应发送完成或客户端断开后流被丢弃，
/// 本地副本随之删除。在 tokio 运行时中删除操作交给阻塞线程池执行。
#[derive(Debug)]
pub struct TempFileGuard {
    path: PathBuf,
}

impl TempFileGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        let path = std::mem::take(&mut self.path);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_quietly(&path));
            }
            Err(_) => remove_quietly(&path),
        }
    }
}

/// 删除文件，文件不存在时静默忽略；所在目录变空时一并删除
pub fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed temporary file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove temporary file"),
    }
    if let Some(dir) = path.parent() {
        // 目录非空时失败，保持原样
        let _ = std::fs::remove_dir(dir);
    }
}

/// 异步删除文件，文件不存在时静默忽略
pub async fn remove_file_if_exists(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
