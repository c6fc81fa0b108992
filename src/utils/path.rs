use std::path::Path;
use uuid::Uuid;

/// 清理客户端提交的文件名，只保留最后一个路径组件
///
/// 同时处理 `/` 与 `\` 两种分隔符，防止通过文件名跳出下载目录。
///
/// # 参数
///
/// * `raw` - 客户端提交的原始文件名
///
/// # 返回值
///
/// 清理后的文件名；如果没有可用的文件名则返回 `None`
///
/// # 示例
///
/// ```
/// use file_gateway::utils::path::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("report.pdf").as_deref(), Some("report.pdf"));
/// assert_eq!(sanitize_file_name("../../etc/passwd").as_deref(), Some("passwd"));
/// assert_eq!(sanitize_file_name("C:\\Users\\me\\a.txt").as_deref(), Some("a.txt"));
/// assert_eq!(sanitize_file_name(".."), None);
/// ```
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match name {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// 生成暂存文件名：随机 UUID 加上原始文件的扩展名
pub fn staging_file_name(original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    format!("{}{}", Uuid::new_v4(), extension)
}
