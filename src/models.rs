//! 数据模型

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 对象键中 token 与原始文件名之间的分隔符
pub const KEY_SEPARATOR: char = '_';

/// 元数据存储中的文件记录。
///
/// 上传成功后创建，之后不再修改。字段名与历史集合保持一致，
/// 对象键持久化为 `s3Name`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub original_name: String,
    #[serde(rename = "s3Name")]
    pub object_key: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl FileRecord {
    pub fn new(original_name: impl Into<String>, object_key: impl Into<String>) -> Self {
        let now = DateTime::now();
        Self {
            original_name: original_name.into(),
            object_key: object_key.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// 标识符解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFile {
    pub original_name: String,
    pub object_key: String,
}

impl ResolvedFile {
    /// 对象键中第一个分隔符之前的 token
    pub fn token(&self) -> &str {
        self.object_key
            .split_once(KEY_SEPARATOR)
            .map_or(self.object_key.as_str(), |(token, _)| token)
    }
}

impl From<FileRecord> for ResolvedFile {
    fn from(record: FileRecord) -> Self {
        Self {
            original_name: record.original_name,
            object_key: record.object_key,
        }
    }
}

/// 已写入本地暂存目录的上传文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// 客户端提交的文件名（已去除路径部分）
    pub original_name: String,
    pub path: PathBuf,
    pub content_type: Option<String>,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// 下载、删除时使用的短标识符
    pub id: String,
    pub object_key: String,
    pub original_name: String,
}

/// 存储桶列举的一页结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// 为 `None` 时表示已经是最后一页
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub message: String,
}

/// 生成 `<token>_<原始文件名>` 形式的对象键
pub fn object_key(token: &str, original_name: &str) -> String {
    format!("{token}{KEY_SEPARATOR}{original_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_record_uses_legacy_field_names() {
        let record = FileRecord::new("report.pdf", "abc_report.pdf");
        let doc = mongodb::bson::to_document(&record).unwrap();

        assert_eq!(doc.get_str("originalName").unwrap(), "report.pdf");
        assert_eq!(doc.get_str("s3Name").unwrap(), "abc_report.pdf");
        assert!(doc.get_datetime("createdAt").is_ok());
        assert!(doc.get_datetime("updatedAt").is_ok());
    }

    #[test]
    fn test_resolved_token_is_key_prefix() {
        let file = ResolvedFile {
            original_name: "my_report.pdf".to_string(),
            object_key: "abc_my_report.pdf".to_string(),
        };
        assert_eq!(file.token(), "abc");

        let bare = ResolvedFile {
            original_name: "x".to_string(),
            object_key: "nokey".to_string(),
        };
        assert_eq!(bare.token(), "nokey");
    }

    #[test]
    fn test_object_key_format() {
        assert_eq!(object_key("token", "a_b.txt"), "token_a_b.txt");
    }
}
