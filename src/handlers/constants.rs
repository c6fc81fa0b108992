/// 上传表单中文件字段的名称
pub const FILES_FIELD: &str = "files[]";

/// 兼容不带方括号的字段名
pub const FILES_FIELD_ALIAS: &str = "files";

/// 上传成功时的提示信息
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";
