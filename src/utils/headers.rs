use http::HeaderValue;

/// 生成下载用的 `Content-Disposition` 头部值
///
/// 同时给出 ASCII 兜底的 `filename` 和 RFC 5987 编码的 `filename*`，
/// 非 ASCII 文件名也能被浏览器正确还原。`filename*` 只保留非保留字符，
/// 其余字节一律百分号编码。
///
/// # 参数
///
/// * `file_name` - 下载文件名
///
/// # 返回值
///
/// `attachment; filename="..."; filename*=UTF-8''...` 形式的头部值
pub fn content_disposition(file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    );

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
