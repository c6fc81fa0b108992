use super::FileService;
use crate::error::{GatewayError, GatewayResult};
use tracing::debug;

impl FileService {
    /// 列举存储桶中的全部对象键。
    ///
    /// 按续传令牌逐页读取，全部读完后一次性返回。
    pub async fn list(&self) -> GatewayResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .objects
                .list_page(continuation_token.take())
                .await
                .map_err(|e| GatewayError::upstream("list objects", e))?;

            pages += 1;
            keys.extend(page.keys);

            match page.next_token {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }

        debug!(pages, count = keys.len(), "Listed bucket");
        Ok(keys)
    }
}
