// ==========================================
// 车间电视看板 - 后端拉取客户端
// ==========================================
// 接口: GET {backend}/api/display/{segment}?{param}={value}&_t={epoch_ms}
// 响应: { success: bool, data: <Snapshot>, error?: string }
// 失败: 网络错误 / 非 2xx / success=false 均转为 BoardError，不在此重试
// ==========================================

use crate::api::error::{BoardError, BoardResult};
use crate::domain::types::BoardIdentity;
use crate::engine::board::BoardSnapshot;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

// ==========================================
// SnapshotSource Trait
// ==========================================
// 拉取数据源抽象（便于测试替换）
#[async_trait]
pub trait SnapshotSource<S: BoardSnapshot>: Send + Sync {
    async fn fetch(&self, identity: BoardIdentity) -> BoardResult<S>;
}

/// 响应信封
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<S> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<S>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<S> ApiEnvelope<S> {
    /// 拆信封: success=true 且有 data 才算成功
    pub fn into_result(self) -> BoardResult<S> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(BoardError::Fetch(
                self.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "获取数据失败".to_string()),
            )),
        }
    }
}

/// 拼接拉取地址（含防缓存参数）
pub fn snapshot_url(base: &str, identity: &BoardIdentity, now_ms: i64) -> BoardResult<Url> {
    let kind = identity.kind();
    let raw = format!(
        "{}/api/display/{}",
        base.trim_end_matches('/'),
        kind.api_segment()
    );
    let mut url = Url::parse(&raw)
        .map_err(|e| BoardError::Config(format!("后端地址无效 {}: {}", base, e)))?;
    url.query_pairs_mut()
        .append_pair(kind.identity_param(), &identity.query_value())
        .append_pair("_t", &now_ms.to_string());
    Ok(url)
}

// ==========================================
// HttpBackendClient
// ==========================================
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    base_url: String,
    client: Client,
}

impl HttpBackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BoardResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BoardError::Config(format!("HTTP 客户端创建失败: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl<S: BoardSnapshot> SnapshotSource<S> for HttpBackendClient {
    #[instrument(skip(self))]
    async fn fetch(&self, identity: BoardIdentity) -> BoardResult<S> {
        let url = snapshot_url(&self.base_url, &identity, chrono::Utc::now().timestamp_millis())?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(identity = %identity, status = status.as_u16(), "拉取失败");
            // 后端错误体带 error 字段时优先显示原始信息
            let message = response
                .json::<ApiEnvelope<serde_json::Value>>()
                .await
                .ok()
                .and_then(|envelope| envelope.error)
                .filter(|e| !e.trim().is_empty());
            return Err(match message {
                Some(message) => BoardError::Fetch(message),
                None => BoardError::HttpStatus {
                    status: status.as_u16(),
                },
            });
        }

        let envelope: ApiEnvelope<S> = response.json().await?;
        let snapshot = envelope.into_result().map_err(|e| {
            warn!(identity = %identity, error = %e, "后端返回失败");
            e
        })?;

        info!(identity = %identity, last_update = snapshot.last_update(), "快照拉取完成");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductSnapshot;
    use crate::domain::types::{LineNumber, ProductCode};

    #[test]
    fn test_snapshot_url_has_cache_buster() {
        let url = snapshot_url(
            "http://localhost:3001/",
            &BoardIdentity::Product(ProductCode::Cd2),
            1_760_000_000_000,
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/display/cd-product?code=cd2&_t=1760000000000"
        );

        let line = snapshot_url(
            "http://board.local",
            &BoardIdentity::Line(LineNumber::new(4).unwrap()),
            7,
        )
        .unwrap();
        assert_eq!(line.as_str(), "http://board.local/api/display/qsl?line=4&_t=7");
    }

    #[test]
    fn test_envelope_failure_uses_server_message() {
        let envelope: ApiEnvelope<ProductSnapshot> =
            serde_json::from_str(r#"{"success": false, "error": "Sheet CD2 not found"}"#)
                .unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Sheet CD2 not found");
    }

    #[test]
    fn test_envelope_missing_data_is_failure() {
        let envelope: ApiEnvelope<ProductSnapshot> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(envelope.into_result(), Err(BoardError::Fetch(_))));
    }

    #[test]
    fn test_envelope_success() {
        let envelope: ApiEnvelope<ProductSnapshot> =
            serde_json::from_str(r#"{"success": true, "data": {"sheet": "CD1", "products": []}}"#)
                .unwrap();
        assert_eq!(envelope.into_result().unwrap().sheet, "CD1");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = snapshot_url("not a url", &BoardIdentity::Product(ProductCode::Cd1), 0)
            .unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
    }
}
