// ==========================================
// 车间电视看板 - 错误类型
// ==========================================
// 分类:
// 1. 拉取/网络失败 → 全屏错误（显示原始信息，不自动重试）
// 2. 身份参数非法 → 全屏校验提示（不进入数据层）
// 3. 推送载荷畸形 → 丢弃并记录告警，保留原状态
// 注意: "无数据" 不是错误，由视图层单独表达
// ==========================================

use thiserror::Error;

/// 看板错误类型
#[derive(Error, Debug)]
pub enum BoardError {
    // ==========================================
    // 数据拉取错误
    // ==========================================
    #[error("HTTP 错误: status={status}")]
    HttpStatus { status: u16 },

    #[error("{0}")]
    Fetch(String),

    #[error("网络错误: {0}")]
    Network(String),

    #[error("数据解析失败: {0}")]
    Decode(String),

    // ==========================================
    // 参数错误
    // ==========================================
    #[error("无效参数 {param}={value}（合法值: {expected}）")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // ==========================================
    // 推送通道错误
    // ==========================================
    #[error("推送载荷无效: {0}")]
    MalformedPayload(String),

    #[error("推送通道错误: {0}")]
    Transport(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("配置错误: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 看板结果类型
pub type BoardResult<T> = Result<T, BoardError>;

impl BoardError {
    /// 错误代码（用于日志字段）
    pub fn code(&self) -> &'static str {
        match self {
            BoardError::HttpStatus { .. } => "HTTP_STATUS",
            BoardError::Fetch(_) => "FETCH_FAILED",
            BoardError::Network(_) => "NETWORK_ERROR",
            BoardError::Decode(_) => "DECODE_ERROR",
            BoardError::InvalidParameter { .. } => "INVALID_PARAMETER",
            BoardError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            BoardError::Transport(_) => "TRANSPORT_ERROR",
            BoardError::Config(_) => "CONFIG_ERROR",
            BoardError::Other(_) => "OTHER_ERROR",
        }
    }

    /// 是否应渲染为全屏校验提示（而不是错误页）
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, BoardError::InvalidParameter { .. })
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return BoardError::HttpStatus {
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return BoardError::Decode(err.to_string());
        }
        BoardError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::Decode(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for BoardError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        BoardError::Transport(err.to_string())
    }
}
