// ==========================================
// 车间电视看板 - 接口层
// ==========================================
// 职责: 错误类型、身份参数校验、后端拉取
// ==========================================

pub mod backend_client;
pub mod error;
pub mod validator;

// 重导出核心类型
pub use backend_client::{snapshot_url, ApiEnvelope, HttpBackendClient, SnapshotSource};
pub use error::{BoardError, BoardResult};
pub use validator::{parse_identity, parse_line, parse_product_code};
