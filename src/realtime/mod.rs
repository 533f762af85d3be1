// ==========================================
// 车间电视看板 - 推送层
// ==========================================
// 职责: 推送通道帧编解码与连接管理
// 连接由看板会话持有，会话结束即断开
// ==========================================

pub mod connection;
pub mod messages;

pub use connection::ConnectionManager;
pub use messages::{ChannelEvent, EventNames, PushFrame, PushUpdate, ValidUpdate};
