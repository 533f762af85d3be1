// ==========================================
// 车间电视看板 - 应用层
// ==========================================
// 职责: 看板会话、视图模型与异步运行时
// ==========================================

pub mod runtime;
pub mod session;
pub mod view;

// 重导出
pub use runtime::{spawn_board, spawn_board_with_clock, BoardCommand, BoardHandle, PushChannel};
pub use session::BoardSession;
pub use view::{BoardView, ComposeView, ReadyView};
