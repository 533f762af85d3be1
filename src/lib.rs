// ==========================================
// 车间电视看板 - 核心库
// ==========================================
// 两种看板:
// - 产品明细看板（按产品族 cd1..cd4）
// - 小组产出看板（按产线 1..4）
// 系统定位: 只读展示（拉取 + 推送整体替换，客户端不做合并）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 快照实体与类型
pub mod domain;

// 引擎层 - 显示规则
pub mod engine;

// 存储层 - 内存快照
pub mod store;

// 接口层 - 后端拉取与参数校验
pub mod api;

// 推送层 - 实时通道
pub mod realtime;

// 应用层 - 会话与运行时
pub mod app;

// 展示层 - 文本渲染
pub mod render;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    BoardIdentity, BoardKind, Connectivity, GroupSnapshot, LineNumber, ProductCode,
    ProductSnapshot, UpdateType,
};

// 引擎
pub use engine::{
    BoardSnapshot, ChangeSet, DeltaDetector, FlashState, Layout, LayoutSelector, Navigation,
    RotationClock, Slide, SlidePlanner,
};

// 接口
pub use api::{parse_identity, BoardError, BoardResult, HttpBackendClient, SnapshotSource};

// 应用
pub use app::{spawn_board, BoardHandle, BoardSession, BoardView, PushChannel};

// 配置
pub use config::DisplayConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车间电视看板";
