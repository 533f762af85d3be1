// ==========================================
// 车间电视看板 - 领域模型层
// ==========================================
// 职责: 定义快照实体与看板类型
// 红线: 不含网络逻辑，不含轮播/比对逻辑
// ==========================================

pub mod group;
pub mod product;
pub mod types;

// 重导出核心类型
pub use group::{Group, GroupSnapshot, HourSlot, HourlyData, Team, EXTRA_GROUP_LABEL};
pub use product::{Product, ProductDetail, ProductSnapshot};
pub use types::{
    BoardIdentity, BoardKind, Connectivity, LineNumber, ProductCode, UpdateType,
};
