// ==========================================
// 车间电视看板 - 引擎层
// ==========================================
// 职责: 纯显示逻辑（行过滤 / 变更检测 / 分页 / 轮播 / 布局）
// 红线: 引擎不做 I/O，不持有计时器句柄；时间由调用方传入
// ==========================================

pub mod board;
pub mod delta;
pub mod hourly;
pub mod layout;
pub mod rotation;
pub mod row_filter;
pub mod slide_planner;

// 重导出核心引擎
pub use board::{BoardSnapshot, PlanOptions};
pub use delta::{ChangeSet, DeltaDetector, FlashState};
pub use hourly::{is_slot_visible, visible_slots};
pub use layout::{DensityTier, Layout, LayoutRules, LayoutSelector, TableSplit};
pub use rotation::{ClockState, CountdownNotice, Navigation, RotationClock};
pub use row_filter::RowRef;
pub use slide_planner::{plan_slides, PlanEntity, Slide, SlideEntry, SlidePlanner};
