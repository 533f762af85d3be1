// ==========================================
// 车间电视看板 - 配置层
// ==========================================
// 职责: 显示配置加载、覆写与校验
// 存储: JSON 文件 + 环境变量（无持久化层）
// ==========================================

pub mod board_config;

// 重导出核心配置
pub use board_config::{
    default_config_path, env_keys, DisplayConfig, GroupBoardSettings, HiddenRowRule,
    HourlyGating, PlannerThresholds, ProductBoardSettings, RotationSettings,
};
