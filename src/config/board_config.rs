// ==========================================
// 车间电视看板 - 显示配置
// ==========================================
// 加载顺序: 默认值 → JSON 配置文件 → 环境变量覆写 → 校验
// CLI 参数在 main.rs 中最后覆写
// ==========================================

use crate::api::error::{BoardError, BoardResult};
use crate::domain::types::BoardKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ==========================================
// 环境变量键
// ==========================================
pub mod env_keys {
    pub const BACKEND_URL: &str = "TV_BOARD_BACKEND_URL";
    pub const PUSH_URL: &str = "TV_BOARD_PUSH_URL";
    pub const CONFIG_PATH: &str = "TV_BOARD_CONFIG";
    pub const TV_MODE: &str = "TV_BOARD_TV_MODE";
}

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

// ==========================================
// 隐藏行规则（产品看板）
// ==========================================
// 待产品确认：默认采用更严格的 LabelOrFlag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenRowRule {
    /// 仅过滤空名称行
    LabelOnly,
    /// 过滤空名称行 或 隐藏标记非空的行
    #[default]
    LabelOrFlag,
}

// ==========================================
// 小时列显示规则（班组看板）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourlyGating {
    /// 到达开班时刻后显示全部时段
    #[default]
    AfterShiftStart,
    /// 仅显示时刻已过的时段
    ElapsedOnly,
}

// ==========================================
// 轮播参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    /// 每页停留秒数
    pub slide_interval_secs: u32,
    /// 切换提示窗口（最后 N 秒）
    pub countdown_window_secs: u32,
    /// 手动翻页后的暂停秒数
    pub manual_pause_secs: u32,
}

impl RotationSettings {
    pub fn with_interval(slide_interval_secs: u32) -> Self {
        Self {
            slide_interval_secs,
            countdown_window_secs: 5,
            manual_pause_secs: 5,
        }
    }
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self::with_interval(30)
    }
}

// ==========================================
// 分页参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerThresholds {
    /// 合并为单页的最大实体数
    pub combine_max_entities: usize,
    /// 合并时每个实体允许的最大主行数
    pub combine_max_rows: usize,
    /// 每页最大行数（超出则分页）
    pub page_capacity: usize,
}

impl PlannerThresholds {
    pub fn group_board() -> Self {
        Self {
            combine_max_entities: 2,
            combine_max_rows: 9,
            page_capacity: 9,
        }
    }

    pub fn product_board() -> Self {
        Self {
            combine_max_entities: 1,
            combine_max_rows: 40,
            page_capacity: 40,
        }
    }
}

impl Default for PlannerThresholds {
    fn default() -> Self {
        Self::group_board()
    }
}

// ==========================================
// 产品看板配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductBoardSettings {
    pub rotation: RotationSettings,
    pub planner: PlannerThresholds,
    pub hidden_row_rule: HiddenRowRule,
}

impl Default for ProductBoardSettings {
    fn default() -> Self {
        Self {
            rotation: RotationSettings::with_interval(20),
            planner: PlannerThresholds::product_board(),
            hidden_row_rule: HiddenRowRule::default(),
        }
    }
}

// ==========================================
// 班组看板配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupBoardSettings {
    pub rotation: RotationSettings,
    pub planner: PlannerThresholds,
    pub hourly_gating: HourlyGating,
    /// 开班时刻（小时）
    pub shift_start_hour: u32,
}

impl Default for GroupBoardSettings {
    fn default() -> Self {
        Self {
            rotation: RotationSettings::with_interval(30),
            planner: PlannerThresholds::group_board(),
            hourly_gating: HourlyGating::default(),
            shift_start_hour: 7,
        }
    }
}

// ==========================================
// DisplayConfig - 显示配置（顶层）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 后端 HTTP 地址
    pub backend_url: String,
    /// 推送通道地址（缺省由 backend_url 推导）
    pub push_url: Option<String>,
    pub request_timeout_secs: u64,
    pub reconnect_delay_ms: u64,
    /// 无人值守轮播模式
    pub tv_mode: bool,
    /// 变更闪烁持续时间
    pub flash_duration_ms: u64,
    pub product: ProductBoardSettings,
    pub group: GroupBoardSettings,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            push_url: None,
            request_timeout_secs: 30,
            reconnect_delay_ms: 3000,
            tv_mode: true,
            flash_duration_ms: 2000,
            product: ProductBoardSettings::default(),
            group: GroupBoardSettings::default(),
        }
    }
}

impl DisplayConfig {
    /// 加载配置
    ///
    /// # 参数
    /// - path: 显式指定的配置文件；为 None 时依次尝试环境变量和用户配置目录
    ///
    /// # 返回
    /// - Ok(DisplayConfig): 合并并校验后的配置
    /// - Err(BoardError::Config): 文件无法读取/解析或校验失败
    pub fn load(path: Option<&Path>) -> BoardResult<Self> {
        let resolved = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        let mut config = match resolved {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取（缺失字段取默认值）
    pub fn from_file(path: &Path) -> BoardResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BoardError::Config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        let config: DisplayConfig = serde_json::from_str(&raw).map_err(|e| {
            BoardError::Config(format!("配置文件格式错误 {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "配置文件已加载");
        Ok(config)
    }

    /// 环境变量覆写
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = non_empty_env(env_keys::BACKEND_URL) {
            self.backend_url = url;
        }
        if let Some(url) = non_empty_env(env_keys::PUSH_URL) {
            self.push_url = Some(url);
        }
        if let Some(flag) = non_empty_env(env_keys::TV_MODE) {
            self.tv_mode = is_true(&flag);
        }
    }

    /// 配置校验
    pub fn validate(&self) -> BoardResult<()> {
        if self.backend_url.trim().is_empty() {
            return Err(BoardError::Config("backend_url 不能为空".to_string()));
        }
        for (name, rotation) in [
            ("product", &self.product.rotation),
            ("group", &self.group.rotation),
        ] {
            if rotation.slide_interval_secs == 0 {
                return Err(BoardError::Config(format!(
                    "{}.rotation.slide_interval_secs 必须大于 0",
                    name
                )));
            }
        }
        for (name, planner) in [
            ("product", &self.product.planner),
            ("group", &self.group.planner),
        ] {
            if planner.page_capacity == 0 {
                return Err(BoardError::Config(format!(
                    "{}.planner.page_capacity 必须大于 0",
                    name
                )));
            }
        }
        if self.group.shift_start_hour > 23 {
            return Err(BoardError::Config(
                "group.shift_start_hour 必须在 0..=23".to_string(),
            ));
        }
        Ok(())
    }

    /// 推送通道地址: 显式配置优先，否则 http(s) → ws(s) + "/ws"
    pub fn resolved_push_url(&self) -> String {
        if let Some(url) = &self.push_url {
            return url.clone();
        }
        let base = self.backend_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };
        format!("{}/ws", ws_base)
    }

    /// 按看板种类取轮播参数
    pub fn rotation_for(&self, kind: BoardKind) -> &RotationSettings {
        match kind {
            BoardKind::ProductDetail => &self.product.rotation,
            BoardKind::GroupOutput => &self.group.rotation,
        }
    }

    /// 覆写某种看板的轮播周期（CLI --interval）
    pub fn override_interval(&mut self, kind: BoardKind, secs: u32) {
        match kind {
            BoardKind::ProductDetail => self.product.rotation.slide_interval_secs = secs,
            BoardKind::GroupOutput => self.group.rotation.slide_interval_secs = secs,
        }
    }
}

/// 默认配置文件路径: $TV_BOARD_CONFIG 或 用户配置目录/factory-tv-board/config.json
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = non_empty_env(env_keys::CONFIG_PATH) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("factory-tv-board").join("config.json"))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}
