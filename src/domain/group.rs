// ==========================================
// 车间电视看板 - 班组产出快照领域模型
// ==========================================
// 数据源: GET /api/display/qsl?line=N
// 小时桶固定 11 个时段，所有分组一致，无动态键
// ==========================================

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// HourSlot - 小时时段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourSlot {
    H8h30,
    H9h30,
    H10h30,
    H11h30,
    H13h30,
    H14h30,
    H15h30,
    H16h30,
    H18h,
    H19h,
    H20h,
}

impl HourSlot {
    /// 显示顺序
    pub const ALL: [HourSlot; 11] = [
        HourSlot::H8h30,
        HourSlot::H9h30,
        HourSlot::H10h30,
        HourSlot::H11h30,
        HourSlot::H13h30,
        HourSlot::H14h30,
        HourSlot::H15h30,
        HourSlot::H16h30,
        HourSlot::H18h,
        HourSlot::H19h,
        HourSlot::H20h,
    ];

    /// JSON 键名（同时用作变更键的字段名）
    pub fn key(&self) -> &'static str {
        match self {
            HourSlot::H8h30 => "h8h30",
            HourSlot::H9h30 => "h9h30",
            HourSlot::H10h30 => "h10h30",
            HourSlot::H11h30 => "h11h30",
            HourSlot::H13h30 => "h13h30",
            HourSlot::H14h30 => "h14h30",
            HourSlot::H15h30 => "h15h30",
            HourSlot::H16h30 => "h16h30",
            HourSlot::H18h => "h18h",
            HourSlot::H19h => "h19h",
            HourSlot::H20h => "h20h",
        }
    }

    /// 表头文字
    pub fn header(&self) -> &'static str {
        match self {
            HourSlot::H8h30 => "8H30",
            HourSlot::H9h30 => "9H30",
            HourSlot::H10h30 => "10H30",
            HourSlot::H11h30 => "11H30",
            HourSlot::H13h30 => "13H30",
            HourSlot::H14h30 => "14H30",
            HourSlot::H15h30 => "15H30",
            HourSlot::H16h30 => "16H30",
            HourSlot::H18h => "18H",
            HourSlot::H19h => "19H",
            HourSlot::H20h => "20H",
        }
    }

    /// 时段对应的时刻
    pub fn time_of_day(&self) -> NaiveTime {
        let (hour, minute) = match self {
            HourSlot::H8h30 => (8, 30),
            HourSlot::H9h30 => (9, 30),
            HourSlot::H10h30 => (10, 30),
            HourSlot::H11h30 => (11, 30),
            HourSlot::H13h30 => (13, 30),
            HourSlot::H14h30 => (14, 30),
            HourSlot::H15h30 => (15, 30),
            HourSlot::H16h30 => (16, 30),
            HourSlot::H18h => (18, 0),
            HourSlot::H19h => (19, 0),
            HourSlot::H20h => (20, 0),
        };
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for HourSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ==========================================
// HourlyData - 小时产出
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyData {
    #[serde(default)]
    pub h8h30: f64,
    #[serde(default)]
    pub h9h30: f64,
    #[serde(default)]
    pub h10h30: f64,
    #[serde(default)]
    pub h11h30: f64,
    #[serde(default)]
    pub h13h30: f64,
    #[serde(default)]
    pub h14h30: f64,
    #[serde(default)]
    pub h15h30: f64,
    #[serde(default)]
    pub h16h30: f64,
    #[serde(default)]
    pub h18h: f64,
    #[serde(default)]
    pub h19h: f64,
    #[serde(default)]
    pub h20h: f64,
}

impl HourlyData {
    pub fn get(&self, slot: HourSlot) -> f64 {
        match slot {
            HourSlot::H8h30 => self.h8h30,
            HourSlot::H9h30 => self.h9h30,
            HourSlot::H10h30 => self.h10h30,
            HourSlot::H11h30 => self.h11h30,
            HourSlot::H13h30 => self.h13h30,
            HourSlot::H14h30 => self.h14h30,
            HourSlot::H15h30 => self.h15h30,
            HourSlot::H16h30 => self.h16h30,
            HourSlot::H18h => self.h18h,
            HourSlot::H19h => self.h19h,
            HourSlot::H20h => self.h20h,
        }
    }

    pub fn set(&mut self, slot: HourSlot, value: f64) {
        let field = match slot {
            HourSlot::H8h30 => &mut self.h8h30,
            HourSlot::H9h30 => &mut self.h9h30,
            HourSlot::H10h30 => &mut self.h10h30,
            HourSlot::H11h30 => &mut self.h11h30,
            HourSlot::H13h30 => &mut self.h13h30,
            HourSlot::H14h30 => &mut self.h14h30,
            HourSlot::H15h30 => &mut self.h15h30,
            HourSlot::H16h30 => &mut self.h16h30,
            HourSlot::H18h => &mut self.h18h,
            HourSlot::H19h => &mut self.h19h,
            HourSlot::H20h => &mut self.h20h,
        };
        *field = value;
    }

    pub fn is_all_zero(&self) -> bool {
        HourSlot::ALL.iter().all(|slot| self.get(*slot) == 0.0)
    }
}

// ==========================================
// Group - 工序分组行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub nhom: String,             // 分组类别 (ĐÓNG GÓI / RÁP / THÂN ...)
    #[serde(default)]
    pub ld_layout: f64,           // 编制人数
    #[serde(default)]
    pub thuc_te: f64,             // 实际人数
    #[serde(default)]
    pub ke_hoach: f64,            // 小时计划
    #[serde(default)]
    pub hourly: HourlyData,
    #[serde(default)]
    pub luy_ke_thuc_hien: f64,    // 累计完成
    #[serde(default)]
    pub luy_ke_ke_hoach: f64,     // 累计计划
    #[serde(default, rename = "percentHT")]
    pub percent_ht: f64,          // 完成率 %
}

impl Group {
    /// 全部数值字段（含小时桶）是否为 0
    pub fn is_all_zero(&self) -> bool {
        self.ld_layout == 0.0
            && self.thuc_te == 0.0
            && self.ke_hoach == 0.0
            && self.luy_ke_thuc_hien == 0.0
            && self.luy_ke_ke_hoach == 0.0
            && self.percent_ht == 0.0
            && self.hourly.is_all_zero()
    }

    /// 实际 - 编制
    pub fn staffing_diff(&self) -> f64 {
        self.thuc_te - self.ld_layout
    }

    /// 累计完成 - 累计计划
    pub fn cumulative_diff(&self) -> f64 {
        self.luy_ke_thuc_hien - self.luy_ke_ke_hoach
    }
}

// ==========================================
// Team - 班组（看板实体）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub ten_to: String,           // 班组名 (TỔ 1 ...)
    #[serde(default)]
    pub tglv: f64,                // 工作时间单位

    /// 固定分组（始终存在的类别）
    #[serde(default)]
    pub fixed_groups: Vec<Group>,

    /// 附加分组（小件，计划非 0 时才出现）
    #[serde(default, rename = "tuiNhoGroups")]
    pub extra_groups: Vec<Group>,
}

impl Team {
    /// 固定 + 附加分组全部为 0
    pub fn is_empty(&self) -> bool {
        self.fixed_groups
            .iter()
            .chain(self.extra_groups.iter())
            .all(Group::is_all_zero)
    }
}

// ==========================================
// GroupSnapshot - 班组产出快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub sheet_name: String,
    #[serde(default)]
    pub total_teams: u32,
    #[serde(default)]
    pub last_update: String,

    /// 班组列表（数组顺序即显示顺序）
    #[serde(default)]
    pub teams: Vec<Team>,
}

/// 附加分组在轮播标签中的名称
pub const EXTRA_GROUP_LABEL: &str = "TÚI NHỎ";
