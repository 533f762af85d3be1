// ==========================================
// 车间电视看板 - 视图模型
// ==========================================
// 职责: 将当前页组合为可渲染的视图（与具体渲染方式无关）
// 状态: Loading / Error / InvalidParameter / NoData / Ready
// 错误状态为终态，不与表格混合显示
// ==========================================

use crate::api::error::BoardError;
use crate::domain::group::{Group, GroupSnapshot, HourSlot};
use crate::domain::product::{ProductDetail, ProductSnapshot};
use crate::engine::board::BoardSnapshot;
use crate::engine::delta::{detail_key, group_key, meta_key, product_key, FlashState};
use crate::engine::layout::Layout;
use crate::engine::row_filter::RowRef;
use crate::engine::slide_planner::Slide;
use serde::Serialize;

// ==========================================
// 视图结构
// ==========================================

/// 单元格
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub text: String,
    /// 是否处于变更闪烁
    pub flash: bool,
}

impl CellView {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flash: false,
        }
    }

    fn keyed(text: impl Into<String>, key: &str, flash: &FlashState) -> Self {
        Self {
            text: text.into(),
            flash: flash.is_flashing(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub cells: Vec<CellView>,
}

/// 指标（表头 / 看板头部）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub flash: bool,
}

impl Metric {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            flash: false,
        }
    }

    fn keyed(label: &str, value: impl Into<String>, key: &str, flash: &FlashState) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            flash: flash.is_flashing(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub title: Option<String>,
    pub summary: Vec<Metric>,
    pub columns: Vec<String>,
    pub rows: Vec<RowView>,
}

/// 轮播指示条中的一项
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorItem {
    pub index: usize,
    pub label: String,
    pub active: bool,
    pub next: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideIndicator {
    pub items: Vec<IndicatorItem>,
    pub active: usize,
    pub total: usize,
}

/// 切换提示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownView {
    pub seconds: u32,
    pub next_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadyView {
    pub title: String,
    pub connected: bool,
    pub last_update: String,
    pub header: Vec<Metric>,
    pub slide_label: String,
    pub layout: Layout,
    pub tables: Vec<TableView>,
    pub indicator: SlideIndicator,
    pub countdown: Option<CountdownView>,
    pub paused: bool,
}

/// 看板视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BoardView {
    Loading { title: String },
    Error { message: String },
    InvalidParameter { message: String },
    NoData { title: String },
    Ready(Box<ReadyView>),
}

impl BoardView {
    /// 错误转为全屏状态
    pub fn from_error(err: &BoardError) -> Self {
        if err.is_invalid_parameter() {
            BoardView::InvalidParameter {
                message: err.to_string(),
            }
        } else {
            BoardView::Error {
                message: err.to_string(),
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, BoardView::Ready(_))
    }
}

// ==========================================
// 数值格式
// ==========================================

pub fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// 带符号差值: 正数加 "+"
pub fn fmt_signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", fmt_num(value))
    } else {
        fmt_num(value)
    }
}

pub fn fmt_percent(value: f64) -> String {
    format!("{}%", fmt_num(value))
}

// ==========================================
// 指示条窗口
// ==========================================

pub const INDICATOR_WINDOW: usize = 5;

/// 最多 5 项，以当前页为中心，到两端时贴边
pub fn slide_indicator(slides: &[Slide], active: usize) -> SlideIndicator {
    let total = slides.len();
    let start = active
        .saturating_sub(INDICATOR_WINDOW / 2)
        .min(total.saturating_sub(INDICATOR_WINDOW));
    let end = (start + INDICATOR_WINDOW).min(total);
    let next = if total > 1 {
        Some((active + 1) % total)
    } else {
        None
    };

    SlideIndicator {
        items: (start..end)
            .map(|index| IndicatorItem {
                index,
                label: slides[index].label.clone(),
                active: index == active,
                next: Some(index) == next,
            })
            .collect(),
        active,
        total,
    }
}

// ==========================================
// 页面组合
// ==========================================

/// 组合上下文
pub struct ComposeContext<'a> {
    pub flash: &'a FlashState,
    pub layout: &'a Layout,
    /// 当前可显示的小时列（班组看板）
    pub visible_slots: &'a [HourSlot],
}

/// 一页的内容
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlideContent {
    pub header: Vec<Metric>,
    pub tables: Vec<TableView>,
}

/// 快照到视图的组合规则
pub trait ComposeView: BoardSnapshot {
    /// 看板标题
    fn title(&self) -> String;

    fn compose(&self, slide: &Slide, ctx: &ComposeContext<'_>) -> SlideContent;
}

// ==========================================
// 产品明细看板
// ==========================================

const PRODUCT_COLUMNS: [&str; 8] = [
    "STT",
    "TÊN CHI TIẾT",
    "NHU CẦU LŨY KẾ",
    "KẾ HOẠCH GIAO",
    "LŨY KẾ GIAO",
    "CÒN LẠI",
    "TTĐB",
    "CẦN XỬ LÝ",
];

fn product_row(
    stt: usize,
    row: &ProductDetail,
    key: &dyn Fn(&str) -> String,
    flash: &FlashState,
) -> RowView {
    let cell = |value: f64, field: &str| CellView::keyed(fmt_num(value), &key(field), flash);
    RowView {
        cells: vec![
            CellView::plain(stt.to_string()),
            CellView::keyed(row.ten_chi_tiet.clone(), &key("tenChiTiet"), flash),
            cell(row.nhu_cau_luy_ke, "nhuCauLuyKe"),
            cell(row.ke_hoach_giao, "keHoachGiao"),
            cell(row.luy_ke_giao, "luyKeGiao"),
            cell(row.con_lai, "conLai"),
            cell(row.ttdb, "ttdb"),
            cell(row.can_xu_ly, "canXuLy"),
        ],
    }
}

impl ComposeView for ProductSnapshot {
    fn title(&self) -> String {
        if self.sheet.is_empty() {
            "WIP".to_string()
        } else {
            self.sheet.clone()
        }
    }

    fn compose(&self, slide: &Slide, ctx: &ComposeContext<'_>) -> SlideContent {
        let flash = ctx.flash;

        let mut header = vec![
            Metric::keyed("MÃ CHUYỀN", &self.ma_chuyen_line, &meta_key("maChuyenLine"), flash),
            Metric::keyed("NHÀ MÁY", &self.factory, &meta_key("factory"), flash),
            Metric::keyed("LINE", &self.line, &meta_key("line"), flash),
            Metric::keyed("TỔ", &self.to, &meta_key("to"), flash),
            Metric::keyed(
                "TỔNG SP",
                self.total_products.to_string(),
                &meta_key("totalProducts"),
                flash,
            ),
        ];

        // 变更只针对页内首个产品；合并页中其余产品不闪烁
        let idle = FlashState::new(0);
        let mut rows = Vec::new();
        for (n, entry) in slide.entries.iter().enumerate() {
            let Some(product) = self.products.get(entry.entity_index) else {
                continue;
            };
            let flash = if n == 0 { flash } else { &idle };
            if n == 0 {
                header.extend([
                    Metric::keyed("MÃ", &product.ma, &product_key("ma"), flash),
                    Metric::keyed("MÀU", &product.mau, &product_key("mau"), flash),
                    Metric::keyed("SLKH", fmt_num(product.slkh), &product_key("slkh"), flash),
                ]);
            }

            for row in &entry.rows {
                let stt = rows.len() + 1;
                match row {
                    RowRef::Main => {
                        rows.push(product_row(stt, &product.main_row(), &product_key, flash));
                    }
                    RowRef::Detail(idx) => {
                        if let Some(detail) = product.details.get(*idx) {
                            let idx = *idx;
                            rows.push(product_row(
                                stt,
                                detail,
                                &move |field: &str| detail_key(idx, field),
                                flash,
                            ));
                        }
                    }
                    RowRef::Fixed(_) | RowRef::Extra(_) => {}
                }
            }
        }

        let columns: Vec<String> = PRODUCT_COLUMNS.iter().map(|c| c.to_string()).collect();
        let (left, right) = ctx.layout.partition(&rows);
        let mut tables = vec![TableView {
            title: None,
            summary: Vec::new(),
            columns: columns.clone(),
            rows: left.to_vec(),
        }];
        if !right.is_empty() {
            tables.push(TableView {
                title: None,
                summary: Vec::new(),
                columns,
                rows: right.to_vec(),
            });
        }

        SlideContent { header, tables }
    }
}

// ==========================================
// 班组产出看板
// ==========================================

fn group_columns(slots: &[HourSlot]) -> Vec<String> {
    let mut columns: Vec<String> = ["NHÓM", "LĐ LAYOUT", "LĐ THỰC TẾ", "CHÊNH LỆCH", "KẾ HOẠCH"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    columns.extend(slots.iter().map(|s| s.header().to_string()));
    columns.extend(
        ["LŨY KẾ THỰC HIỆN", "LŨY KẾ KẾ HOẠCH", "CHÊNH LỆCH LŨY KẾ", "%HT"]
            .iter()
            .map(|c| c.to_string()),
    );
    columns
}

fn group_row(team: &str, group: &Group, ctx: &ComposeContext<'_>) -> RowView {
    let flash = ctx.flash;
    let key = |field: &str| group_key(team, &group.nhom, field);

    let mut cells = vec![
        CellView::plain(group.nhom.clone()),
        CellView::plain(fmt_num(group.ld_layout)),
        CellView::plain(fmt_num(group.thuc_te)),
        CellView::plain(fmt_signed(group.staffing_diff())),
        CellView::plain(fmt_num(group.ke_hoach)),
    ];
    // 时段列始终 11 列，未到时段留空
    cells.extend(HourSlot::ALL.iter().map(|slot| {
        let text = if ctx.visible_slots.contains(slot) {
            fmt_num(group.hourly.get(*slot))
        } else {
            String::new()
        };
        CellView::keyed(text, &key(slot.key()), flash)
    }));
    cells.extend([
        CellView::keyed(fmt_num(group.luy_ke_thuc_hien), &key("luyKeThucHien"), flash),
        CellView::plain(fmt_num(group.luy_ke_ke_hoach)),
        CellView::plain(fmt_signed(group.cumulative_diff())),
        CellView::keyed(fmt_percent(group.percent_ht), &key("percentHT"), flash),
    ]);

    RowView { cells }
}

impl ComposeView for GroupSnapshot {
    fn title(&self) -> String {
        format!("LINE {}", self.line)
    }

    fn compose(&self, slide: &Slide, ctx: &ComposeContext<'_>) -> SlideContent {
        let columns = group_columns(&HourSlot::ALL);
        let mut tables = Vec::new();
        let mut total_layout = 0.0;
        let mut total_actual = 0.0;
        let mut first_tglv = None;

        for entry in &slide.entries {
            let Some(team) = self.teams.get(entry.entity_index) else {
                continue;
            };
            first_tglv.get_or_insert(team.tglv);

            let groups: Vec<&Group> = entry
                .rows
                .iter()
                .filter_map(|row| match row {
                    RowRef::Fixed(i) => team.fixed_groups.get(*i),
                    RowRef::Extra(i) => team.extra_groups.get(*i),
                    RowRef::Main | RowRef::Detail(_) => None,
                })
                .collect();

            // 表头汇总只统计本页显示的分组
            let team_layout: f64 = groups.iter().map(|g| g.ld_layout).sum();
            let team_actual: f64 = groups.iter().map(|g| g.thuc_te).sum();
            total_layout += team_layout;
            total_actual += team_actual;

            let diff = team_actual - team_layout;
            let actual_text = if diff == 0.0 {
                fmt_num(team_actual)
            } else {
                format!("{} ({})", fmt_num(team_actual), fmt_signed(diff))
            };

            tables.push(TableView {
                title: Some(team.ten_to.clone()),
                summary: vec![
                    Metric::new("LĐ LAYOUT", fmt_num(team_layout)),
                    Metric::new("LĐ THỰC TẾ", actual_text),
                    Metric::new("TGLV", fmt_num(team.tglv)),
                ],
                columns: columns.clone(),
                rows: groups
                    .iter()
                    .map(|g| group_row(&team.ten_to, g, ctx))
                    .collect(),
            });
        }

        let header = vec![
            Metric::new("LINE", self.line.to_string()),
            Metric::new("TỔNG LĐ LAYOUT", fmt_num(total_layout)),
            Metric::new("TỔNG LĐ THỰC TẾ", fmt_num(total_actual)),
            Metric::new("TGLV", fmt_num(first_tglv.unwrap_or(0.0))),
        ];

        SlideContent { header, tables }
    }
}
