// ==========================================
// 车间电视看板 - 变更检测引擎
// ==========================================
// 职责: 比对前后两份快照的受监视字段，产出变更键集合
// 输入: 上一份快照 + 当前快照 + 当前实体下标
// 输出: ChangeSet（驱动 2 秒闪烁）
// ==========================================
// 红线:
// - 首次观测只记录基线，不产生变更
// - 同一引用的快照不重复比对
// - 当前实体下标越界时只比对元数据，不报错
// - 先取出旧基线再替换（compare-then-swap）
// ==========================================

use crate::domain::group::{Group, GroupSnapshot, HourSlot};
use crate::domain::product::{ProductDetail, ProductSnapshot};
use crate::engine::board::BoardSnapshot;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// ChangeSet - 变更键集合
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(BTreeSet<String>);

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>) {
        self.0.insert(key.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<K> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ==========================================
// 变更键
// ==========================================

/// 产品看板元数据键: meta-<field>
pub fn meta_key(field: &str) -> String {
    format!("meta-{}", field)
}

/// 产品主行键: product-<field>
pub fn product_key(field: &str) -> String {
    format!("product-{}", field)
}

/// 产品明细键: detail-<idx>-<field>
pub fn detail_key(index: usize, field: &str) -> String {
    format!("detail-{}-{}", index, field)
}

/// 班组看板键: <班组>-<分组>-<field>
pub fn group_key(team: &str, group: &str, field: &str) -> String {
    format!("{}-{}-{}", team, group, field)
}

fn differs<T: PartialEq + ?Sized>(a: &T, b: &T) -> bool {
    a != b
}

// ==========================================
// 产品看板比对
// ==========================================

fn compare_detail_fields(
    changes: &mut ChangeSet,
    prev: &ProductDetail,
    curr: &ProductDetail,
    key: impl Fn(&str) -> String,
) {
    let numeric = [
        ("nhuCauLuyKe", prev.nhu_cau_luy_ke, curr.nhu_cau_luy_ke),
        ("keHoachGiao", prev.ke_hoach_giao, curr.ke_hoach_giao),
        ("luyKeGiao", prev.luy_ke_giao, curr.luy_ke_giao),
        ("conLai", prev.con_lai, curr.con_lai),
        ("ttdb", prev.ttdb, curr.ttdb),
        ("canXuLy", prev.can_xu_ly, curr.can_xu_ly),
    ];
    for (field, a, b) in numeric {
        if differs(&a, &b) {
            changes.insert(key(field));
        }
    }
    if differs(prev.ten_chi_tiet.as_str(), curr.ten_chi_tiet.as_str()) {
        changes.insert(key("tenChiTiet"));
    }
}

/// 产品看板变更检测
///
/// 监视字段:
/// - 元数据: maChuyenLine / factory / line / to / totalProducts
/// - 当前产品: ma / mau / slkh 及主行明细字段
/// - 当前产品的每个明细行（按下标对齐）
#[instrument(skip(prev, curr))]
pub fn product_changes(
    prev: &ProductSnapshot,
    curr: &ProductSnapshot,
    active: Option<usize>,
) -> ChangeSet {
    let mut changes = ChangeSet::new();

    let meta = [
        ("maChuyenLine", &prev.ma_chuyen_line, &curr.ma_chuyen_line),
        ("factory", &prev.factory, &curr.factory),
        ("line", &prev.line, &curr.line),
        ("to", &prev.to, &curr.to),
    ];
    for (field, a, b) in meta {
        if differs(a, b) {
            changes.insert(meta_key(field));
        }
    }
    if differs(&prev.total_products, &curr.total_products) {
        changes.insert(meta_key("totalProducts"));
    }

    let Some(index) = active else {
        return changes;
    };
    let (Some(p), Some(c)) = (prev.products.get(index), curr.products.get(index)) else {
        tracing::debug!(index, "当前产品下标越界，仅比对元数据");
        return changes;
    };

    if differs(&p.ma, &c.ma) {
        changes.insert(product_key("ma"));
    }
    if differs(&p.mau, &c.mau) {
        changes.insert(product_key("mau"));
    }
    if differs(&p.slkh, &c.slkh) {
        changes.insert(product_key("slkh"));
    }
    compare_detail_fields(&mut changes, &p.main_row(), &c.main_row(), product_key);

    for (idx, (pd, cd)) in p.details.iter().zip(c.details.iter()).enumerate() {
        compare_detail_fields(&mut changes, pd, cd, |field| detail_key(idx, field));
    }

    changes
}

// ==========================================
// 班组看板比对
// ==========================================

fn compare_group(changes: &mut ChangeSet, team: &str, prev: &Group, curr: &Group) {
    let key = |field: &str| group_key(team, &curr.nhom, field);

    for slot in HourSlot::ALL {
        if differs(&prev.hourly.get(slot), &curr.hourly.get(slot)) {
            changes.insert(key(slot.key()));
        }
    }
    if differs(&prev.luy_ke_thuc_hien, &curr.luy_ke_thuc_hien) {
        changes.insert(key("luyKeThucHien"));
    }
    if differs(&prev.percent_ht, &curr.percent_ht) {
        changes.insert(key("percentHT"));
    }
}

/// 班组看板变更检测
///
/// 比对全部班组（多个班组可能同页显示），固定/附加分组按下标对齐；
/// 监视 11 个小时桶、累计完成、完成率
#[instrument(skip(prev, curr))]
pub fn group_changes(prev: &GroupSnapshot, curr: &GroupSnapshot) -> ChangeSet {
    let mut changes = ChangeSet::new();

    for (pt, ct) in prev.teams.iter().zip(curr.teams.iter()) {
        for (pg, cg) in pt.fixed_groups.iter().zip(ct.fixed_groups.iter()) {
            compare_group(&mut changes, &ct.ten_to, pg, cg);
        }
        for (pg, cg) in pt.extra_groups.iter().zip(ct.extra_groups.iter()) {
            compare_group(&mut changes, &ct.ten_to, pg, cg);
        }
    }

    changes
}

// ==========================================
// DeltaDetector - 带基线的检测器
// ==========================================
pub struct DeltaDetector<S: BoardSnapshot> {
    baseline: Option<Arc<S>>,
    active: Option<usize>,
}

impl<S: BoardSnapshot> Default for DeltaDetector<S> {
    fn default() -> Self {
        Self {
            baseline: None,
            active: None,
        }
    }
}

impl<S: BoardSnapshot> DeltaDetector<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 观测一份快照
    ///
    /// # 返回
    /// - None: 快照与当前实体均未变化（无需重算）
    /// - Some(empty): 首次观测，仅记录基线
    /// - Some(changes): 与上一份基线的差异
    pub fn observe(&mut self, current: &Arc<S>, active: Option<usize>) -> Option<ChangeSet> {
        let Some(baseline) = &self.baseline else {
            self.baseline = Some(Arc::clone(current));
            self.active = active;
            return Some(ChangeSet::new());
        };

        if Arc::ptr_eq(baseline, current) && self.active == active {
            return None;
        }

        // 先取出旧基线，再写入新基线
        let previous = std::mem::replace(&mut self.baseline, Some(Arc::clone(current)));
        self.active = active;

        let changes = match previous {
            Some(prev) => S::detect_changes(&prev, current, active),
            None => ChangeSet::new(),
        };

        if !changes.is_empty() {
            tracing::debug!(kind = %S::KIND, changed = changes.len(), "检测到字段变更");
        }
        Some(changes)
    }

    pub fn baseline(&self) -> Option<&Arc<S>> {
        self.baseline.as_ref()
    }

    pub fn reset(&mut self) {
        self.baseline = None;
        self.active = None;
    }
}

// ==========================================
// FlashState - 闪烁窗口
// ==========================================
// 非空变更集整体替换旧集合并重置截止时间（不累积计时器）
#[derive(Debug, Clone)]
pub struct FlashState {
    keys: ChangeSet,
    deadline_ms: Option<u64>,
    duration_ms: u64,
}

impl FlashState {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            keys: ChangeSet::new(),
            deadline_ms: None,
            duration_ms,
        }
    }

    /// 触发闪烁；空集合不影响当前闪烁
    pub fn trigger(&mut self, changes: ChangeSet, now_ms: u64) {
        if changes.is_empty() {
            return;
        }
        self.keys = changes;
        self.deadline_ms = Some(now_ms + self.duration_ms);
    }

    /// 到期清空；返回是否发生了清空
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.keys = ChangeSet::new();
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_flashing(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> &ChangeSet {
        &self.keys
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }

    pub fn clear(&mut self) {
        self.keys = ChangeSet::new();
        self.deadline_ms = None;
    }
}
