// ==========================================
// 车间电视看板 - 显示行过滤
// ==========================================
// 职责: 决定哪些明细/分组行参与显示
// 红线: 仅是显示期过滤，不删除快照数据
// ==========================================

use crate::config::HiddenRowRule;
use crate::domain::group::{Group, Team};
use crate::domain::product::Product;

// ==========================================
// RowRef - 行引用
// ==========================================
// 指向快照中某个实体的某一行（不复制数据）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowRef {
    /// 产品主行
    Main,
    /// 产品明细行（details 下标）
    Detail(usize),
    /// 固定分组（fixed_groups 下标）
    Fixed(usize),
    /// 附加分组（extra_groups 下标）
    Extra(usize),
}

impl RowRef {
    /// 是否属于次级行组（附加分组）
    pub fn is_secondary(&self) -> bool {
        matches!(self, RowRef::Extra(_))
    }
}

// ==========================================
// 产品行
// ==========================================

fn is_product_row_hidden(label: &str, hidden_flag: &str, rule: HiddenRowRule) -> bool {
    if label.trim().is_empty() {
        return true;
    }
    match rule {
        HiddenRowRule::LabelOnly => false,
        HiddenRowRule::LabelOrFlag => !hidden_flag.trim().is_empty(),
    }
}

/// 产品的可见行: 主行在前，明细按原顺序
pub fn visible_product_rows(product: &Product, rule: HiddenRowRule) -> Vec<RowRef> {
    let mut rows = Vec::with_capacity(product.details.len() + 1);

    if !is_product_row_hidden(&product.ten_chi_tiet, &product.hidden, rule) {
        rows.push(RowRef::Main);
    }

    rows.extend(
        product
            .details
            .iter()
            .enumerate()
            .filter(|(_, d)| !is_product_row_hidden(&d.ten_chi_tiet, &d.hidden, rule))
            .map(|(idx, _)| RowRef::Detail(idx)),
    );

    rows
}

// ==========================================
// 分组行
// ==========================================

/// 分组行是否隐藏
///
/// 规则（任一成立即隐藏）:
/// - 编制 / 实际 / 计划 全为 0
/// - 累计完成 / 累计计划 / 完成率 全为 0
pub fn is_group_row_suppressed(group: &Group) -> bool {
    (group.ld_layout == 0.0 && group.thuc_te == 0.0 && group.ke_hoach == 0.0)
        || (group.luy_ke_thuc_hien == 0.0
            && group.luy_ke_ke_hoach == 0.0
            && group.percent_ht == 0.0)
}

/// 班组的可见行: (固定分组, 附加分组)
pub fn visible_team_rows(team: &Team) -> (Vec<RowRef>, Vec<RowRef>) {
    let fixed = team
        .fixed_groups
        .iter()
        .enumerate()
        .filter(|(_, g)| !is_group_row_suppressed(g))
        .map(|(idx, _)| RowRef::Fixed(idx))
        .collect();

    let extra = team
        .extra_groups
        .iter()
        .enumerate()
        .filter(|(_, g)| !is_group_row_suppressed(g))
        .map(|(idx, _)| RowRef::Extra(idx))
        .collect();

    (fixed, extra)
}
