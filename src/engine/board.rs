// ==========================================
// 车间电视看板 - 看板快照抽象
// ==========================================
// 职责: 将一种快照类型与其分页实体、变更检测规则绑定
// 两种实现: ProductSnapshot（产品明细看板）/ GroupSnapshot（班组产出看板）
// ==========================================

use crate::config::HiddenRowRule;
use crate::domain::group::{GroupSnapshot, EXTRA_GROUP_LABEL};
use crate::domain::product::ProductSnapshot;
use crate::domain::types::BoardKind;
use crate::engine::delta::{group_changes, product_changes, ChangeSet};
use crate::engine::row_filter::{visible_product_rows, visible_team_rows};
use crate::engine::slide_planner::PlanEntity;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// 分页选项（随看板配置传入）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanOptions {
    pub hidden_row_rule: HiddenRowRule,
}

// ==========================================
// BoardSnapshot Trait
// ==========================================
pub trait BoardSnapshot: DeserializeOwned + Send + Sync + Debug + 'static {
    /// 看板种类
    const KIND: BoardKind;

    /// 服务端时间戳
    fn last_update(&self) -> &str;

    /// 参与分页的非空实体（快照顺序）
    fn plan_entities(&self, options: &PlanOptions) -> Vec<PlanEntity>;

    /// 前后快照差异（active 为当前实体下标）
    fn detect_changes(prev: &Self, curr: &Self, active: Option<usize>) -> ChangeSet;
}

impl BoardSnapshot for ProductSnapshot {
    const KIND: BoardKind = BoardKind::ProductDetail;

    fn last_update(&self) -> &str {
        &self.last_update
    }

    fn plan_entities(&self, options: &PlanOptions) -> Vec<PlanEntity> {
        self.products
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_numerically_empty())
            .map(|(index, p)| PlanEntity {
                index,
                label: p.slide_label(),
                primary: visible_product_rows(p, options.hidden_row_rule),
                secondary: Vec::new(),
                secondary_label: "",
            })
            .collect()
    }

    fn detect_changes(prev: &Self, curr: &Self, active: Option<usize>) -> ChangeSet {
        product_changes(prev, curr, active)
    }
}

impl BoardSnapshot for GroupSnapshot {
    const KIND: BoardKind = BoardKind::GroupOutput;

    fn last_update(&self) -> &str {
        &self.last_update
    }

    fn plan_entities(&self, _options: &PlanOptions) -> Vec<PlanEntity> {
        self.teams
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_empty())
            .map(|(index, t)| {
                let (primary, secondary) = visible_team_rows(t);
                PlanEntity {
                    index,
                    label: t.ten_to.clone(),
                    primary,
                    secondary,
                    secondary_label: EXTRA_GROUP_LABEL,
                }
            })
            .collect()
    }

    // 多个班组可能同页显示，比对全部班组
    fn detect_changes(prev: &Self, curr: &Self, _active: Option<usize>) -> ChangeSet {
        group_changes(prev, curr)
    }
}
