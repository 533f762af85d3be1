// ==========================================
// 车间电视看板 - 布局密度选择
// ==========================================
// 职责: 由当前页行数决定字号档位与是否分表（纯函数）
// 输入: 当前页总行数
// 输出: Layout（档位 / 分表 / 字号）
// ==========================================
// 档位优先级: ExtraLarge > Compact > Split > Normal
// 分表规则: 超过上限时左右两表，左表行数固定（不平分）
// ==========================================

use serde::Serialize;

/// 密度档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DensityTier {
    ExtraLarge,
    Normal,
    Split,
    Compact,
}

impl DensityTier {
    /// 字号（rem，上限值）
    pub fn font(&self) -> FontScale {
        match self {
            DensityTier::ExtraLarge => FontScale::new(3.1, 3.5),
            DensityTier::Compact => FontScale::new(1.0, 1.4),
            DensityTier::Split => FontScale::new(1.5, 2.0),
            DensityTier::Normal => FontScale::new(2.2, 2.5),
        }
    }
}

/// 字号
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontScale {
    pub header_rem: f32,
    pub row_rem: f32,
}

impl FontScale {
    const fn new(header_rem: f32, row_rem: f32) -> Self {
        Self {
            header_rem,
            row_rem,
        }
    }
}

/// 分表规则: 行数超过 above 时左表固定 first_table_rows 行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRule {
    pub above: usize,
    pub first_table_rows: usize,
}

// ==========================================
// LayoutRules - 看板布局参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRules {
    /// 行数 ≤ 此值为特大字号
    pub extra_large_max: usize,
    /// 左表行数 > 此值为紧凑字号
    pub compact_above: usize,
    /// 分表规则（按 above 降序）
    pub splits: &'static [SplitRule],
}

const PRODUCT_SPLITS: &[SplitRule] = &[
    SplitRule {
        above: 30,
        first_table_rows: 20,
    },
    SplitRule {
        above: 15,
        first_table_rows: 15,
    },
];

impl LayoutRules {
    /// 产品看板: ≤15 单表；16–30 左 15；>30 左 20
    pub fn product_board() -> Self {
        Self {
            extra_large_max: 6,
            compact_above: 18,
            splits: PRODUCT_SPLITS,
        }
    }

    /// 班组看板: 不分表
    pub fn group_board() -> Self {
        Self {
            extra_large_max: 6,
            compact_above: 18,
            splits: &[],
        }
    }
}

/// 分表结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSplit {
    pub left: usize,
    pub right: usize,
}

/// 布局结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    pub tier: DensityTier,
    pub total_rows: usize,
    pub split: Option<TableSplit>,
    pub font: FontScale,
}

impl Layout {
    /// 左表行数（未分表时为全部行）
    pub fn first_table_rows(&self) -> usize {
        self.split.map(|s| s.left).unwrap_or(self.total_rows)
    }

    /// 按分表结果切分行
    pub fn partition<'a, T>(&self, rows: &'a [T]) -> (&'a [T], &'a [T]) {
        let at = self.first_table_rows().min(rows.len());
        rows.split_at(at)
    }
}

// ==========================================
// LayoutSelector
// ==========================================
#[derive(Debug, Clone)]
pub struct LayoutSelector {
    rules: LayoutRules,
}

impl LayoutSelector {
    pub fn new(rules: LayoutRules) -> Self {
        Self { rules }
    }

    pub fn select(&self, total_rows: usize) -> Layout {
        let split = self
            .rules
            .splits
            .iter()
            .find(|rule| total_rows > rule.above)
            .map(|rule| TableSplit {
                left: rule.first_table_rows,
                right: total_rows - rule.first_table_rows,
            });

        let first_rows = split.map(|s| s.left).unwrap_or(total_rows);

        let tier = if total_rows <= self.rules.extra_large_max {
            DensityTier::ExtraLarge
        } else if first_rows > self.rules.compact_above {
            DensityTier::Compact
        } else if split.is_some() {
            DensityTier::Split
        } else {
            DensityTier::Normal
        };

        Layout {
            tier,
            total_rows,
            split,
            font: tier.font(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_tiers_by_row_count() {
        let selector = LayoutSelector::new(LayoutRules::product_board());

        let small = selector.select(4);
        assert_eq!(small.tier, DensityTier::ExtraLarge);
        assert!(small.split.is_none());

        let single = selector.select(15);
        assert_eq!(single.tier, DensityTier::Normal);
        assert!(single.split.is_none());

        let split = selector.select(16);
        assert_eq!(split.tier, DensityTier::Split);
        assert_eq!(split.split, Some(TableSplit { left: 15, right: 1 }));

        let upper = selector.select(30);
        assert_eq!(upper.split, Some(TableSplit { left: 15, right: 15 }));

        let dense = selector.select(37);
        assert_eq!(dense.tier, DensityTier::Compact);
        assert_eq!(dense.split, Some(TableSplit { left: 20, right: 17 }));
    }

    #[test]
    fn test_group_never_splits() {
        let selector = LayoutSelector::new(LayoutRules::group_board());

        assert_eq!(selector.select(6).tier, DensityTier::ExtraLarge);
        assert_eq!(selector.select(18).tier, DensityTier::Normal);

        let dense = selector.select(19);
        assert_eq!(dense.tier, DensityTier::Compact);
        assert!(dense.split.is_none());
    }

    #[test]
    fn test_partition_keeps_left_fixed() {
        let selector = LayoutSelector::new(LayoutRules::product_board());
        let rows: Vec<usize> = (0..22).collect();
        let layout = selector.select(rows.len());

        let (left, right) = layout.partition(&rows);
        assert_eq!(left.len(), 15);
        assert_eq!(right.len(), 7);
        assert_eq!(right[0], 15);
    }

    #[test]
    fn test_font_follows_tier() {
        let selector = LayoutSelector::new(LayoutRules::product_board());
        assert_eq!(selector.select(3).font.row_rem, 3.5);
        assert_eq!(selector.select(20).font.header_rem, 1.5);
    }
}
