// ==========================================
// 车间电视看板 - 轮播分页引擎
// ==========================================
// 职责: 将快照的实体切分为有序的轮播页
// 输入: 快照 + 分页阈值
// 输出: Vec<Slide>（每页包含哪些实体、哪些行、页标签）
// ==========================================
// 规则（按优先级）:
// 1. 全 0 实体不参与任何一页
// 2. 实体数少、每个实体行数在阈值内、且无附加行 → 全部合并为一页
// 3. 否则每个实体一页；行数超过容量时按容量分页，标签加 "(页/总页)"；
//    附加行与主行分别分页，附加页标签加附加组名
// 4. 页顺序 = 实体顺序，实体内主行页在前、附加页在后
// ==========================================

use crate::config::PlannerThresholds;
use crate::engine::board::{BoardSnapshot, PlanOptions};
use crate::engine::row_filter::RowRef;
use std::sync::Arc;
use tracing::instrument;


// ==========================================
// 分页输入
// ==========================================

/// 参与分页的实体（已过滤全 0 实体）
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntity {
    /// 实体在快照数组中的原始下标
    pub index: usize,
    /// 实体标签（班组名 / 款号/颜色）
    pub label: String,
    /// 主行（可见行）
    pub primary: Vec<RowRef>,
    /// 附加行（可见行）
    pub secondary: Vec<RowRef>,
    /// 附加行分页标签的后缀
    pub secondary_label: &'static str,
}

impl PlanEntity {
    pub fn total_rows(&self) -> usize {
        self.primary.len() + self.secondary.len()
    }
}

// ==========================================
// 分页输出
// ==========================================

/// 页内的一个实体及其行
#[derive(Debug, Clone, PartialEq)]
pub struct SlideEntry {
    pub entity_index: usize,
    pub rows: Vec<RowRef>,
}

impl SlideEntry {
    pub fn primary_row_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_secondary()).count()
    }
}

/// 轮播页
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub label: String,
    pub entries: Vec<SlideEntry>,
}

impl Slide {
    /// 页内总行数（布局选择的输入）
    pub fn row_count(&self) -> usize {
        self.entries.iter().map(|e| e.rows.len()).sum()
    }

    /// 页内主行数
    pub fn primary_row_count(&self) -> usize {
        self.entries.iter().map(SlideEntry::primary_row_count).sum()
    }

    /// 页内实体下标（按显示顺序）
    pub fn entity_indices(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.entity_index).collect()
    }

    /// 首个实体（"当前实体"，用于变更比对）
    pub fn primary_entity(&self) -> Option<usize> {
        self.entries.first().map(|e| e.entity_index)
    }
}

// ==========================================
// 纯分页函数
// ==========================================

/// 按阈值将实体切分为轮播页（纯函数）
pub fn plan_slides(entities: &[PlanEntity], thresholds: &PlannerThresholds) -> Vec<Slide> {
    // 全部行被隐藏的实体不成页
    let entities: Vec<&PlanEntity> = entities.iter().filter(|e| e.total_rows() > 0).collect();
    if entities.is_empty() {
        return Vec::new();
    }

    let can_combine_all = entities.len() <= thresholds.combine_max_entities
        && entities.iter().all(|e| {
            e.secondary.is_empty() && e.primary.len() <= thresholds.combine_max_rows
        });

    if can_combine_all {
        return vec![Slide {
            label: entities
                .iter()
                .map(|e| e.label.as_str())
                .collect::<Vec<_>>()
                .join(" & "),
            entries: entities
                .iter()
                .map(|e| SlideEntry {
                    entity_index: e.index,
                    rows: e.primary.clone(),
                })
                .collect(),
        }];
    }

    let capacity = thresholds.page_capacity.max(1);
    let mut slides = Vec::new();

    for entity in entities {
        // 主行 + 附加行放得下一页
        if entity.total_rows() <= capacity {
            let mut rows = entity.primary.clone();
            rows.extend(entity.secondary.iter().copied());
            slides.push(Slide {
                label: entity.label.clone(),
                entries: vec![SlideEntry {
                    entity_index: entity.index,
                    rows,
                }],
            });
            continue;
        }

        // 主行、附加行各自分页
        push_pages(&mut slides, entity.index, &entity.label, &entity.primary, capacity);

        let secondary_label = format!("{} - {}", entity.label, entity.secondary_label);
        push_pages(
            &mut slides,
            entity.index,
            &secondary_label,
            &entity.secondary,
            capacity,
        );
    }

    slides
}

fn push_pages(
    slides: &mut Vec<Slide>,
    entity_index: usize,
    label: &str,
    rows: &[RowRef],
    capacity: usize,
) {
    let total_pages = rows.len().div_ceil(capacity);
    for (page, chunk) in rows.chunks(capacity).enumerate() {
        let page_label = if total_pages > 1 {
            format!("{} ({}/{})", label, page + 1, total_pages)
        } else {
            label.to_string()
        };
        slides.push(Slide {
            label: page_label,
            entries: vec![SlideEntry {
                entity_index,
                rows: chunk.to_vec(),
            }],
        });
    }
}

// ==========================================
// SlidePlanner - 带记忆的分页器
// ==========================================
// 同一快照引用重复调用直接返回缓存结果
pub struct SlidePlanner<S: BoardSnapshot> {
    thresholds: PlannerThresholds,
    options: PlanOptions,
    cached: Option<(Arc<S>, Arc<[Slide]>)>,
}

impl<S: BoardSnapshot> SlidePlanner<S> {
    pub fn new(thresholds: PlannerThresholds, options: PlanOptions) -> Self {
        Self {
            thresholds,
            options,
            cached: None,
        }
    }

    pub fn thresholds(&self) -> &PlannerThresholds {
        &self.thresholds
    }

    /// 计算（或复用）快照的分页结果
    #[instrument(skip(self, snapshot))]
    pub fn plan(&mut self, snapshot: &Arc<S>) -> Arc<[Slide]> {
        if let Some((planned_for, slides)) = &self.cached {
            if Arc::ptr_eq(planned_for, snapshot) {
                return Arc::clone(slides);
            }
        }

        let entities = snapshot.plan_entities(&self.options);
        let slides: Arc<[Slide]> = plan_slides(&entities, &self.thresholds).into();

        tracing::debug!(
            kind = %S::KIND,
            entities = entities.len(),
            slides = slides.len(),
            "轮播分页已重算"
        );

        self.cached = Some((Arc::clone(snapshot), Arc::clone(&slides)));
        slides
    }

    /// 当前缓存的分页（未计算过则为空）
    pub fn current(&self) -> Arc<[Slide]> {
        match &self.cached {
            Some((_, slides)) => Arc::clone(slides),
            None => Arc::from(Vec::new()),
        }
    }
}
