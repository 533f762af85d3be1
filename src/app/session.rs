// ==========================================
// 车间电视看板 - 看板会话
// ==========================================
// 职责: 组合快照存储、变更检测、分页、轮播时钟、布局，产出 BoardView
// 事件入口（全部在单个任务内顺序处理）:
//   - 拉取结果 / 推送更新 → 整体替换 → 重新分页 → 下标归 0 → 变更检测 → 闪烁
//   - 每秒 tick → 轮播推进（切页后重新检测当前实体）→ 闪烁到期清空
//   - 手动翻页 → 立即切页并暂停冷却 → 重新检测当前实体
// 时间: 调用方传入单调毫秒数，便于测试时使用假时钟
// ==========================================

use crate::api::error::{BoardError, BoardResult};
use crate::app::view::{
    slide_indicator, BoardView, ComposeContext, ComposeView, CountdownView, ReadyView,
};
use crate::config::{DisplayConfig, HourlyGating};
use crate::domain::types::{BoardIdentity, BoardKind, Connectivity};
use crate::engine::board::PlanOptions;
use crate::engine::delta::{DeltaDetector, FlashState};
use crate::engine::hourly::visible_slots;
use crate::engine::layout::{LayoutRules, LayoutSelector};
use crate::engine::rotation::{Navigation, RotationClock};
use crate::engine::slide_planner::{Slide, SlidePlanner};
use crate::realtime::messages::ChannelEvent;
use crate::store::snapshot_store::{LoadState, SnapshotStore};
use chrono::NaiveTime;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ==========================================
// BoardSession
// ==========================================
pub struct BoardSession<S: ComposeView> {
    identity: BoardIdentity,
    store: SnapshotStore<S>,
    detector: DeltaDetector<S>,
    flash: FlashState,
    planner: SlidePlanner<S>,
    clock: RotationClock,
    layout: LayoutSelector,
    slides: Arc<[Slide]>,
    hourly_gating: HourlyGating,
    shift_start_hour: u32,
}

impl<S: ComposeView> BoardSession<S> {
    /// 创建会话
    ///
    /// # 参数
    /// - identity: 看板身份（种类必须与快照类型一致）
    /// - config: 显示配置
    pub fn new(identity: BoardIdentity, config: &DisplayConfig) -> BoardResult<Self> {
        if identity.kind() != S::KIND {
            return Err(BoardError::Config(format!(
                "看板身份 {} 与快照类型 {} 不匹配",
                identity,
                S::KIND
            )));
        }

        let (thresholds, options, rules) = match S::KIND {
            BoardKind::ProductDetail => (
                config.product.planner.clone(),
                PlanOptions {
                    hidden_row_rule: config.product.hidden_row_rule,
                },
                LayoutRules::product_board(),
            ),
            BoardKind::GroupOutput => (
                config.group.planner.clone(),
                PlanOptions::default(),
                LayoutRules::group_board(),
            ),
        };

        Ok(Self {
            identity,
            store: SnapshotStore::new(),
            detector: DeltaDetector::new(),
            flash: FlashState::new(config.flash_duration_ms),
            planner: SlidePlanner::new(thresholds, options),
            clock: RotationClock::new(config.rotation_for(S::KIND), config.tv_mode),
            layout: LayoutSelector::new(rules),
            slides: Arc::from(Vec::new()),
            hourly_gating: config.group.hourly_gating,
            shift_start_hour: config.group.shift_start_hour,
        })
    }

    pub fn identity(&self) -> BoardIdentity {
        self.identity
    }

    pub fn store(&self) -> &SnapshotStore<S> {
        &self.store
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn clock(&self) -> &RotationClock {
        &self.clock
    }

    pub fn active_index(&self) -> usize {
        self.clock.active_index()
    }

    pub fn flash(&self) -> &FlashState {
        &self.flash
    }

    /// 闪烁截止时间（毫秒）
    pub fn flash_deadline(&self) -> Option<u64> {
        self.flash.deadline()
    }

    // ==========================================
    // 数据事件
    // ==========================================

    /// 手动刷新: 返回需要拉取的身份
    pub fn begin_refresh(&mut self) -> BoardIdentity {
        self.store.begin_loading();
        info!(identity = %self.identity, "开始拉取快照");
        self.identity
    }

    /// 处理拉取结果
    pub fn on_fetch_result(&mut self, result: BoardResult<S>, now_ms: u64) {
        match result {
            Ok(snapshot) => self.apply_snapshot(snapshot, now_ms),
            Err(err) => {
                warn!(identity = %self.identity, code = err.code(), error = %err, "快照拉取失败");
                self.store.fail(err.to_string());
            }
        }
    }

    /// 整体替换快照
    pub fn apply_snapshot(&mut self, snapshot: S, now_ms: u64) {
        self.store.replace(snapshot);
        self.after_replace(now_ms);
    }

    /// 处理推送通道事件
    pub fn on_channel_event(&mut self, event: ChannelEvent, now_ms: u64) {
        match event {
            ChannelEvent::Connected => self.store.set_connectivity(Connectivity::Connected),
            ChannelEvent::SubscriptionConfirmed => {
                info!(identity = %self.identity, "订阅已确认");
                self.store.set_connectivity(Connectivity::Connected);
            }
            ChannelEvent::Disconnected => {
                self.store.set_connectivity(Connectivity::Disconnected);
            }
            ChannelEvent::Update(payload) => {
                // 畸形载荷已在存储层记录告警，原状态保留
                if self.store.apply_push(payload).is_ok() {
                    self.after_replace(now_ms);
                }
            }
        }
    }

    // 替换后: 重新分页 → 下标归 0 → 变更检测
    fn after_replace(&mut self, now_ms: u64) {
        let Some(current) = self.store.current().cloned() else {
            return;
        };

        self.slides = self.planner.plan(&current);
        self.clock.reset(self.slides.len());

        debug!(
            identity = %self.identity,
            slides = self.slides.len(),
            last_update = current.last_update(),
            "快照已替换"
        );
        self.refresh_delta(now_ms);
    }

    // 以当前页的首个实体为比对对象
    fn refresh_delta(&mut self, now_ms: u64) {
        let Some(current) = self.store.current() else {
            return;
        };
        let active_entity = self
            .slides
            .get(self.clock.active_index())
            .and_then(Slide::primary_entity);

        if let Some(changes) = self.detector.observe(current, active_entity) {
            self.flash.trigger(changes, now_ms);
        }
    }

    // ==========================================
    // 时间事件
    // ==========================================

    /// 每秒调用
    pub fn tick(&mut self, now_ms: u64) {
        if self.clock.tick().is_some() {
            self.refresh_delta(now_ms);
        }
        self.flash.poll(now_ms);
    }

    /// 闪烁到期检查；返回是否清空
    pub fn poll_flash(&mut self, now_ms: u64) -> bool {
        self.flash.poll(now_ms)
    }

    /// 手动翻页
    pub fn navigate(&mut self, nav: Navigation, now_ms: u64) -> usize {
        let index = self.clock.navigate(nav);
        info!(identity = %self.identity, active_index = index, "手动翻页");
        self.refresh_delta(now_ms);
        index
    }

    /// 会话结束: 拆除计时与闪烁
    pub fn teardown(&mut self) {
        self.clock.stop();
        self.flash.clear();
        info!(identity = %self.identity, "看板会话已结束");
    }

    // ==========================================
    // 视图
    // ==========================================

    /// 生成当前视图
    ///
    /// # 参数
    /// - time_of_day: 本地时刻（小时列显示规则使用）
    pub fn view(&self, time_of_day: NaiveTime) -> BoardView {
        if let LoadState::Failed(message) = self.store.load_state() {
            return BoardView::Error {
                message: message.clone(),
            };
        }

        let Some(snapshot) = self.store.current() else {
            return BoardView::Loading {
                title: self.identity.to_string(),
            };
        };

        if self.slides.is_empty() {
            return BoardView::NoData {
                title: self.identity.to_string(),
            };
        }

        let active = self.clock.active_index().min(self.slides.len() - 1);
        let slide = &self.slides[active];
        let layout = self.layout.select(slide.row_count());
        let slots = visible_slots(self.hourly_gating, self.shift_start_hour, time_of_day);

        let content = snapshot.compose(
            slide,
            &ComposeContext {
                flash: &self.flash,
                layout: &layout,
                visible_slots: &slots,
            },
        );

        let countdown = self.clock.countdown_notice().and_then(|notice| {
            self.slides.get(notice.next_index).map(|next| CountdownView {
                seconds: notice.seconds,
                next_label: next.label.clone(),
            })
        });

        BoardView::Ready(Box::new(ReadyView {
            title: snapshot.title(),
            connected: self.store.connectivity().is_connected(),
            last_update: snapshot.last_update().to_string(),
            header: content.header,
            slide_label: slide.label.clone(),
            layout,
            tables: content.tables,
            indicator: slide_indicator(&self.slides, active),
            countdown,
            paused: self.clock.is_paused(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::group::GroupSnapshot;
    use crate::domain::product::ProductSnapshot;
    use crate::domain::types::{LineNumber, ProductCode};
    use serde_json::json;

    fn line1() -> BoardIdentity {
        BoardIdentity::Line(LineNumber::new(1).unwrap())
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    fn team_json(name: &str, groups: usize, percent: f64) -> serde_json::Value {
        let fixed: Vec<serde_json::Value> = (0..groups)
            .map(|i| {
                json!({
                    "nhom": format!("G{}", i), "ldLayout": 5, "thucTe": 6, "keHoach": 20,
                    "luyKeThucHien": 40, "luyKeKeHoach": 50, "percentHT": percent
                })
            })
            .collect();
        json!({ "tenTo": name, "tglv": 8, "fixedGroups": fixed, "tuiNhoGroups": [] })
    }

    fn group_snapshot(teams: Vec<serde_json::Value>, ts: &str) -> GroupSnapshot {
        serde_json::from_value(json!({ "line": 1, "lastUpdate": ts, "teams": teams })).unwrap()
    }

    #[test]
    fn test_identity_kind_must_match() {
        let result = BoardSession::<ProductSnapshot>::new(line1(), &DisplayConfig::default());
        assert!(matches!(result, Err(BoardError::Config(_))));
    }

    #[test]
    fn test_loading_then_ready() {
        let mut session =
            BoardSession::<GroupSnapshot>::new(line1(), &DisplayConfig::default()).unwrap();
        session.begin_refresh();
        assert!(matches!(session.view(noon()), BoardView::Loading { .. }));

        session.on_fetch_result(Ok(group_snapshot(vec![team_json("TỔ 1", 3, 80.0)], "t1")), 0);
        let BoardView::Ready(view) = session.view(noon()) else {
            panic!("应进入 Ready");
        };
        assert_eq!(view.title, "LINE 1");
        assert_eq!(view.tables.len(), 1);
        assert_eq!(view.tables[0].rows.len(), 3);
        assert!(!view.connected);
    }

    #[test]
    fn test_empty_snapshot_is_no_data() {
        let mut session =
            BoardSession::<GroupSnapshot>::new(line1(), &DisplayConfig::default()).unwrap();
        session.apply_snapshot(group_snapshot(Vec::new(), "t1"), 0);
        assert!(matches!(session.view(noon()), BoardView::NoData { .. }));
    }

    #[test]
    fn test_fetch_error_is_terminal() {
        let mut session = BoardSession::<ProductSnapshot>::new(
            BoardIdentity::Product(ProductCode::Cd1),
            &DisplayConfig::default(),
        )
        .unwrap();
        session.on_fetch_result(Err(BoardError::Fetch("Sheet not found".to_string())), 0);
        assert_eq!(
            session.view(noon()),
            BoardView::Error {
                message: "Sheet not found".to_string()
            }
        );
    }

    #[test]
    fn test_push_update_flashes_changed_cell() {
        let mut session =
            BoardSession::<GroupSnapshot>::new(line1(), &DisplayConfig::default()).unwrap();
        session.apply_snapshot(group_snapshot(vec![team_json("TỔ 1", 2, 80.0)], "t1"), 0);
        assert!(session.flash().keys().is_empty());

        session.on_channel_event(
            ChannelEvent::Update(json!({
                "type": "updated",
                "timestamp": "2026-10-17T10:00:00Z",
                "data": { "line": 1, "lastUpdate": "t2", "teams": [team_json("TỔ 1", 2, 85.0)] }
            })),
            1_000,
        );

        assert!(session.flash().is_flashing("TỔ 1-G0-percentHT"));
        assert!(session.flash().is_flashing("TỔ 1-G1-percentHT"));
        assert_eq!(session.flash_deadline(), Some(3_000));

        let BoardView::Ready(view) = session.view(noon()) else {
            panic!("应进入 Ready");
        };
        let flashing = view.tables[0].rows[0].cells.iter().filter(|c| c.flash).count();
        assert_eq!(flashing, 1);

        session.tick(3_000);
        assert!(session.flash().keys().is_empty());
    }

    #[test]
    fn test_malformed_push_is_ignored() {
        let mut session =
            BoardSession::<GroupSnapshot>::new(line1(), &DisplayConfig::default()).unwrap();
        session.apply_snapshot(group_snapshot(vec![team_json("TỔ 1", 2, 80.0)], "t1"), 0);

        session.on_channel_event(ChannelEvent::Update(json!({ "type": "updated" })), 1_000);
        assert_eq!(session.store().current().unwrap().last_update, "t1");
    }

    #[test]
    fn test_connectivity_follows_channel() {
        let mut session =
            BoardSession::<GroupSnapshot>::new(line1(), &DisplayConfig::default()).unwrap();
        session.on_channel_event(ChannelEvent::SubscriptionConfirmed, 0);
        assert!(session.store().connectivity().is_connected());
        session.on_channel_event(ChannelEvent::Disconnected, 0);
        assert!(!session.store().connectivity().is_connected());
    }

    #[test]
    fn test_replacement_resets_active_slide() {
        let mut session =
            BoardSession::<GroupSnapshot>::new(line1(), &DisplayConfig::default()).unwrap();
        let teams = vec![
            team_json("TỔ 1", 3, 80.0),
            team_json("TỔ 2", 3, 80.0),
            team_json("TỔ 3", 3, 80.0),
        ];
        session.apply_snapshot(group_snapshot(teams.clone(), "t1"), 0);
        assert_eq!(session.slides().len(), 3);

        session.navigate(Navigation::To(2), 0);
        assert_eq!(session.active_index(), 2);

        session.apply_snapshot(group_snapshot(teams, "t2"), 1_000);
        assert_eq!(session.active_index(), 0);
        assert!(!session.clock().is_paused());
    }
}
