// ==========================================
// 轮播时钟集成测试
// ==========================================
// 覆盖: 循环一周回到首页 / 手动翻页暂停 5 秒 / 数据替换下标归 0 / 切换提示
// ==========================================

mod helpers;

use chrono::NaiveTime;
use factory_tv_board::app::{BoardSession, BoardView};
use factory_tv_board::config::{DisplayConfig, RotationSettings};
use factory_tv_board::domain::{BoardIdentity, GroupSnapshot, LineNumber};
use factory_tv_board::engine::Navigation;
use helpers::test_data_builder::*;

const PERIOD: u32 = 4;

fn session_with(team_count: usize, tv_mode: bool) -> BoardSession<GroupSnapshot> {
    let mut config = DisplayConfig::default();
    config.tv_mode = tv_mode;
    config.group.rotation = RotationSettings::with_interval(PERIOD);

    let mut snapshot = GroupSnapshotBuilder::new(3);
    for i in 1..=team_count {
        snapshot = snapshot.team(TeamBuilder::new(&format!("TỔ {}", i)).fixed_n(6).build());
    }

    let mut session =
        BoardSession::new(BoardIdentity::Line(LineNumber::new(3).unwrap()), &config).unwrap();
    session.apply_snapshot(snapshot.build(), 0);
    session
}

/// 按秒推进 n 次
fn tick_secs(session: &mut BoardSession<GroupSnapshot>, from_sec: u64, n: u64) {
    for s in from_sec + 1..=from_sec + n {
        session.tick(s * 1_000);
    }
}

#[test]
fn test_full_cycle_visits_each_slide_in_order() {
    let mut session = session_with(4, true);
    assert_eq!(session.slides().len(), 4);

    let mut visited = vec![session.active_index()];
    for period in 0..4u64 {
        tick_secs(&mut session, period * PERIOD as u64, PERIOD as u64);
        visited.push(session.active_index());
    }

    assert_eq!(visited, vec![0, 1, 2, 3, 0]);
}

#[test]
fn test_manual_navigation_pauses_for_five_seconds() {
    let mut session = session_with(3, true);

    session.navigate(Navigation::Next, 0);
    assert_eq!(session.active_index(), 1);
    assert!(session.clock().is_paused());

    tick_secs(&mut session, 0, 4);
    assert!(session.clock().is_paused());
    assert_eq!(session.active_index(), 1);

    tick_secs(&mut session, 4, 1);
    assert!(!session.clock().is_paused());
    assert_eq!(session.clock().seconds_remaining(), Some(PERIOD));

    tick_secs(&mut session, 5, PERIOD as u64);
    assert_eq!(session.active_index(), 2);
}

#[test]
fn test_replacement_returns_to_first_slide() {
    let mut session = session_with(3, true);
    tick_secs(&mut session, 0, PERIOD as u64 * 2);
    assert_eq!(session.active_index(), 2);

    let mut refreshed = GroupSnapshotBuilder::new(3).last_update("2026-10-17T11:00:00Z");
    for i in 1..=3 {
        refreshed = refreshed.team(TeamBuilder::new(&format!("TỔ {}", i)).fixed_n(6).build());
    }
    session.apply_snapshot(refreshed.build(), 9_000);

    assert_eq!(session.active_index(), 0);
    assert_eq!(session.clock().seconds_remaining(), Some(PERIOD));
}

#[test]
fn test_rotation_disabled_outside_tv_mode() {
    let mut session = session_with(3, false);
    tick_secs(&mut session, 0, PERIOD as u64 * 3);

    assert_eq!(session.active_index(), 0);
    assert_eq!(session.clock().seconds_remaining(), None);

    // 手动翻页仍可用，但不进入暂停
    session.navigate(Navigation::Prev, 13_000);
    assert_eq!(session.active_index(), 2);
    assert!(!session.clock().is_paused());
}

#[test]
fn test_single_slide_never_rotates() {
    let mut session = session_with(1, true);
    tick_secs(&mut session, 0, 20);
    assert_eq!(session.active_index(), 0);
    assert_eq!(session.clock().seconds_remaining(), None);
}

#[test]
fn test_countdown_notice_names_next_slide() {
    let mut session = session_with(3, true);
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

    // 周期 4 秒，窗口 5 秒: 立即进入提示
    let BoardView::Ready(view) = session.view(noon) else {
        panic!("应进入 Ready");
    };
    let countdown = view.countdown.expect("应有切换提示");
    assert_eq!(countdown.seconds, PERIOD);
    assert_eq!(countdown.next_label, "TỔ 2");
    assert_eq!(view.indicator.total, 3);

    tick_secs(&mut session, 0, PERIOD as u64 - 1);
    let BoardView::Ready(view) = session.view(noon) else {
        panic!("应进入 Ready");
    };
    assert_eq!(view.countdown.map(|c| c.seconds), Some(1));
}

#[test]
fn test_rotation_keeps_pace_with_frequent_pushes() {
    let mut config = DisplayConfig::default();
    config.group.rotation = RotationSettings::with_interval(30);

    let snapshot = || {
        GroupSnapshotBuilder::new(1)
            .team(TeamBuilder::new("TỔ 1").fixed_n(12).build())
            .team(TeamBuilder::new("TỔ 2").fixed_n(12).build())
            .build()
    };

    let mut session =
        BoardSession::new(BoardIdentity::Line(LineNumber::new(1).unwrap()), &config).unwrap();
    session.apply_snapshot(snapshot(), 0);
    assert_eq!(session.slides().len(), 4);

    // 每 10 秒一次整体替换，轮播仍按 30 秒周期切页
    let mut reached_second_slide = false;
    for s in 1..=60u64 {
        session.tick(s * 1_000);
        if s == 30 {
            reached_second_slide = session.active_index() == 1;
        }
        if s % 10 == 0 {
            session.apply_snapshot(snapshot(), s * 1_000);
        }
    }

    assert!(reached_second_slide);
}
