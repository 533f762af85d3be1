// ==========================================
// 变更检测与闪烁集成测试
// ==========================================
// 覆盖: 首次观测不闪烁 / 单字段变更只产出一个键 / 2 秒自动清空
// ==========================================

mod helpers;

use factory_tv_board::app::BoardSession;
use factory_tv_board::config::DisplayConfig;
use factory_tv_board::domain::{BoardIdentity, GroupSnapshot, LineNumber, ProductCode, ProductSnapshot};
use factory_tv_board::engine::{ChangeSet, DeltaDetector};
use factory_tv_board::realtime::ChannelEvent;
use helpers::test_data_builder::*;
use std::sync::Arc;

fn line(n: u8) -> BoardIdentity {
    BoardIdentity::Line(LineNumber::new(n).unwrap())
}

fn two_team_snapshot(rap_percent: f64, ts: &str) -> GroupSnapshot {
    GroupSnapshotBuilder::new(1)
        .last_update(ts)
        .team(
            TeamBuilder::new("TỔ 1")
                .fixed(GroupBuilder::new("ĐÓNG GÓI").build())
                .fixed(GroupBuilder::new("RÁP").percent(rap_percent).build())
                .build(),
        )
        .team(TeamBuilder::new("TỔ 2").fixed_n(3).build())
        .build()
}

#[test]
fn test_first_observation_never_flashes() {
    let mut detector = DeltaDetector::<ProductSnapshot>::new();
    let snapshot = ProductSnapshotBuilder::new("CD1")
        .product(ProductBuilder::new("CEM07", "B4Z5D").details_n(2).build())
        .build();

    let changes = detector.observe(&Arc::new(snapshot), Some(0));
    assert_eq!(changes, Some(ChangeSet::new()));
}

#[test]
fn test_single_detail_field_change_yields_single_key() {
    let mut detector = DeltaDetector::<ProductSnapshot>::new();
    let base = ProductBuilder::new("CEM07", "B4Z5D").details_n(3);
    let before = ProductSnapshotBuilder::new("CD1").product(base.build()).build();
    let after = ProductSnapshotBuilder::new("CD1")
        .product(
            ProductBuilder::new("CEM07", "B4Z5D")
                .details_n(3)
                .detail_luy_ke_giao(1, 95.0)
                .build(),
        )
        .build();

    detector.observe(&Arc::new(before), Some(0));
    let changes = detector.observe(&Arc::new(after), Some(0)).unwrap();

    assert_eq!(changes.iter().collect::<Vec<_>>(), vec!["detail-1-luyKeGiao"]);
}

#[test]
fn test_same_reference_is_not_recompared() {
    let mut detector = DeltaDetector::<GroupSnapshot>::new();
    let snapshot = Arc::new(two_team_snapshot(80.0, "t1"));

    detector.observe(&snapshot, Some(0));
    assert_eq!(detector.observe(&snapshot, Some(0)), None);
}

#[test]
fn test_percent_push_flashes_then_clears_after_two_seconds() {
    let mut session =
        BoardSession::<GroupSnapshot>::new(line(1), &DisplayConfig::default()).unwrap();
    session.apply_snapshot(two_team_snapshot(80.0, "t1"), 0);
    assert!(session.flash().keys().is_empty());

    let pushed = two_team_snapshot(92.5, "t2");
    session.on_channel_event(
        ChannelEvent::Update(push_update(&pushed, "2026-10-17T10:00:00Z")),
        5_000,
    );

    let keys: Vec<&str> = session.flash().keys().iter().collect();
    assert_eq!(keys, vec!["TỔ 1-RÁP-percentHT"]);

    session.tick(6_999);
    assert!(session.flash().is_flashing("TỔ 1-RÁP-percentHT"));

    session.tick(7_000);
    assert!(session.flash().keys().is_empty());
}

#[test]
fn test_new_change_set_replaces_pending_flash() {
    let mut session =
        BoardSession::<GroupSnapshot>::new(line(1), &DisplayConfig::default()).unwrap();
    session.apply_snapshot(two_team_snapshot(80.0, "t1"), 0);

    session.apply_snapshot(two_team_snapshot(85.0, "t2"), 1_000);
    assert_eq!(session.flash_deadline(), Some(3_000));

    session.apply_snapshot(two_team_snapshot(90.0, "t3"), 2_500);
    assert_eq!(session.flash_deadline(), Some(4_500));

    // 旧截止时间不再生效
    session.tick(3_000);
    assert!(session.flash().is_flashing("TỔ 1-RÁP-percentHT"));
    session.tick(4_500);
    assert!(session.flash().keys().is_empty());
}

#[test]
fn test_shrunk_snapshot_only_reports_metadata() {
    let mut detector = DeltaDetector::<ProductSnapshot>::new();
    let before = ProductSnapshotBuilder::new("CD1")
        .product(ProductBuilder::new("A", "1").build())
        .product(ProductBuilder::new("B", "2").build())
        .build();
    let mut after = ProductSnapshotBuilder::new("CD1")
        .product(ProductBuilder::new("A", "1").build())
        .build();
    after.total_products = 7;

    detector.observe(&Arc::new(before), Some(1));
    let changes = detector.observe(&Arc::new(after), Some(1)).unwrap();

    assert_eq!(changes.iter().collect::<Vec<_>>(), vec!["meta-totalProducts"]);
}

#[test]
fn test_product_board_identity_is_accepted() {
    let session = BoardSession::<ProductSnapshot>::new(
        BoardIdentity::Product(ProductCode::Cd3),
        &DisplayConfig::default(),
    );
    assert!(session.is_ok());
}
