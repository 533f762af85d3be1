// ==========================================
// 车间电视看板 - 小时列显示规则
// ==========================================
// AfterShiftStart: 到达开班时刻后 11 个时段全部显示
// ElapsedOnly:     仅显示时刻已过的时段
// 未显示的时段渲染为空白（数据不变）
// ==========================================

use crate::config::HourlyGating;
use crate::domain::group::HourSlot;
use chrono::{NaiveTime, Timelike};

/// 某个时段当前是否显示
pub fn is_slot_visible(
    slot: HourSlot,
    gating: HourlyGating,
    shift_start_hour: u32,
    now: NaiveTime,
) -> bool {
    match gating {
        HourlyGating::AfterShiftStart => now.hour() >= shift_start_hour,
        HourlyGating::ElapsedOnly => now >= slot.time_of_day(),
    }
}

/// 当前可显示的时段（显示顺序）
pub fn visible_slots(gating: HourlyGating, shift_start_hour: u32, now: NaiveTime) -> Vec<HourSlot> {
    HourSlot::ALL
        .into_iter()
        .filter(|slot| is_slot_visible(*slot, gating, shift_start_hour, now))
        .collect()
}
