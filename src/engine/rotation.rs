// ==========================================
// 车间电视看板 - 轮播时钟
// ==========================================
// 职责: 按固定周期推进当前页下标（1 秒分辨率）
// 状态机:
//   Idle ──(页数>1 且电视模式)──> Running
//   Running ──(倒计时归零)──> Running（下标 +1 取模，倒计时重置）
//   Running/Idle ──(手动翻页)──> Cooldown ──(暂停秒数耗尽)──> Running（完整周期）
//   任意 ──(页数≤1 / 停止)──> Idle
// 说明: 暂停期间不累计轮播计时，恢复时从完整周期重新开始
// ==========================================

use crate::config::RotationSettings;

/// 时钟状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// 未启用（单页 / 非电视模式 / 已停止）
    Idle,
    /// 正常轮播，remaining 为距下次切换的秒数
    Running { remaining: u32 },
    /// 手动翻页后的暂停冷却
    Cooldown { remaining: u32 },
}

/// 手动翻页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Prev,
    To(usize),
}

/// 切换提示（最后 N 秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownNotice {
    pub seconds: u32,
    pub next_index: usize,
}

// ==========================================
// RotationClock
// ==========================================
#[derive(Debug, Clone)]
pub struct RotationClock {
    period: u32,
    countdown_window: u32,
    pause_secs: u32,
    tv_mode: bool,
    slide_count: usize,
    active_index: usize,
    state: ClockState,
}

impl RotationClock {
    pub fn new(settings: &RotationSettings, tv_mode: bool) -> Self {
        Self {
            period: settings.slide_interval_secs.max(1),
            countdown_window: settings.countdown_window_secs,
            pause_secs: settings.manual_pause_secs,
            tv_mode,
            slide_count: 0,
            active_index: 0,
            state: ClockState::Idle,
        }
    }

    /// 轮播是否启用: 页数 > 1 且电视模式
    pub fn is_enabled(&self) -> bool {
        self.tv_mode && self.slide_count > 1
    }

    /// 更新页数
    ///
    /// 页数 ≤ 1 时拆除计时；下标越界时回到 0
    pub fn set_slide_count(&mut self, count: usize) {
        self.slide_count = count;

        if count <= 1 {
            self.active_index = 0;
            self.state = ClockState::Idle;
            return;
        }

        if self.active_index >= count {
            self.active_index = 0;
        }
        if self.tv_mode && self.state == ClockState::Idle {
            self.state = ClockState::Running {
                remaining: self.period,
            };
        }
    }

    /// 每秒调用一次；发生自动切换时返回新下标
    pub fn tick(&mut self) -> Option<usize> {
        match self.state {
            ClockState::Idle => None,
            ClockState::Running { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining > 0 {
                    self.state = ClockState::Running { remaining };
                    return None;
                }
                self.active_index = (self.active_index + 1) % self.slide_count.max(1);
                self.state = ClockState::Running {
                    remaining: self.period,
                };
                tracing::debug!(active_index = self.active_index, "轮播自动切换");
                Some(self.active_index)
            }
            ClockState::Cooldown { remaining } => {
                let remaining = remaining.saturating_sub(1);
                self.state = if remaining > 0 {
                    ClockState::Cooldown { remaining }
                } else if self.is_enabled() {
                    tracing::debug!("手动翻页暂停结束，恢复轮播");
                    ClockState::Running {
                        remaining: self.period,
                    }
                } else {
                    ClockState::Idle
                };
                None
            }
        }
    }

    /// 手动翻页: 立即切换并进入冷却
    pub fn navigate(&mut self, nav: Navigation) -> usize {
        if self.slide_count == 0 {
            return self.active_index;
        }

        let count = self.slide_count;
        self.active_index = match nav {
            Navigation::Next => (self.active_index + 1) % count,
            Navigation::Prev => (self.active_index + count - 1) % count,
            Navigation::To(index) if index < count => index,
            Navigation::To(_) => self.active_index,
        };

        if self.is_enabled() {
            self.state = ClockState::Cooldown {
                remaining: self.pause_secs.max(1),
            };
        }
        self.active_index
    }

    /// 数据整体刷新: 下标回到 0
    ///
    /// 只有下标确实变化或时钟刚启用时才重新开始完整周期；
    /// 已在首页时保留进行中的倒计时，轮播节奏不受刷新频率影响
    pub fn reset(&mut self, slide_count: usize) {
        let previous_index = self.active_index;
        let previous_state = self.state;

        self.slide_count = slide_count;
        self.active_index = 0;

        if !self.is_enabled() {
            self.state = ClockState::Idle;
            return;
        }

        self.state = match previous_state {
            ClockState::Running { remaining } if previous_index == 0 => ClockState::Running {
                remaining: remaining.min(self.period),
            },
            ClockState::Cooldown { remaining } if previous_index == 0 => {
                ClockState::Cooldown { remaining }
            }
            _ => ClockState::Running {
                remaining: self.period,
            },
        };
    }

    /// 拆除计时（看板卸载）
    pub fn stop(&mut self) {
        self.slide_count = 0;
        self.active_index = 0;
        self.state = ClockState::Idle;
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, ClockState::Cooldown { .. })
    }

    /// 距下次自动切换的秒数（未在轮播时为 None）
    pub fn seconds_remaining(&self) -> Option<u32> {
        match self.state {
            ClockState::Running { remaining } => Some(remaining),
            _ => None,
        }
    }

    /// 切换提示: 倒计时进入最后窗口时给出下一页下标
    pub fn countdown_notice(&self) -> Option<CountdownNotice> {
        match self.state {
            ClockState::Running { remaining } if remaining <= self.countdown_window => {
                Some(CountdownNotice {
                    seconds: remaining,
                    next_index: (self.active_index + 1) % self.slide_count.max(1),
                })
            }
            _ => None,
        }
    }
}
