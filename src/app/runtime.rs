// ==========================================
// 车间电视看板 - 看板运行时
// ==========================================
// 职责: 在单个 tokio 任务内驱动 BoardSession
// 事件源（tokio::select!）:
//   1. 1 秒轮播 tick
//   2. 拉取结果（首次拉取 / 手动刷新）
//   3. 推送通道事件
//   4. 闪烁截止时刻
//   5. 外部命令（翻页 / 刷新 / 关闭）
// 每处理一个事件后发布最新 BoardView（watch 通道）
// 关闭或句柄丢弃时: 计时器、拉取任务、推送连接全部随任务终止
// ==========================================

use crate::api::backend_client::SnapshotSource;
use crate::api::error::BoardResult;
use crate::app::session::BoardSession;
use crate::app::view::{BoardView, ComposeView};
use crate::config::DisplayConfig;
use crate::domain::types::BoardIdentity;
use crate::engine::rotation::Navigation;
use crate::realtime::connection::ConnectionManager;
use crate::realtime::messages::ChannelEvent;
use chrono::{Local, NaiveTime};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

/// 推送通道来源
pub enum PushChannel {
    /// 不接收推送（仅拉取）
    Disabled,
    /// 由运行时建立 WebSocket 连接
    WebSocket { url: String },
    /// 外部提供的事件流
    Events(mpsc::UnboundedReceiver<ChannelEvent>),
}

/// 外部命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCommand {
    Navigate(Navigation),
    Refresh,
    Shutdown,
}

impl BoardCommand {
    /// 解析操作员输入的一行
    ///
    /// `n` 下一页 / `p` 上一页 / 数字 跳到第 N 页（从 1 开始）/ `r` 刷新 / `q` 退出
    pub fn from_operator_input(line: &str) -> Option<Self> {
        let input = line.trim();
        match input.to_ascii_lowercase().as_str() {
            "n" => Some(BoardCommand::Navigate(Navigation::Next)),
            "p" => Some(BoardCommand::Navigate(Navigation::Prev)),
            "r" => Some(BoardCommand::Refresh),
            "q" => Some(BoardCommand::Shutdown),
            _ => match input.parse::<usize>() {
                Ok(page) if page >= 1 => Some(BoardCommand::Navigate(Navigation::To(page - 1))),
                _ => None,
            },
        }
    }
}

/// 本地时刻来源（小时列显示规则）
pub type TimeOfDay = fn() -> NaiveTime;

fn local_time_of_day() -> NaiveTime {
    Local::now().time()
}

// ==========================================
// BoardHandle - 运行中看板的句柄
// ==========================================
pub struct BoardHandle {
    identity: BoardIdentity,
    commands: mpsc::UnboundedSender<BoardCommand>,
    views: watch::Receiver<BoardView>,
    task: Option<JoinHandle<()>>,
}

impl BoardHandle {
    pub fn identity(&self) -> BoardIdentity {
        self.identity
    }

    /// 订阅视图更新
    pub fn views(&self) -> watch::Receiver<BoardView> {
        self.views.clone()
    }

    /// 当前视图
    pub fn current_view(&self) -> BoardView {
        self.views.borrow().clone()
    }

    pub fn navigate(&self, nav: Navigation) {
        let _ = self.commands.send(BoardCommand::Navigate(nav));
    }

    pub fn refresh(&self) {
        let _ = self.commands.send(BoardCommand::Refresh);
    }

    /// 转发操作员命令（关闭请使用 shutdown）
    pub fn send(&self, command: BoardCommand) {
        match command {
            BoardCommand::Navigate(nav) => self.navigate(nav),
            BoardCommand::Refresh => self.refresh(),
            BoardCommand::Shutdown => {
                let _ = self.commands.send(BoardCommand::Shutdown);
            }
        }
    }

    /// 关闭并等待任务退出
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(BoardCommand::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(identity = %self.identity, error = %e, "看板任务异常退出");
            }
        }
    }
}

impl Drop for BoardHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ==========================================
// 启动
// ==========================================

/// 启动看板任务
///
/// # 参数
/// - identity: 已校验的看板身份
/// - config: 显示配置
/// - source: 拉取数据源
/// - push: 推送通道来源
pub fn spawn_board<S, Src>(
    identity: BoardIdentity,
    config: &DisplayConfig,
    source: Arc<Src>,
    push: PushChannel,
) -> BoardResult<BoardHandle>
where
    S: ComposeView,
    Src: SnapshotSource<S> + 'static,
{
    spawn_board_with_clock(identity, config, source, push, local_time_of_day)
}

/// 启动看板任务（指定本地时刻来源）
pub fn spawn_board_with_clock<S, Src>(
    identity: BoardIdentity,
    config: &DisplayConfig,
    source: Arc<Src>,
    push: PushChannel,
    time_of_day: TimeOfDay,
) -> BoardResult<BoardHandle>
where
    S: ComposeView,
    Src: SnapshotSource<S> + 'static,
{
    let session = BoardSession::<S>::new(identity, config)?;

    let (connection, events) = match push {
        PushChannel::Disabled => (None, None),
        PushChannel::Events(rx) => (None, Some(rx)),
        PushChannel::WebSocket { url } => {
            let (tx, rx) = mpsc::unbounded_channel();
            let manager = ConnectionManager::spawn(
                &url,
                identity,
                Duration::from_millis(config.reconnect_delay_ms),
                tx,
            )?;
            (Some(manager), Some(rx))
        }
    };

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(session.view(time_of_day()));

    let driver = BoardDriver {
        session,
        source,
        events,
        commands: command_rx,
        views: view_tx,
        fetches: JoinSet::new(),
        _connection: connection,
        origin: Instant::now(),
        time_of_day,
    };
    let task = tokio::spawn(driver.run());

    info!(identity = %identity, "看板任务已启动");
    Ok(BoardHandle {
        identity,
        commands: command_tx,
        views: view_rx,
        task: Some(task),
    })
}

// ==========================================
// BoardDriver - 任务内部状态
// ==========================================
struct BoardDriver<S: ComposeView, Src> {
    session: BoardSession<S>,
    source: Arc<Src>,
    events: Option<mpsc::UnboundedReceiver<ChannelEvent>>,
    commands: mpsc::UnboundedReceiver<BoardCommand>,
    views: watch::Sender<BoardView>,
    fetches: JoinSet<BoardResult<S>>,
    // 随任务一起释放
    _connection: Option<ConnectionManager>,
    origin: Instant,
    time_of_day: TimeOfDay,
}

async fn next_event(
    events: &mut Option<mpsc::UnboundedReceiver<ChannelEvent>>,
) -> Option<ChannelEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

impl<S, Src> BoardDriver<S, Src>
where
    S: ComposeView,
    Src: SnapshotSource<S> + 'static,
{
    fn now_ms(&self) -> u64 {
        Instant::now().duration_since(self.origin).as_millis() as u64
    }

    fn start_fetch(&mut self) {
        let identity = self.session.begin_refresh();
        let source = Arc::clone(&self.source);
        self.fetches.spawn(async move { source.fetch(identity).await });
    }

    fn publish(&self) {
        self.views.send_replace(self.session.view((self.time_of_day)()));
    }

    async fn run(mut self) {
        self.start_fetch();
        self.publish();

        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval 首次 tick 立即完成
        ticker.tick().await;

        loop {
            let flash_deadline = self
                .session
                .flash_deadline()
                .map(|ms| self.origin + Duration::from_millis(ms));
            let flash_due = flash_deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                _ = ticker.tick() => {
                    let now = self.now_ms();
                    self.session.tick(now);
                }
                Some(joined) = self.fetches.join_next(), if !self.fetches.is_empty() => {
                    let now = self.now_ms();
                    match joined {
                        Ok(result) => self.session.on_fetch_result(result, now),
                        Err(e) => warn!(error = %e, "拉取任务异常结束"),
                    }
                }
                event = next_event(&mut self.events) => {
                    match event {
                        Some(event) => {
                            let now = self.now_ms();
                            self.session.on_channel_event(event, now);
                        }
                        None => {
                            warn!(identity = %self.session.identity(), "推送通道已关闭");
                            self.events = None;
                        }
                    }
                }
                _ = tokio::time::sleep_until(flash_due), if flash_deadline.is_some() => {
                    let now = self.now_ms();
                    self.session.poll_flash(now);
                }
                command = self.commands.recv() => {
                    match command {
                        Some(BoardCommand::Navigate(nav)) => {
                            let now = self.now_ms();
                            self.session.navigate(nav, now);
                        }
                        Some(BoardCommand::Refresh) => self.start_fetch(),
                        Some(BoardCommand::Shutdown) | None => break,
                    }
                }
            }

            self.publish();
        }

        self.fetches.abort_all();
        self.session.teardown();
    }
}
