// ==========================================
// 车间电视看板 - 快照存储
// ==========================================
// 职责: 持有某个看板身份的最新快照
// - 整体替换（不做局部合并）
// - 推送载荷先校验，畸形载荷丢弃并保留原状态
// - 暴露加载状态与连接状态
// ==========================================

use crate::api::error::{BoardError, BoardResult};
use crate::domain::types::Connectivity;
use crate::engine::board::BoardSnapshot;
use crate::realtime::messages::PushUpdate;
use std::sync::Arc;
use tracing::{debug, warn};

/// 加载状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// 首次拉取进行中
    Loading,
    Ready,
    /// 拉取失败（原始错误信息）
    Failed(String),
}

// ==========================================
// SnapshotStore
// ==========================================
pub struct SnapshotStore<S: BoardSnapshot> {
    current: Option<Arc<S>>,
    load: LoadState,
    connectivity: Connectivity,
    last_server_ts: Option<String>,
}

impl<S: BoardSnapshot> Default for SnapshotStore<S> {
    fn default() -> Self {
        Self {
            current: None,
            load: LoadState::Loading,
            connectivity: Connectivity::Disconnected,
            last_server_ts: None,
        }
    }
}

impl<S: BoardSnapshot> SnapshotStore<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Arc<S>> {
        self.current.as_ref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn set_connectivity(&mut self, connectivity: Connectivity) {
        self.connectivity = connectivity;
    }

    /// 最近一次推送的服务端时间戳
    pub fn last_server_timestamp(&self) -> Option<&str> {
        self.last_server_ts.as_deref()
    }

    /// 开始拉取: 尚无快照时进入 Loading，已有快照时保持原状
    pub fn begin_loading(&mut self) {
        if self.current.is_none() {
            self.load = LoadState::Loading;
        }
    }

    /// 拉取失败
    pub fn fail(&mut self, message: impl Into<String>) {
        self.load = LoadState::Failed(message.into());
    }

    /// 整体替换快照，返回被替换的旧快照
    pub fn replace(&mut self, snapshot: S) -> Option<Arc<S>> {
        self.load = LoadState::Ready;
        std::mem::replace(&mut self.current, Some(Arc::new(snapshot)))
    }

    /// 应用推送更新
    ///
    /// # 返回
    /// - Ok(Arc<S>): 新快照已生效
    /// - Err(MalformedPayload): 载荷无效，原状态保留
    pub fn apply_push(&mut self, payload: serde_json::Value) -> BoardResult<Arc<S>> {
        let update = match PushUpdate::<S>::parse(payload) {
            Ok(update) => update,
            Err(err) => {
                warn!(kind = %S::KIND, error = %err, "推送载荷无效，已忽略");
                return Err(err);
            }
        };

        debug!(
            kind = %S::KIND,
            update_type = %update.update_type,
            timestamp = %update.timestamp,
            "应用推送更新"
        );

        self.last_server_ts = Some(update.timestamp);
        self.replace(update.snapshot);
        self.current
            .clone()
            .ok_or_else(|| BoardError::MalformedPayload("快照替换失败".to_string()))
    }
}
