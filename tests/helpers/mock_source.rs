// ==========================================
// Mock 数据源 - 用于集成测试
// ==========================================
// 按顺序返回预置的拉取结果；用尽后返回 Fetch 错误
// ==========================================

use async_trait::async_trait;
use factory_tv_board::api::{BoardError, BoardResult, SnapshotSource};
use factory_tv_board::domain::BoardIdentity;
use factory_tv_board::engine::BoardSnapshot;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct MockSource<S> {
    responses: Mutex<VecDeque<BoardResult<S>>>,
    calls: AtomicUsize,
}

impl<S> MockSource<S> {
    pub fn new(responses: Vec<BoardResult<S>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: BoardSnapshot> SnapshotSource<S> for MockSource<S> {
    async fn fetch(&self, identity: BoardIdentity) -> BoardResult<S> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .map_err(|_| BoardError::Fetch("mock 锁中毒".to_string()))?
            .pop_front();
        next.unwrap_or_else(|| Err(BoardError::Fetch(format!("{} 无预置响应", identity))))
    }
}
