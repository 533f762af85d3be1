// ==========================================
// 车间电视看板 - 存储层
// ==========================================
// 仅内存快照，无持久化
// ==========================================

pub mod snapshot_store;

pub use snapshot_store::{LoadState, SnapshotStore};
