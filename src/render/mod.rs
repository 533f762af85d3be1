// ==========================================
// 车间电视看板 - 展示层
// ==========================================

pub mod text;

pub use text::render;
