// 各测试文件只用到部分构建器
#![allow(dead_code)]

pub mod mock_source;
pub mod test_data_builder;
