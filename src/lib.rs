//! 信标读数评分与展品排名
//!
//! 模块结构：
//! - `algorithms/` - 距离估算、分段评分、聚合统计与前 N 名查询
//! - `loader` - 读数文件解析与异步加载
//! - `config` - TOML 配置（展品映射表）
//! - `error` - 错误类型

pub mod algorithms;
pub mod config;
pub mod error;
pub mod loader;

pub use error::{RankError, Result};
pub use loader::BeaconRanker;
