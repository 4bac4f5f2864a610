/// 信标评分与排名算法模块
///
/// 该模块提供：
/// - RSSI 转距离的经验模型
/// - 按距离分段的评分
/// - 按信标聚合统计并按平均时间排序
/// - 得分前 N 名的查询

pub mod aggregator;
pub mod beacon;
pub mod results;
pub mod rssi_model;
pub mod scoring;

pub use aggregator::*;
pub use beacon::*;
pub use results::*;
pub use rssi_model::*;
pub use scoring::*;
