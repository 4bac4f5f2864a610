/// 信标读数、统计量和展品映射表

use serde::Serialize;
use std::collections::HashMap;

/// 内置的信标 → 展品编号映射
pub const DEFAULT_EXHIBITS: [(&str, &str); 6] = [
    ("51496:6493", "co8421531"),
    ("45502:651", "co8359400"),
    ("16690:64093", "co8232360"),
    ("49393:1628", "co8427213"),
    ("25571:44527", "co8401352"),
    ("49245:8103", "co8058672"),
];

/// 单条信标读数（一行输入数据）
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    /// 信标标识（major:minor 组合）
    pub beacon_id: String,
    /// 信标参考功率 (dBm)
    pub power: f64,
    /// 接收信号强度 (dBm)
    pub rssi: f64,
    /// 时间偏移
    pub time_offset: i64,
}

impl Reading {
    pub fn new(beacon_id: impl Into<String>, power: f64, rssi: f64, time_offset: i64) -> Self {
        Reading {
            beacon_id: beacon_id.into(),
            power,
            rssi,
            time_offset,
        }
    }
}

/// 单个信标的累计统计
///
/// finalize 之前 `time_offset` 为累计时间偏移，之后被覆盖为平均时间偏移。
/// 累计值使用 i128，u32 个 i64 偏移之和不会溢出，平均值总在 i64 范围内。
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BeaconStat {
    /// 被接收的读数数量
    #[serde(rename = "samples")]
    pub sample_count: u32,
    /// 累计评分
    pub score: f64,
    /// 累计（或平均）时间偏移
    #[serde(rename = "timestamp")]
    pub time_offset: i128,
}

impl BeaconStat {
    /// 记录一条被接收的读数
    pub fn record(&mut self, score: f64, time_offset: i64) {
        self.sample_count += 1;
        self.score += score;
        self.time_offset += i128::from(time_offset);
    }

    /// 将累计时间偏移替换为向下取整的平均值
    pub(crate) fn settle_mean(&mut self) {
        if self.sample_count > 0 {
            self.time_offset = self.time_offset.div_euclid(i128::from(self.sample_count));
        }
    }
}

/// 展品映射表：原始信标标识 → 展品编号
#[derive(Clone, Debug, PartialEq)]
pub struct ExhibitTable {
    labels: HashMap<String, String>,
}

impl ExhibitTable {
    /// 创建空的映射表
    pub fn new() -> Self {
        ExhibitTable {
            labels: HashMap::new(),
        }
    }

    /// 从 (标识, 编号) 对创建
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = ExhibitTable::new();
        for (id, label) in pairs {
            table.insert(id, label);
        }
        table
    }

    /// 添加或替换映射
    pub fn insert(&mut self, beacon_id: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(beacon_id.into(), label.into());
    }

    /// 查询展品编号
    pub fn label(&self, beacon_id: &str) -> Option<&str> {
        self.labels.get(beacon_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.labels.iter()
    }
}

impl Default for ExhibitTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_EXHIBITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = ExhibitTable::default();
        assert_eq!(table.len(), 6);
        assert_eq!(table.label("51496:6493"), Some("co8421531"));
        assert_eq!(table.label("49245:8103"), Some("co8058672"));
        assert_eq!(table.label("1:2"), None);
    }

    #[test]
    fn test_stat_record() {
        let mut stat = BeaconStat::default();
        stat.record(2.5, 100);
        stat.record(10.0, 201);
        assert_eq!(stat.sample_count, 2);
        assert_eq!(stat.score, 12.5);
        assert_eq!(stat.time_offset, 301);

        stat.settle_mean();
        assert_eq!(stat.time_offset, 150);
    }

    #[test]
    fn test_mean_rounds_down() {
        let mut stat = BeaconStat::default();
        stat.record(1.0, -3);
        stat.record(1.0, 0);
        stat.settle_mean();
        assert_eq!(stat.time_offset, -2);
    }

    #[test]
    fn test_large_offsets_do_not_overflow() {
        let mut stat = BeaconStat::default();
        stat.record(1.0, i64::MAX);
        stat.record(1.0, i64::MAX);
        stat.record(1.0, i64::MAX - 2);
        assert_eq!(stat.time_offset, 3 * i128::from(i64::MAX) - 2);

        stat.settle_mean();
        assert_eq!(stat.time_offset, i128::from(i64::MAX) - 1);
    }
}
