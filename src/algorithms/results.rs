/// 排名结果数据结构
///
/// finalize 产出按平均时间升序排列的序列；top_n 在副本上重排，不改动原序列。

use crate::error::{RankError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::BeaconStat;

/// 单个展品的最终统计
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 展品编号
    pub exhibit: String,
    #[serde(flatten)]
    pub stat: BeaconStat,
}

impl RankedEntry {
    pub fn new(exhibit: impl Into<String>, stat: BeaconStat) -> Self {
        RankedEntry {
            exhibit: exhibit.into(),
            stat,
        }
    }

    pub fn score(&self) -> f64 {
        self.stat.score
    }

    /// 平均时间偏移
    pub fn timestamp(&self) -> i128 {
        self.stat.time_offset
    }
}

impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [得分: {:.2}, 样本: {}, 时间: {}]",
            self.exhibit, self.stat.score, self.stat.sample_count, self.stat.time_offset
        )
    }
}

/// 按平均时间升序排列的展品序列
#[derive(Clone, Debug)]
pub struct RankedSequence {
    entries: Vec<RankedEntry>,
    generated_at: DateTime<Utc>,
}

impl RankedSequence {
    /// 从条目创建，条目会按平均时间稳定排序
    pub fn new(mut entries: Vec<RankedEntry>) -> Self {
        entries.sort_by_key(RankedEntry::timestamp);
        RankedSequence {
            entries,
            generated_at: Utc::now(),
        }
    }

    /// 空序列
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn all(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, exhibit: &str) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| e.exhibit == exhibit)
    }

    /// 序列生成时间
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// 得分最高的 n 个展品，按时间顺序返回
    pub fn top_n(&self, n: usize) -> Result<Vec<RankedEntry>> {
        top_n(&self.entries, n)
    }
}

impl Default for RankedSequence {
    fn default() -> Self {
        Self::empty()
    }
}

/// 得分最高的 n 个条目，按平均时间升序返回
///
/// 两次排序都是稳定排序：同分条目保持输入中的先后顺序。
pub fn top_n(entries: &[RankedEntry], n: usize) -> Result<Vec<RankedEntry>> {
    if n == 0 || n > entries.len() {
        debug!(requested = n, available = entries.len(), "invalid_rank_request");
        return Err(RankError::InvalidRankRequest {
            requested: n,
            available: entries.len(),
        });
    }

    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
    ranked.truncate(n);
    ranked.sort_by_key(RankedEntry::timestamp);
    Ok(ranked)
}
