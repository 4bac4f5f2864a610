/// 信标统计聚合器
///
/// 逐条接收读数，按信标标识累计样本数、评分和时间偏移；
/// 数据流结束后调用 finalize 计算平均时间并生成有序序列。

use crate::error::{RankError, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::{BeaconStat, ExhibitTable, RankedEntry, RankedSequence, Reading};
use super::{LOW_BOUNDARY, estimate_distance, score_for};

/// 单条读数的处理结果
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IngestOutcome {
    /// 在接收半径内，已计入统计
    Accepted { distance: f64, score: f64 },
    /// 超出接收半径（或距离为 NaN），已丢弃
    Discarded { distance: f64 },
}

impl IngestOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, IngestOutcome::Accepted { .. })
    }
}

/// 聚合器，每次加载新建一个实例
#[derive(Debug, Default)]
pub struct Aggregator {
    /// 按首次出现顺序保存的统计
    stats: Vec<(String, BeaconStat)>,
    /// 信标标识 -> stats 下标
    index: HashMap<String, usize>,
    accepted: usize,
    discarded: usize,
    finalized: bool,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 处理一条读数
    pub fn ingest(&mut self, reading: &Reading) -> Result<IngestOutcome> {
        if self.finalized {
            return Err(RankError::Misuse("聚合器已完成统计, 不能继续写入读数"));
        }

        let distance = estimate_distance(reading.power, reading.rssi);
        // NaN 无法归入任何区间，按超出半径处理
        if distance.is_nan() || distance >= LOW_BOUNDARY {
            self.discarded += 1;
            debug!(
                beacon = %reading.beacon_id,
                distance,
                "reading_out_of_radius"
            );
            return Ok(IngestOutcome::Discarded { distance });
        }

        let score = score_for(distance);
        let slot = match self.index.get(&reading.beacon_id) {
            Some(&slot) => slot,
            None => {
                self.stats
                    .push((reading.beacon_id.clone(), BeaconStat::default()));
                self.index
                    .insert(reading.beacon_id.clone(), self.stats.len() - 1);
                self.stats.len() - 1
            }
        };
        self.stats[slot].1.record(score, reading.time_offset);
        self.accepted += 1;

        Ok(IngestOutcome::Accepted { distance, score })
    }

    /// 查询某信标当前的累计统计
    pub fn stat(&self, beacon_id: &str) -> Option<&BeaconStat> {
        self.index.get(beacon_id).map(|&slot| &self.stats[slot].1)
    }

    /// 已跟踪的信标数量
    pub fn beacon_count(&self) -> usize {
        self.stats.len()
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// 结束统计：计算平均时间、替换为展品编号并按平均时间升序排序
    ///
    /// 任何信标缺少展品编号时整体失败，不产生结果。
    /// 平均时间相同的展品保持信标首次出现的顺序。
    pub fn finalize(&mut self, exhibits: &ExhibitTable) -> Result<RankedSequence> {
        if self.finalized {
            return Err(RankError::Misuse("聚合器已完成统计"));
        }

        let mut labelled = Vec::with_capacity(self.stats.len());
        for (beacon_id, stat) in self.stats.iter_mut() {
            match exhibits.label(beacon_id) {
                Some(label) => labelled.push((label, stat)),
                None => {
                    warn!(beacon = %beacon_id, "unmapped_beacon_identity");
                    return Err(RankError::UnmappedIdentity(beacon_id.clone()));
                }
            }
        }

        self.finalized = true;
        let entries = labelled
            .into_iter()
            .map(|(label, stat)| {
                stat.settle_mean();
                RankedEntry::new(label, stat.clone())
            })
            .collect();

        Ok(RankedSequence::new(entries))
    }
}
