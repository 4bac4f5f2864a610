/// 距离分段评分
///
/// 距离越近权重越大，三个互不重叠的区间：
/// - distance >= MID          → 10 / 6（弱信号）
/// - HIGH < distance < MID    → 10 / 4
/// - distance <= HIGH         → 10 / 1（最近）

use std::fmt;

/// 接收半径（米），估算距离不小于该值的读数被丢弃
pub const LOW_BOUNDARY: f64 = 6.0;
pub const MID_BOUNDARY: f64 = 4.0;
pub const HIGH_BOUNDARY: f64 = 1.0;

/// 权重基数
pub const SCORE_BASE: f64 = 10.0;

/// 距离区间
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceBand {
    /// 弱信号，最低权重
    Weak,
    /// 中等距离
    Medium,
    /// 最近，最高权重
    Closest,
}

impl DistanceBand {
    /// 根据距离确定所属区间
    ///
    /// 调用方不得传入 NaN。
    pub fn classify(distance: f64) -> Self {
        if distance >= MID_BOUNDARY {
            DistanceBand::Weak
        } else if distance > HIGH_BOUNDARY {
            DistanceBand::Medium
        } else {
            DistanceBand::Closest
        }
    }

    /// 区间对应的权重
    pub fn weight(self) -> f64 {
        match self {
            DistanceBand::Weak => SCORE_BASE / LOW_BOUNDARY,
            DistanceBand::Medium => SCORE_BASE / MID_BOUNDARY,
            DistanceBand::Closest => SCORE_BASE / HIGH_BOUNDARY,
        }
    }
}

impl fmt::Display for DistanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DistanceBand::Weak => "weak",
            DistanceBand::Medium => "medium",
            DistanceBand::Closest => "closest",
        };
        write!(f, "{}", name)
    }
}

/// 距离对应的评分
pub fn score_for(distance: f64) -> f64 {
    DistanceBand::classify(distance).weight()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(score_for(MID_BOUNDARY), 10.0 / 6.0);
        assert_eq!(score_for(HIGH_BOUNDARY), 10.0);
        assert_eq!(score_for(2.5), 2.5);
        assert_eq!(score_for(5.9), 10.0 / 6.0);
        assert_eq!(score_for(-1.0), 10.0);
    }

    #[test]
    fn test_step_function_sweep() {
        let allowed = [10.0 / 6.0, 10.0 / 4.0, 10.0];
        let mut previous = f64::INFINITY;
        for step in 0..=1000 {
            let distance = step as f64 / 100.0;
            let score = score_for(distance);
            assert!(allowed.contains(&score), "距离 {} 得分 {}", distance, score);
            // 距离增大时得分不增
            assert!(score <= previous);
            previous = score;
        }
    }

    #[test]
    fn test_band_display() {
        assert_eq!(DistanceBand::classify(0.5).to_string(), "closest");
        assert_eq!(DistanceBand::classify(3.0).to_string(), "medium");
        assert_eq!(DistanceBand::classify(4.0).to_string(), "weak");
    }
}
