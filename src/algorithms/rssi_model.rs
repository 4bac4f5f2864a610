//! RSSI 到距离转换模型
//!
//! 固定的经验模型，只依赖两个输入：信标参考功率与接收信号强度。
//! - 近场（ratio < 1）：幂律衰减 ratio^10
//! - 远场：经验路径损耗拟合 0.89976 * ratio^7.7095 + 0.111

/// 信号不可读（RSSI 为 0）时返回的哨兵距离
pub const UNREADABLE_DISTANCE: f64 = -1.0;

/// 近场幂律指数
pub const NEAR_FIELD_EXPONENT: i32 = 10;

/// 远场拟合系数
pub const FAR_FIELD_COEFFICIENT: f64 = 0.89976;
/// 远场拟合指数
pub const FAR_FIELD_EXPONENT: f64 = 7.7095;
/// 远场拟合截距
pub const FAR_FIELD_INTERCEPT: f64 = 0.111;

/// 根据参考功率和 RSSI 估算距离
///
/// # 参数
/// - `power`: 信标参考功率 (dBm)
/// - `rssi`: 设备接收到的信号强度 (dBm)
///
/// # 返回
/// - 估算距离；`rssi == 0` 时返回 [`UNREADABLE_DISTANCE`]
///
/// `power == 0` 不做特殊处理，比值为无穷大或 NaN 并按浮点规则继续计算。
pub fn estimate_distance(power: f64, rssi: f64) -> f64 {
    if rssi == 0.0 {
        return UNREADABLE_DISTANCE;
    }

    let ratio = rssi / power;
    if ratio < 1.0 {
        return ratio.powi(NEAR_FIELD_EXPONENT);
    }

    FAR_FIELD_COEFFICIENT * ratio.powf(FAR_FIELD_EXPONENT) + FAR_FIELD_INTERCEPT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_signal() {
        assert_eq!(estimate_distance(-60.0, 0.0), UNREADABLE_DISTANCE);
        assert_eq!(estimate_distance(0.0, 0.0), UNREADABLE_DISTANCE);
    }

    #[test]
    fn test_near_field() {
        // ratio = 0.5
        let d = estimate_distance(-80.0, -40.0);
        assert!((d - 0.5_f64.powi(10)).abs() < 1e-12);
    }

    #[test]
    fn test_far_field_at_reference() {
        // ratio = 1 时进入远场分支
        let d = estimate_distance(-60.0, -60.0);
        assert!((d - (0.89976 + 0.111)).abs() < 1e-9);
    }

    #[test]
    fn test_far_field_weaker_signal() {
        let d = estimate_distance(-60.0, -70.0);
        let ratio = 70.0_f64 / 60.0;
        let expected = 0.89976 * ratio.powf(7.7095) + 0.111;
        assert!((d - expected).abs() < 1e-9);
        assert!(d > 3.0 && d < 3.2);
    }

    #[test]
    fn test_zero_power_is_unguarded() {
        // 负 RSSI / 0 = -inf，近场分支得到 +inf
        assert_eq!(estimate_distance(0.0, -70.0), f64::INFINITY);
        // 正 RSSI / 0 = +inf，远场分支得到 +inf
        assert_eq!(estimate_distance(0.0, 5.0), f64::INFINITY);
        // NaN 输入一路传播
        assert!(estimate_distance(f64::NAN, -70.0).is_nan());
    }
}
