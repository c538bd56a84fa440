//! Hazen-Williams 기반 물 배관 구간 계산.
//!
//! 모든 함수는 순수 함수이며 SI 단위(m, m3/s, m/s)를 사용한다.
//! 반올림은 표시 단계에서만 수행하고 여기서는 하지 않는다.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hazen-Williams SI 경험식 계수.
pub const HAZEN_WILLIAMS_COEFFICIENT: f64 = 10.67;
/// 유량/조도계수 지수.
pub const FLOW_EXPONENT: f64 = 1.85;
/// 내경 지수.
pub const DIAMETER_EXPONENT: f64 = 4.87;
/// 경제 내경 산정용 기본 목표 유속 [m/s]
pub const DEFAULT_TARGET_VELOCITY_M_PER_S: f64 = 1.0;
/// 허용 유속 하한 기본값 [m/s]
pub const DEFAULT_LOW_VELOCITY_M_PER_S: f64 = 0.9;
/// 허용 유속 상한 기본값 [m/s]
pub const DEFAULT_HIGH_VELOCITY_M_PER_S: f64 = 1.1;

/// 수리 계산 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HydraulicsError {
    /// 손실수두 계산을 불가능하게 만드는 구간 입력
    #[error("잘못된 구간 입력: {field} = {value}")]
    InvalidSegment { field: &'static str, value: f64 },
    /// 경제 내경 계산 입력 오류
    #[error("입력 오류: {field} = {value}")]
    InvalidInput { field: &'static str, value: f64 },
}

/// 유속 판정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VelocityClass {
    /// 하한 미만
    BelowBand,
    /// 허용 범위 이내 (경계 포함)
    WithinBand,
    /// 상한 초과
    AboveBand,
}

impl VelocityClass {
    pub fn is_within_band(self) -> bool {
        matches!(self, VelocityClass::WithinBand)
    }

    pub fn is_out_of_band(self) -> bool {
        !self.is_within_band()
    }

    /// 표 출력용 짧은 표기.
    pub fn label(self) -> &'static str {
        match self {
            VelocityClass::BelowBand => "LOW",
            VelocityClass::WithinBand => "OK",
            VelocityClass::AboveBand => "HIGH",
        }
    }
}

/// 허용 유속 범위 [m/s]. 양 끝을 포함한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityBand {
    pub low_m_per_s: f64,
    pub high_m_per_s: f64,
}

impl Default for VelocityBand {
    fn default() -> Self {
        Self {
            low_m_per_s: DEFAULT_LOW_VELOCITY_M_PER_S,
            high_m_per_s: DEFAULT_HIGH_VELOCITY_M_PER_S,
        }
    }
}

impl VelocityBand {
    /// 하한/상한을 검증한 뒤 범위를 만든다.
    pub fn new(low_m_per_s: f64, high_m_per_s: f64) -> Result<Self, HydraulicsError> {
        if !low_m_per_s.is_finite() || low_m_per_s < 0.0 {
            return Err(HydraulicsError::InvalidInput {
                field: "low_velocity",
                value: low_m_per_s,
            });
        }
        if !high_m_per_s.is_finite() || high_m_per_s < low_m_per_s {
            return Err(HydraulicsError::InvalidInput {
                field: "high_velocity",
                value: high_m_per_s,
            });
        }
        Ok(Self {
            low_m_per_s,
            high_m_per_s,
        })
    }

    pub fn contains(&self, velocity_m_per_s: f64) -> bool {
        self.low_m_per_s <= velocity_m_per_s && velocity_m_per_s <= self.high_m_per_s
    }
}

/// 유량과 내경으로 평균 유속을 계산한다.
///
/// v = Q / (π (D/2)²)
///
/// 내경이 정확히 0이면(아직 사이징되지 않은 구간) 오류 대신 0을 반환한다.
/// 이 경우 결과는 하한 미만으로 판정된다. 유량이 0이면 유속도 0이다.
pub fn compute_velocity(flow_m3_per_s: f64, diameter_m: f64) -> f64 {
    if diameter_m == 0.0 || flow_m3_per_s == 0.0 {
        return 0.0;
    }
    let radius = diameter_m / 2.0;
    let area = PI * radius * radius;
    // 극히 작은 내경은 단면적이 0으로 언더플로되어 무한대 유속이 된다
    flow_m3_per_s / area
}

/// Hazen-Williams 식으로 손실수두 [m]를 계산한다.
///
/// h_f = 10.67 · L · Q^1.85 / (C^1.85 · D^4.87)
///
/// 유량은 방향과 무관하게 0 이상이라고 가정한다. 음수 유량의 비정수 거듭제곱은
/// 정의되지 않으므로 `InvalidSegment`로 거부한다.
pub fn compute_head_loss(
    flow_m3_per_s: f64,
    length_m: f64,
    diameter_m: f64,
    roughness_c: f64,
) -> Result<f64, HydraulicsError> {
    if !flow_m3_per_s.is_finite() || flow_m3_per_s < 0.0 {
        return Err(HydraulicsError::InvalidSegment {
            field: "flow",
            value: flow_m3_per_s,
        });
    }
    if !length_m.is_finite() || length_m < 0.0 {
        return Err(HydraulicsError::InvalidSegment {
            field: "length",
            value: length_m,
        });
    }
    if !diameter_m.is_finite() || diameter_m <= 0.0 {
        return Err(HydraulicsError::InvalidSegment {
            field: "diameter",
            value: diameter_m,
        });
    }
    if !roughness_c.is_finite() || roughness_c <= 0.0 {
        return Err(HydraulicsError::InvalidSegment {
            field: "roughness",
            value: roughness_c,
        });
    }

    let numerator = HAZEN_WILLIAMS_COEFFICIENT * length_m * flow_m3_per_s.powf(FLOW_EXPONENT);
    let denominator = roughness_c.powf(FLOW_EXPONENT) * diameter_m.powf(DIAMETER_EXPONENT);
    let head_loss = numerator / denominator;
    // D^4.87 언더플로 또는 결과 오버플로
    if denominator == 0.0 || !head_loss.is_finite() {
        return Err(HydraulicsError::InvalidSegment {
            field: "diameter",
            value: diameter_m,
        });
    }
    Ok(head_loss)
}

/// 목표 유속을 만족하는 경제 내경 [m]을 계산한다.
///
/// 실제 구간 내경과는 무관하며 비교용 권장값이다.
pub fn suggest_economic_diameter(
    flow_m3_per_s: f64,
    target_velocity_m_per_s: f64,
) -> Result<f64, HydraulicsError> {
    if !target_velocity_m_per_s.is_finite() || target_velocity_m_per_s <= 0.0 {
        return Err(HydraulicsError::InvalidInput {
            field: "target_velocity",
            value: target_velocity_m_per_s,
        });
    }
    if !flow_m3_per_s.is_finite() || flow_m3_per_s < 0.0 {
        return Err(HydraulicsError::InvalidInput {
            field: "flow",
            value: flow_m3_per_s,
        });
    }
    let area = flow_m3_per_s / target_velocity_m_per_s;
    Ok((4.0 * area / PI).sqrt())
}

/// 유속이 허용 범위 안에 있는지 판정한다.
pub fn classify_velocity(velocity_m_per_s: f64, band: &VelocityBand) -> VelocityClass {
    if band.contains(velocity_m_per_s) {
        VelocityClass::WithinBand
    } else if velocity_m_per_s > band.high_m_per_s {
        VelocityClass::AboveBand
    } else {
        // NaN도 여기로 떨어진다
        VelocityClass::BelowBand
    }
}
