use serde::{Deserialize, Serialize};

use super::hazen_williams::VelocityClass;

/// 배관 구간 입력값. 노드 순서(from → to)가 흐름 방향을 나타낸다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// 구간 식별자 (네트워크 내 고유)
    pub id: String,
    /// 길이 [m]
    pub length_m: f64,
    /// 체적 유량 [m3/s]
    pub flow_m3_per_s: f64,
    /// 내경 [m]
    pub diameter_m: f64,
    /// Hazen-Williams 조도계수 C
    pub roughness_c: f64,
    /// 시작 노드
    pub from_node: String,
    /// 끝 노드
    pub to_node: String,
}

/// 구간 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    pub segment_id: String,
    pub from_node: String,
    pub to_node: String,
    /// 유속 [m/s]
    pub velocity_m_per_s: f64,
    /// 손실수두 [m]
    pub head_loss_m: f64,
    /// 목표 유속 기준 경제 내경 [m]
    pub economic_diameter_m: f64,
    pub velocity_class: VelocityClass,
}

impl SegmentResult {
    pub fn is_out_of_band(&self) -> bool {
        self.velocity_class.is_out_of_band()
    }
}
