//! 구간 목록을 받아 구간별 계산 결과 또는 오류를 모은다.
//!
//! 각 결과는 해당 구간과 설정 상수에만 의존한다. 구간 간 질량/에너지 수지는 계산하지 않는다.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::hazen_williams::{
    classify_velocity, compute_head_loss, compute_velocity, suggest_economic_diameter,
    HydraulicsError, VelocityBand, DEFAULT_TARGET_VELOCITY_M_PER_S,
};
use super::segment::{Segment, SegmentResult};
use crate::segment_table::RowError;

/// 분석기 상수. 기본값은 목표 유속 1.0 m/s, 허용 범위 0.9~1.1 m/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub target_velocity_m_per_s: f64,
    pub band: VelocityBand,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            target_velocity_m_per_s: DEFAULT_TARGET_VELOCITY_M_PER_S,
            band: VelocityBand::default(),
        }
    }
}

impl AnalyzerConfig {
    /// 목표 유속과 허용 범위를 검증한다.
    pub fn validate(&self) -> Result<(), HydraulicsError> {
        if !self.target_velocity_m_per_s.is_finite() || self.target_velocity_m_per_s <= 0.0 {
            return Err(HydraulicsError::InvalidInput {
                field: "target_velocity",
                value: self.target_velocity_m_per_s,
            });
        }
        VelocityBand::new(self.band.low_m_per_s, self.band.high_m_per_s)?;
        Ok(())
    }
}

/// 한 행(구간)의 실패 원인.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentError {
    #[error(transparent)]
    Row(#[from] RowError),
    #[error(transparent)]
    Hydraulics(#[from] HydraulicsError),
    /// 같은 식별자가 앞 행에서 이미 사용됨
    #[error("중복된 구간 식별자: {id}")]
    DuplicateSegment { id: String },
}

/// 행 단위 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOutcome {
    /// 입력 순서 (0부터)
    pub row: usize,
    /// 행 파싱에 실패하면 None
    pub segment_id: Option<String>,
    pub result: Result<SegmentResult, SegmentError>,
}

/// 부분 성공을 허용하는 분석 보고서.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub outcomes: Vec<SegmentOutcome>,
}

impl AnalysisReport {
    pub fn successes(&self) -> impl Iterator<Item = &SegmentResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&SegmentOutcome, &SegmentError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }

    pub fn ok_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn out_of_band_count(&self) -> usize {
        self.successes().filter(|r| r.is_out_of_band()).count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed_count() == 0
    }
}

/// 상태 없는 구간 분석기. 설정 상수만 보관한다.
#[derive(Debug, Clone, Default)]
pub struct SegmentAnalyzer {
    config: AnalyzerConfig,
}

impl SegmentAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, HydraulicsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// 구간 하나를 분석한다. 유속, 손실수두, 경제 내경, 유속 판정을 조합할 뿐이다.
    pub fn analyze_segment(&self, segment: &Segment) -> Result<SegmentResult, HydraulicsError> {
        let velocity = compute_velocity(segment.flow_m3_per_s, segment.diameter_m);
        let head_loss = compute_head_loss(
            segment.flow_m3_per_s,
            segment.length_m,
            segment.diameter_m,
            segment.roughness_c,
        )?;
        let economic_diameter =
            suggest_economic_diameter(segment.flow_m3_per_s, self.config.target_velocity_m_per_s)?;
        let velocity_class = classify_velocity(velocity, &self.config.band);

        debug!(
            segment = %segment.id,
            velocity,
            head_loss,
            economic_diameter,
            ?velocity_class,
            "구간 분석 완료"
        );

        Ok(SegmentResult {
            segment_id: segment.id.clone(),
            from_node: segment.from_node.clone(),
            to_node: segment.to_node.clone(),
            velocity_m_per_s: velocity,
            head_loss_m: head_loss,
            economic_diameter_m: economic_diameter,
            velocity_class,
        })
    }

    /// 이미 파싱된 구간 목록을 분석한다.
    pub fn analyze_all(&self, segments: &[Segment]) -> AnalysisReport {
        self.analyze_rows(segments.iter().cloned().map(Ok))
    }

    /// 파싱 결과가 섞인 행 목록을 분석한다. 한 행의 실패가 나머지 행에 영향을 주지 않는다.
    pub fn analyze_rows<I>(&self, rows: I) -> AnalysisReport
    where
        I: IntoIterator<Item = Result<Segment, RowError>>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut outcomes = Vec::new();

        for (row, parsed) in rows.into_iter().enumerate() {
            let outcome = match parsed {
                Err(err) => SegmentOutcome {
                    row,
                    segment_id: None,
                    result: Err(err.into()),
                },
                Ok(segment) => {
                    let result = if seen.insert(segment.id.clone()) {
                        self.analyze_segment(&segment).map_err(SegmentError::from)
                    } else {
                        Err(SegmentError::DuplicateSegment {
                            id: segment.id.clone(),
                        })
                    };
                    SegmentOutcome {
                        row,
                        segment_id: Some(segment.id),
                        result,
                    }
                }
            };
            if let Err(err) = &outcome.result {
                warn!(row, segment = ?outcome.segment_id, error = %err, "구간 분석 실패");
            }
            outcomes.push(outcome);
        }

        let report = AnalysisReport { outcomes };
        info!(
            ok = report.ok_count(),
            failed = report.failed_count(),
            out_of_band = report.out_of_band_count(),
            "분석 완료"
        );
        report
    }
}
