use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::segment_table::{self, SegmentTableError};
use crate::ui_cli;
use crate::ui_cli::MenuChoice;
use crate::water::{AnalysisReport, HydraulicsError, Network, SegmentAnalyzer};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 구간 표 로드 오류
    #[error("구간 표 오류: {0}")]
    SegmentTable(#[from] SegmentTableError),
    /// 배관 계산 오류
    #[error("배관 계산 오류: {0}")]
    Hydraulics(#[from] HydraulicsError),
}

/// 구간 표 파일을 분석하고, 요청 시 네트워크를 DOT 파일로 저장한다.
pub fn analyze_file(
    config: &Config,
    input: &Path,
    dot_output: Option<&Path>,
) -> Result<AnalysisReport, AppError> {
    let analyzer = SegmentAnalyzer::new(config.analyzer)?;
    let rows = segment_table::load_segment_rows(input)?;
    tracing::info!(path = %input.display(), rows = rows.len(), "구간 표 로드");
    let report = analyzer.analyze_rows(rows);

    if let Some(dot_path) = dot_output {
        let network = Network::from_report(
            &report,
            &config.display.palette(),
            config.display.decimals,
        );
        std::fs::write(dot_path, network.to_dot())?;
        tracing::info!(
            path = %dot_path.display(),
            nodes = network.node_count(),
            edges = network.edge_count(),
            "네트워크 DOT 저장"
        );
    }
    Ok(report)
}

/// CLI 대화형 메인 루프를 실행한다.
pub fn run(config: &mut Config, config_path: &Path) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu()? {
            MenuChoice::SingleSegment => ui_cli::handle_single_segment(config)?,
            MenuChoice::AnalyzeFile => {
                let path = PathBuf::from(ui_cli::read_line("구간 표 파일 경로: ")?.trim());
                // 파일 단위 오류는 메뉴로 돌아간다
                match analyze_file(config, &path, None) {
                    Ok(report) => ui_cli::print_report(&report, &config.display),
                    Err(err) => println!("오류: {err}"),
                }
            }
            MenuChoice::Settings => {
                ui_cli::handle_settings(config)?;
                config.save(config_path)?;
            }
            MenuChoice::Exit => {
                config.save(config_path)?;
                println!("종료합니다.");
                break;
            }
        }
    }
    Ok(())
}
