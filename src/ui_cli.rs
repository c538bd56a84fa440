use std::fmt::Write as _;
use std::io::{self, Write};

use crate::app::AppError;
use crate::config::{Config, DisplayConfig};
use crate::water::{AnalysisReport, Segment, SegmentAnalyzer, SegmentResult, VelocityBand};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SingleSegment,
    AnalyzeFile,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu() -> Result<MenuChoice, AppError> {
    println!("\n=== Pipe Network Sizer ===");
    println!("1) 단일 구간 계산");
    println!("2) 구간 표 파일 분석");
    println!("3) 설정");
    println!("0) 종료");
    loop {
        let sel = read_line("메뉴 선택: ")?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::SingleSegment),
            "2" => return Ok(MenuChoice::AnalyzeFile),
            "3" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("잘못된 입력입니다. 다시 선택하세요."),
        }
    }
}

/// 단일 구간 계산 메뉴를 처리한다.
pub fn handle_single_segment(cfg: &Config) -> Result<(), AppError> {
    println!("\n-- 단일 구간 계산 (Hazen-Williams) --");
    let segment = Segment {
        id: "S1".to_string(),
        length_m: read_f64("배관 길이 [m]: ")?,
        flow_m3_per_s: read_f64("체적 유량 [m3/s]: ")?,
        diameter_m: read_f64("배관 내경 [m]: ")?,
        roughness_c: read_f64("조도계수 C (주철 약 100, PVC 약 140): ")?,
        from_node: "A".to_string(),
        to_node: "B".to_string(),
    };
    let analyzer = SegmentAnalyzer::new(cfg.analyzer)?;
    match analyzer.analyze_segment(&segment) {
        Ok(result) => print_result(&result, &cfg.display),
        Err(err) => println!("계산 불가: {err}"),
    }
    Ok(())
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(cfg: &mut Config) -> Result<(), AppError> {
    println!("\n-- 설정 --");
    println!(
        "현재 목표 유속: {} m/s, 허용 범위: {} ~ {} m/s",
        cfg.analyzer.target_velocity_m_per_s,
        cfg.analyzer.band.low_m_per_s,
        cfg.analyzer.band.high_m_per_s
    );
    let sel = read_line("변경하려면 y 입력(취소하려면 엔터): ")?;
    if !sel.trim().eq_ignore_ascii_case("y") {
        return Ok(());
    }
    let target = read_f64("목표 유속 [m/s]: ")?;
    let low = read_f64("허용 하한 [m/s]: ")?;
    let high = read_f64("허용 상한 [m/s]: ")?;

    let mut updated = cfg.analyzer;
    updated.target_velocity_m_per_s = target;
    match VelocityBand::new(low, high) {
        Ok(band) => updated.band = band,
        Err(err) => {
            println!("잘못된 입력이므로 변경하지 않습니다: {err}");
            return Ok(());
        }
    }
    if let Err(err) = updated.validate() {
        println!("잘못된 입력이므로 변경하지 않습니다: {err}");
        return Ok(());
    }
    cfg.analyzer = updated;
    println!("설정이 변경되었습니다.");
    Ok(())
}

/// 단일 구간 결과를 출력한다.
pub fn print_result(result: &SegmentResult, display: &DisplayConfig) {
    let n = display.decimals;
    println!(
        "유속: {:.*} m/s ({})",
        n,
        result.velocity_m_per_s,
        result.velocity_class.label()
    );
    println!("손실수두: {:.*} m", n, result.head_loss_m);
    println!("경제 내경: {:.*} m", n, result.economic_diameter_m);
}

/// 분석 보고서를 출력한다.
pub fn print_report(report: &AnalysisReport, display: &DisplayConfig) {
    print!("{}", format_report(report, display));
}

/// 분석 보고서를 표 형태 문자열로 만든다. 성공 행 뒤에 실패 행을 나열한다.
pub fn format_report(report: &AnalysisReport, display: &DisplayConfig) -> String {
    let n = display.decimals;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<8} {:<8} {:>12} {:>12} {:>12} {:>6}",
        "segment", "from", "to", "v [m/s]", "hf [m]", "D_econ [m]", "flag"
    );
    for r in report.successes() {
        let _ = writeln!(
            out,
            "{:<10} {:<8} {:<8} {:>12.*} {:>12.*} {:>12.*} {:>6}",
            r.segment_id,
            r.from_node,
            r.to_node,
            n,
            r.velocity_m_per_s,
            n,
            r.head_loss_m,
            n,
            r.economic_diameter_m,
            r.velocity_class.label()
        );
    }
    for (outcome, err) in report.failures() {
        let id = outcome.segment_id.as_deref().unwrap_or("-");
        let _ = writeln!(out, "행 {} ({id}) 실패: {err}", outcome.row + 1);
    }
    let _ = writeln!(
        out,
        "성공 {}건, 실패 {}건, 유속 범위 이탈 {}건",
        report.ok_count(),
        report.failed_count(),
        report.out_of_band_count()
    );
    out
}

pub fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    let read = io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    if read == 0 {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "입력이 종료되었습니다",
        )));
    }
    Ok(buf)
}

fn read_f64(prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("숫자를 입력하세요."),
        }
    }
}
