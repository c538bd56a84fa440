use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pipe_network_sizer::{app, config, ui_cli, water};
use tracing_subscriber::EnvFilter;

/// Hazen-Williams 기반 배관망 구간 사이징 도구.
#[derive(Debug, Parser)]
#[command(name = "pipe_network_sizer", version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 구간 표(TOML)를 분석한다
    Analyze {
        /// `[[segments]]` 배열을 담은 파일
        input: PathBuf,
        /// 네트워크를 Graphviz DOT 파일로 저장
        #[arg(long)]
        dot: Option<PathBuf>,
    },
    /// 단일 구간을 계산한다
    Segment {
        #[arg(long)]
        length: f64,
        #[arg(long)]
        flow: f64,
        #[arg(long)]
        diameter: f64,
        #[arg(long)]
        roughness: f64,
        #[arg(long, default_value = "S1")]
        id: String,
        #[arg(long, default_value = "A")]
        from: String,
        #[arg(long, default_value = "B")]
        to: String,
    },
    /// 기본 설정 파일을 생성한다
    InitConfig,
    /// 대화형 메뉴를 실행한다
    Interactive,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 요청된 명령을 실행한다.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = try_run(Cli::parse()) {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run(cli: Cli) -> Result<(), app::AppError> {
    let mut cfg = config::load_or_default(&cli.config)?;
    match cli.command.unwrap_or(Command::Interactive) {
        Command::Analyze { input, dot } => {
            let report = app::analyze_file(&cfg, &input, dot.as_deref())?;
            ui_cli::print_report(&report, &cfg.display);
        }
        Command::Segment {
            length,
            flow,
            diameter,
            roughness,
            id,
            from,
            to,
        } => {
            let segment = water::Segment {
                id,
                length_m: length,
                flow_m3_per_s: flow,
                diameter_m: diameter,
                roughness_c: roughness,
                from_node: from,
                to_node: to,
            };
            let analyzer = water::SegmentAnalyzer::new(cfg.analyzer)?;
            let result = analyzer.analyze_segment(&segment)?;
            ui_cli::print_result(&result, &cfg.display);
        }
        Command::InitConfig => {
            cfg.save(&cli.config)?;
            println!("설정 파일을 저장했습니다: {}", cli.config.display());
        }
        Command::Interactive => app::run(&mut cfg, &cli.config)?,
    }
    Ok(())
}
