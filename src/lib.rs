//! 배관 구간 계산 로직을 라이브러리로 분리하여 CLI 외의 화면에서도 재사용할 수 있게 한다.

pub mod app;
pub mod config;
pub mod segment_table;
pub mod ui_cli;
pub mod water;
