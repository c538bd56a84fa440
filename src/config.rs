use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::water::{AnalyzerConfig, EdgePalette, HydraulicsError};

/// 기본 설정 파일 이름.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 결과 표시 설정. 반올림은 출력할 때만 적용한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 소수점 자릿수
    pub decimals: usize,
    /// 허용 범위 이내 간선 색상
    pub within_band_color: String,
    /// 허용 범위 이탈 간선 색상
    pub out_of_band_color: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let palette = EdgePalette::default();
        Self {
            decimals: 3,
            within_band_color: palette.within_band,
            out_of_band_color: palette.out_of_band,
        }
    }
}

impl DisplayConfig {
    pub fn palette(&self) -> EdgePalette {
        EdgePalette {
            within_band: self.within_band_color.clone(),
            out_of_band: self.out_of_band_color.clone(),
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub display: DisplayConfig,
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Deserialize(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 값 범위 오류
    #[error("잘못된 설정 값: {0}")]
    Invalid(#[from] HydraulicsError),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 반환한다.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        let content = fs::read_to_string(path)?;
        Config::from_toml(&content)
    } else {
        tracing::debug!(path = %path.display(), "설정 파일이 없어 기본값 사용");
        Ok(Config::default())
    }
}

impl Config {
    /// TOML 문자열을 읽고 검증한다. 빠진 항목은 기본값으로 채운다.
    pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(src)?;
        cfg.analyzer.validate()?;
        Ok(cfg)
    }

    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
