//! 구간 표(TOML) 로더.
//!
//! 파일 형식 예시:
//!
//! ```toml
//! [[segments]]
//! id = "S1"
//! length = 500.0
//! flow = 0.05
//! diameter = 0.2
//! C = 120
//! from = "A"
//! to = "B"
//! ```
//!
//! 열 이름은 대소문자를 구분하지 않으며 스프레드시트 머리글 형태(`Length (m)` 등)도 받는다.
//! 한 행에 같은 열의 별칭이 여러 개 있으면(`flow`와 `Q` 등) 해당 행은 `InvalidField`가 된다.
//! 행 단위 오류는 해당 행에만 남기고 나머지 행은 계속 읽는다.

use std::fs;
use std::path::Path;

use thiserror::Error;
use toml::{Table, Value};

use crate::water::Segment;

const ID_COLUMNS: &[&str] = &["id", "segment", "segment_id", "name"];
const LENGTH_COLUMNS: &[&str] = &["length", "length_m", "length (m)"];
const FLOW_COLUMNS: &[&str] = &["flow", "flow_m3_per_s", "flow (m3/s)", "q"];
const DIAMETER_COLUMNS: &[&str] = &["diameter", "diameter_m", "diameter (m)", "d"];
const ROUGHNESS_COLUMNS: &[&str] = &["roughness", "roughness_c", "c", "hazen-williams c"];
const FROM_COLUMNS: &[&str] = &["from", "from_node", "start", "source"];
const TO_COLUMNS: &[&str] = &["to", "to_node", "end", "target"];

/// 한 행을 구간으로 바꾸지 못한 이유.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// 필수 열 누락
    #[error("필수 열 누락: {field}")]
    MissingField { field: &'static str },
    /// 값 형식 오류
    #[error("잘못된 값: {field} = {value}")]
    InvalidField { field: &'static str, value: String },
    /// 행이 테이블이 아님
    #[error("행이 테이블 형식이 아닙니다")]
    NotATable,
}

/// 파일 단위 오류. 발생 시 전체 분석을 중단한다.
#[derive(Debug, Error)]
pub enum SegmentTableError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("구간 표 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("`segments` 배열이 없습니다")]
    MissingSegments,
}

/// 행 목록. 각 행은 구간 또는 행 오류다.
pub type SegmentRows = Vec<Result<Segment, RowError>>;

/// 파일에서 구간 행을 읽는다.
pub fn load_segment_rows(path: impl AsRef<Path>) -> Result<SegmentRows, SegmentTableError> {
    let content = fs::read_to_string(path)?;
    parse_segment_rows(&content)
}

/// TOML 문자열에서 구간 행을 읽는다.
pub fn parse_segment_rows(src: &str) -> Result<SegmentRows, SegmentTableError> {
    let doc: Table = toml::from_str(src)?;
    let rows = match doc.get("segments") {
        Some(Value::Array(rows)) => rows,
        _ => return Err(SegmentTableError::MissingSegments),
    };
    Ok(rows
        .iter()
        .map(|row| match row {
            Value::Table(table) => segment_from_row(table),
            _ => Err(RowError::NotATable),
        })
        .collect())
}

/// 열 이름 → 값 형태의 행을 구간으로 변환한다.
pub fn segment_from_row(row: &Table) -> Result<Segment, RowError> {
    Ok(Segment {
        id: label_field(row, "id", ID_COLUMNS)?,
        length_m: number_field(row, "length", LENGTH_COLUMNS)?,
        flow_m3_per_s: number_field(row, "flow", FLOW_COLUMNS)?,
        diameter_m: number_field(row, "diameter", DIAMETER_COLUMNS)?,
        roughness_c: number_field(row, "roughness", ROUGHNESS_COLUMNS)?,
        from_node: label_field(row, "from", FROM_COLUMNS)?,
        to_node: label_field(row, "to", TO_COLUMNS)?,
    })
}

fn lookup<'a>(
    row: &'a Table,
    field: &'static str,
    aliases: &[&str],
) -> Result<&'a Value, RowError> {
    let mut matches = row.iter().filter(|(key, _)| {
        let key = key.trim().to_ascii_lowercase();
        aliases.iter().any(|alias| *alias == key)
    });
    let (first_key, value) = matches.next().ok_or(RowError::MissingField { field })?;
    // 같은 열을 가리키는 별칭이 둘 이상이면 어느 값을 쓸지 정할 수 없다
    if let Some((second_key, _)) = matches.next() {
        return Err(RowError::InvalidField {
            field,
            value: format!("중복 열: {first_key}, {second_key}"),
        });
    }
    Ok(value)
}

fn number_field(row: &Table, field: &'static str, aliases: &[&str]) -> Result<f64, RowError> {
    let value = lookup(row, field, aliases)?;
    let parsed = match value {
        Value::Float(v) => Some(*v),
        Value::Integer(v) => Some(*v as f64),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| RowError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn label_field(row: &Table, field: &'static str, aliases: &[&str]) -> Result<String, RowError> {
    let value = lookup(row, field, aliases)?;
    let label = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Integer(v) => v.to_string(),
        _ => {
            return Err(RowError::InvalidField {
                field,
                value: value.to_string(),
            })
        }
    };
    if label.is_empty() {
        return Err(RowError::MissingField { field });
    }
    Ok(label)
}
