//! 분석 결과로부터 만든 시각화용 방향 그래프.
//!
//! 이후 계산에는 쓰이지 않는다. DOT 출력으로 외부 그래프 도구에 넘긴다.

use std::fmt::Write as _;

use super::analyzer::AnalysisReport;
use super::segment::SegmentResult;

/// 간선 색상 설정.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePalette {
    pub within_band: String,
    pub out_of_band: String,
}

impl Default for EdgePalette {
    fn default() -> Self {
        Self {
            within_band: "black".to_string(),
            out_of_band: "red".to_string(),
        }
    }
}

/// 구간 하나에 해당하는 간선.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEdge {
    pub segment_id: String,
    pub from_node: String,
    pub to_node: String,
    pub velocity_m_per_s: f64,
    pub out_of_band: bool,
    pub label: String,
    pub color: String,
}

/// 노드는 처음 등장한 순서를 유지한다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    nodes: Vec<String>,
    edges: Vec<NetworkEdge>,
}

impl Network {
    /// 성공한 결과만으로 네트워크를 만든다. `decimals`는 간선 라벨의 유속 자릿수.
    pub fn from_report(report: &AnalysisReport, palette: &EdgePalette, decimals: usize) -> Self {
        Self::from_results(report.successes(), palette, decimals)
    }

    pub fn from_results<'a, I>(results: I, palette: &EdgePalette, decimals: usize) -> Self
    where
        I: IntoIterator<Item = &'a SegmentResult>,
    {
        let mut network = Network::default();
        for result in results {
            network.add_node(&result.from_node);
            network.add_node(&result.to_node);
            let out_of_band = result.is_out_of_band();
            let color = if out_of_band {
                palette.out_of_band.clone()
            } else {
                palette.within_band.clone()
            };
            network.edges.push(NetworkEdge {
                segment_id: result.segment_id.clone(),
                from_node: result.from_node.clone(),
                to_node: result.to_node.clone(),
                velocity_m_per_s: result.velocity_m_per_s,
                out_of_band,
                label: format!(
                    "{}: {:.*} m/s",
                    result.segment_id, decimals, result.velocity_m_per_s
                ),
                color,
            });
        }
        network
    }

    fn add_node(&mut self, node: &str) {
        if !self.nodes.iter().any(|n| n == node) {
            self.nodes.push(node.to_string());
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn edges(&self) -> &[NetworkEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn out_of_band_edges(&self) -> impl Iterator<Item = &NetworkEdge> {
        self.edges.iter().filter(|e| e.out_of_band)
    }

    pub fn edges_from<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a NetworkEdge> {
        self.edges.iter().filter(move |e| e.from_node == node)
    }

    /// Graphviz DOT 형식 문자열로 변환한다.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph pipe_network {\n");
        for node in &self.nodes {
            let _ = writeln!(out, "    {};", quote(node));
        }
        for edge in &self.edges {
            let _ = writeln!(
                out,
                "    {} -> {} [label={}, color={}];",
                quote(&edge.from_node),
                quote(&edge.to_node),
                quote(&edge.label),
                quote(&edge.color)
            );
        }
        out.push_str("}\n");
        out
    }
}

fn quote(raw: &str) -> String {
    let escaped = raw.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
