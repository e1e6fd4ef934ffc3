//! DIMACS `.col` instance parser
//!
//! Format:
//! ```text
//! c comment
//! p edge <vertices> <edges>
//! e <u> <v>          (1-based endpoints)
//! ```
//!
//! `p col` is accepted as a synonym of `p edge`. The declared edge count is
//! informational only; duplicate and reversed edges collapse into one.

use super::{Graph, MAX_VERTICES};
use crate::error::{GraphError, GraphResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parse a DIMACS `.col` file
pub fn parse_col_file(path: &Path) -> GraphResult<Graph> {
    let text = fs::read_to_string(path).map_err(|source| GraphError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_col_str(&text)?;

    debug!(
        path = %path.display(),
        vertices = graph.len(),
        edges = graph.edge_count(),
        "Instance parsed"
    );
    Ok(graph)
}

/// Parse DIMACS `.col` text
pub fn parse_col_str(text: &str) -> GraphResult<Graph> {
    let mut graph: Option<Graph> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let mut fields = raw.split_whitespace();
        let Some(tag) = fields.next() else {
            continue;
        };

        match tag {
            "c" => {}
            "p" => {
                if graph.is_some() {
                    return Err(GraphError::ProblemLine {
                        line,
                        reason: "duplicate problem line".into(),
                    });
                }
                let format = fields.next().unwrap_or_default();
                if format != "edge" && format != "col" {
                    return Err(GraphError::ProblemLine {
                        line,
                        reason: format!("unsupported format '{format}'"),
                    });
                }
                let n = fields
                    .next()
                    .and_then(|f| f.parse::<usize>().ok())
                    .ok_or_else(|| GraphError::ProblemLine {
                        line,
                        reason: "missing or invalid vertex count".into(),
                    })?;
                if n > MAX_VERTICES {
                    return Err(GraphError::ProblemLine {
                        line,
                        reason: "vertex count too large".into(),
                    });
                }
                graph = Some(Graph::new(n));
            }
            "e" => {
                let g = graph
                    .as_mut()
                    .ok_or(GraphError::EdgeBeforeProblem { line })?;
                let (u, v) = parse_endpoints(&mut fields).ok_or_else(|| {
                    GraphError::MalformedEdge {
                        line,
                        text: raw.trim().to_string(),
                    }
                })?;

                let n = g.len();
                for vertex in [u, v] {
                    if vertex == 0 || vertex > n {
                        return Err(GraphError::VertexOutOfRange { line, vertex, n });
                    }
                }
                if u == v {
                    return Err(GraphError::SelfLoop { line, vertex: u });
                }
                g.add_edge(u - 1, v - 1);
            }
            other => {
                return Err(GraphError::UnknownLine {
                    line,
                    tag: other.to_string(),
                })
            }
        }
    }

    graph.ok_or(GraphError::MissingProblem)
}

fn parse_endpoints<'a>(fields: &mut impl Iterator<Item = &'a str>) -> Option<(usize, usize)> {
    let u = fields.next()?.parse().ok()?;
    let v = fields.next()?.parse().ok()?;
    Some((u, v))
}
