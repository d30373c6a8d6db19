use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::path::Distance;

/// Step taken along a computed path.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PathStep {
    pub index: usize,
    pub id: NodeId,
    /// Cumulative distance from the source in metres.
    pub distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// Structured representation of a shortest path that higher-level consumers
/// can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PathSummary {
    pub source: NodeId,
    pub target: NodeId,
    pub hops: usize,
    pub total_distance: f64,
    pub steps: Vec<PathStep>,
}

impl PathSummary {
    /// Convert the records returned by
    /// [`ShortestPath::calc`](crate::path::ShortestPath::calc) into a summary,
    /// resolving coordinates from `graph`.
    pub fn from_path(graph: &Graph, path: &[Distance]) -> Result<Self> {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return Err(Error::EmptyPath);
        };

        let steps = path
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let node = graph.get(&record.id);
                PathStep {
                    index,
                    id: record.id.clone(),
                    distance: record.distance,
                    lat: node.map(|node| node.lat()),
                    lon: node.map(|node| node.lon()),
                }
            })
            .collect();

        Ok(Self {
            source: first.id.clone(),
            target: last.id.clone(),
            hops: path.len() - 1,
            total_distance: last.distance,
            steps,
        })
    }

    /// Plain-text rendering, one line per step.
    pub fn render_text(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Path: {} -> {} ({} hops, {:.1} m)",
            self.source, self.target, self.hops, self.total_distance
        );
        for step in &self.steps {
            let _ = writeln!(buffer, "node id: {}, distance: {} m", step.id, step.distance);
        }
        buffer
    }
}
