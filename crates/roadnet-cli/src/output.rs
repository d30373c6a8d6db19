//! Output formatting for path and graph reports.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use roadnet_lib::{Graph, PathSummary};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Node and edge totals for an imported graph.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
}

impl GraphStats {
    pub fn of(graph: &Graph) -> Self {
        Self {
            nodes: graph.len(),
            // Edges are stored once per direction.
            edges: graph.edge_count() / 2,
        }
    }
}

impl OutputFormat {
    pub fn render_path(self, summary: &PathSummary) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(summary.render_text()),
            OutputFormat::Json => to_json(summary),
        }
    }

    pub fn render_stats(self, stats: &GraphStats) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(format!(
                "Imported {} nodes and {} road segments\n",
                stats.nodes, stats.edges
            )),
            OutputFormat::Json => to_json(stats),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut rendered =
        serde_json::to_string_pretty(value).context("failed to serialise output as JSON")?;
    rendered.push('\n');
    Ok(rendered)
}
