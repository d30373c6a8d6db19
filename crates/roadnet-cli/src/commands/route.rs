//! Route command handler for computing paths between road nodes.

use anyhow::{Context, Result};
use tracing::debug;

use roadnet_cli::output::OutputFormat;
use roadnet_lib::{Error as RouteError, ImportOptions, PathSummary, ShortestPath};

use super::import_graph;

/// Handle the route subcommand.
pub fn handle_route_command(
    options: &ImportOptions,
    format: OutputFormat,
    from: &str,
    to: &str,
) -> Result<()> {
    let graph = import_graph(options)?;
    debug!(nodes = graph.len(), from, to, "planning route");

    let path = match ShortestPath::new(&graph).calc(from, to) {
        Ok(path) => path,
        Err(err) => return Err(handle_route_failure(err)),
    };

    let summary = PathSummary::from_path(&graph, &path)
        .context("failed to build path summary for display")?;
    print!("{}", format.render_path(&summary)?);
    Ok(())
}

fn handle_route_failure(err: RouteError) -> anyhow::Error {
    match err {
        RouteError::MissingNode { id } => anyhow::anyhow!(format_unknown_node_message(&id)),
        RouteError::Unreachable { start, goal } => {
            anyhow::anyhow!(format_route_not_found_message(&start, &goal))
        }
        other => anyhow::Error::new(other),
    }
}

fn format_unknown_node_message(id: &str) -> String {
    format!("Unknown node '{id}'. Use the dump command to list node ids.")
}

fn format_route_not_found_message(start: &str, goal: &str) -> String {
    format!("No route found between {start} and {goal}.")
}
