use anyhow::Result;
use tracing::info;

use roadnet_cli::output::{GraphStats, OutputFormat};
use roadnet_lib::ImportOptions;

use super::import_graph;

/// Import road data and report its size. A live import also fills the cache.
pub fn handle_fetch_command(options: &ImportOptions, format: OutputFormat) -> Result<()> {
    let graph = import_graph(options)?;
    let stats = GraphStats::of(&graph);
    info!(bbox = %options.query.bbox, "road data ready");
    print!("{}", format.render_stats(&stats)?);
    Ok(())
}
