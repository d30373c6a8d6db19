// One module per subcommand; main.rs only parses arguments and dispatches.

pub mod dump;
pub mod fetch;
pub mod route;

use anyhow::{Context, Result};
use roadnet_lib::{load_road_graph, Graph, ImportOptions};

/// Import the road graph, attaching the data source to any failure.
pub(crate) fn import_graph(options: &ImportOptions) -> Result<Graph> {
    load_road_graph(options).with_context(|| match &options.source_file {
        Some(path) => format!("failed to load road data from {}", path.display()),
        None => format!(
            "failed to import road data for bounding box {}",
            options.query.bbox
        ),
    })
}
