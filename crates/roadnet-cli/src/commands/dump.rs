use anyhow::Result;

use roadnet_lib::ImportOptions;

use super::import_graph;

/// Print every node with its neighbours, followed by the node count.
pub fn handle_dump_command(options: &ImportOptions) -> Result<()> {
    let graph = import_graph(options)?;
    print!("{}", graph.dump());
    println!("total nodes: {}", graph.len());
    Ok(())
}
