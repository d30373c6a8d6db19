use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use roadnet_cli::output::OutputFormat;
use roadnet_lib::{BoundingBox, ImportOptions, OverpassQuery};

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Road network import and shortest path utilities")]
struct Cli {
    /// Read an Overpass JSON document from disk instead of querying the API.
    #[arg(long)]
    source_file: Option<PathBuf>,

    /// Overpass interpreter URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// Bounding box as south,west,north,east in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    bbox: Option<BoundingBox>,

    /// Tag key a way must carry to be imported.
    #[arg(long, default_value = "highway")]
    way_filter: String,

    /// Always query the API and skip the response cache.
    #[arg(long)]
    no_cache: bool,

    /// Override the response cache directory.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Output format for command results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the shortest path between two node ids.
    Route {
        /// Starting node id.
        #[arg(long = "from")]
        from: String,
        /// Destination node id.
        #[arg(long = "to")]
        to: String,
    },
    /// Print every node with its neighbours.
    Dump,
    /// Import the road data (populating the cache) and report its size.
    Fetch,
}

impl Cli {
    fn import_options(&self) -> ImportOptions {
        ImportOptions {
            query: OverpassQuery::new(self.bbox.unwrap_or_default())
                .with_way_filter(self.way_filter.clone()),
            endpoint: self.endpoint.clone(),
            source_file: self.source_file.clone(),
            use_cache: !self.no_cache,
            cache_dir: self.cache_dir.clone(),
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let options = cli.import_options();

    match &cli.command {
        Command::Route { from, to } => {
            commands::route::handle_route_command(&options, cli.format, from, to)
        }
        Command::Dump => commands::dump::handle_dump_command(&options),
        Command::Fetch => commands::fetch::handle_fetch_command(&options, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
