//! Common test utilities and fixture helpers.

use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use roadnet_lib::{parse_response, Graph, Node};

/// Serialises tests that touch process-wide environment variables.
#[allow(dead_code)]
pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Path to the fixtures directory shared with the CLI tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

#[allow(dead_code)]
pub fn overpass_fixture() -> PathBuf {
    fixtures_dir().join("overpass_sample.json")
}

/// Road graph built from the recorded Overpass response.
#[allow(dead_code)]
pub fn fixture_graph() -> Graph {
    let raw = std::fs::read_to_string(overpass_fixture()).expect("read overpass fixture");
    parse_response(&raw).expect("fixture parses")
}

/// Graph from `(a, b, distance)` links between nodes named in `ids`.
#[allow(dead_code)]
pub fn graph_from_links(ids: &[&str], links: &[(&str, &str, f64)]) -> Graph {
    let mut graph = Graph::with_capacity(ids.len());
    for id in ids {
        graph.add_node(Node::new(*id, 0.0, 0.0));
    }
    for (a, b, distance) in links {
        graph.connect(a, b, *distance);
    }
    graph
}
