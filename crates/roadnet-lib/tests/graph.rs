mod common;

use common::fixture_graph;
use roadnet_lib::{Graph, Node};

#[test]
fn fixture_graph_has_expected_shape() {
    let graph = fixture_graph();

    assert_eq!(graph.len(), 7);
    // Five road segments in the connected component plus one isolated track.
    assert_eq!(graph.edge_count(), 12);
}

#[test]
fn fixture_adjacency_is_symmetric() {
    let graph = fixture_graph();

    for node in graph.nodes() {
        for edge in node.adjacents() {
            let neighbour = graph
                .get(&edge.destination)
                .expect("every edge points at a known node");
            assert_eq!(neighbour.distance_to(node.id()), Some(edge.distance));
        }
    }
}

#[test]
fn junction_nodes_merge_way_tags() {
    let graph = fixture_graph();
    let junction = graph.get("1301959960").expect("junction present");

    assert!(junction.tags().contains("highway=residential"));
    assert!(junction.tags().contains("highway=footway"));
    assert!(junction.tags().contains("name=Sample Street"));
    assert_eq!(junction.adjacents().len(), 3);
}

#[test]
fn nodes_iterate_in_import_order() {
    let graph = fixture_graph();
    let ids: Vec<_> = graph.nodes().map(|node| node.id().to_string()).collect();

    assert_eq!(
        ids,
        vec![
            "1301959953",
            "1301959960",
            "1301963286",
            "5743469002",
            "5743469010",
            "6000000001",
            "6000000002",
        ]
    );
}

#[test]
fn slots_are_stable_handles() {
    let mut graph = Graph::new();
    graph.add_node(Node::new("first", 0.0, 0.0));
    graph.add_node(Node::new("second", 1.0, 1.0));

    let slot = graph.slot("second").expect("slot assigned");
    assert_eq!(graph.node_at(slot).map(|node| node.id()), Some("second"));
    assert!(graph.slot("third").is_none());
    assert!(graph.node_at(99).is_none());
}

#[test]
fn dump_mentions_every_node() {
    let graph = fixture_graph();
    let dump = graph.dump();

    for node in graph.nodes() {
        assert!(dump.contains(&format!("node id: {},", node.id())));
    }
}
