use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

use tracing::warn;

/// Identifier of a node in the road graph.
///
/// Importers stringify whatever id scheme the upstream data uses (OSM ids are
/// integers), so the graph only relies on equality and hashing.
pub type NodeId = String;

/// Directed adjacency entry stored on the source node.
///
/// An edge carries no reference back to its source and is meaningless outside
/// the owning node's adjacency list.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub destination: NodeId,
    pub distance: f64,
}

/// Intersection or shape point of the road network.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    lat: f64,
    lon: f64,
    tags: BTreeSet<String>,
    adjacency: Vec<Edge>,
    // destination id -> position in `adjacency`
    lookup: HashMap<NodeId, usize>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            tags: BTreeSet::new(),
            adjacency: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Attach auxiliary tags (for example `highway=residential`).
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.tags
    }

    /// Adjacent edges in the order they were added.
    pub fn adjacents(&self) -> &[Edge] {
        &self.adjacency
    }

    /// Add an edge towards `destination`.
    ///
    /// Returns `false` without touching the adjacency list when the distance
    /// is absent, when `destination` is already adjacent (the first distance
    /// wins), or when the distance is negative or NaN.
    pub fn add_adjacent(&mut self, destination: impl Into<NodeId>, distance: Option<f64>) -> bool {
        let Some(distance) = distance else {
            return false;
        };
        let destination = destination.into();
        if self.lookup.contains_key(&destination) {
            return false;
        }
        if distance.is_nan() || distance < 0.0 {
            warn!(
                node = %self.id,
                destination = %destination,
                distance,
                "ignoring edge with invalid distance"
            );
            return false;
        }

        self.lookup.insert(destination.clone(), self.adjacency.len());
        self.adjacency.push(Edge {
            destination,
            distance,
        });
        true
    }

    /// Distance to an adjacent node, if `destination` is adjacent.
    pub fn distance_to(&self, destination: &str) -> Option<f64> {
        self.lookup
            .get(destination)
            .map(|&slot| self.adjacency[slot].distance)
    }

    pub fn is_adjacent(&self, destination: &str) -> bool {
        self.distance_to(destination).is_some()
    }
}

/// Road graph: the set of nodes, each owning its adjacency list.
///
/// Nodes are kept in an arena in insertion order; the arena slot is a stable
/// integer handle that per-query bookkeeping can index by.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known node count.
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            index: HashMap::with_capacity(node_count),
        }
    }

    /// Add `node` to the graph. The first node stored under an id wins; later
    /// inserts with the same id are ignored and return `false`.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.index.contains_key(node.id()) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.slot(id).map(|slot| &self.nodes[slot])
    }

    /// Mutable access used while importing; the graph must not change while
    /// a shortest path query borrows it.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        let slot = self.slot(id)?;
        Some(&mut self.nodes[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Link two existing nodes in both directions with the same distance.
    ///
    /// Returns `true` when at least one direction was added.
    pub fn connect(&mut self, a: &str, b: &str, distance: f64) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        let forward = self
            .get_mut(a)
            .map(|node| node.add_adjacent(b, Some(distance)))
            .unwrap_or(false);
        let backward = self
            .get_mut(b)
            .map(|node| node.add_adjacent(a, Some(distance)))
            .unwrap_or(false);
        forward || backward
    }

    /// Arena slot of the node with `id`.
    pub fn slot(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node_at(&self, slot: usize) -> Option<&Node> {
        self.nodes.get(slot)
    }

    /// Iterate over nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of directed adjacency entries across all nodes.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.adjacency.len()).sum()
    }

    /// Human-readable listing of every node and its neighbours, for debugging.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let _ = writeln!(
                out,
                "node id: {}, (lat, lon) = ({}, {})",
                node.id, node.lat, node.lon
            );
            for edge in &node.adjacency {
                if let Some(neighbour) = self.get(&edge.destination) {
                    let _ = writeln!(
                        out,
                        "    adj id: {}, (lat, lon) = ({}, {}), dist = {}",
                        edge.destination, neighbour.lat, neighbour.lon, edge.distance
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_adjacent_keeps_first_distance() {
        let mut node = Node::new("a", 0.0, 0.0);
        assert!(node.add_adjacent("b", Some(3.0)));
        assert!(!node.add_adjacent("b", Some(1.0)));

        assert_eq!(node.adjacents().len(), 1);
        assert_eq!(node.distance_to("b"), Some(3.0));
    }

    #[test]
    fn absent_or_invalid_distance_is_ignored() {
        let mut node = Node::new("a", 0.0, 0.0);
        assert!(!node.add_adjacent("b", None));
        assert!(!node.add_adjacent("c", Some(-1.0)));
        assert!(!node.add_adjacent("d", Some(f64::NAN)));

        assert!(node.adjacents().is_empty());
        assert!(!node.is_adjacent("b"));
    }

    #[test]
    fn adjacency_preserves_insertion_order() {
        let mut node = Node::new("a", 0.0, 0.0);
        node.add_adjacent("z", Some(1.0));
        node.add_adjacent("m", Some(2.0));
        node.add_adjacent("b", Some(3.0));

        let order: Vec<_> = node
            .adjacents()
            .iter()
            .map(|edge| edge.destination.as_str())
            .collect();
        assert_eq!(order, vec!["z", "m", "b"]);
    }

    #[test]
    fn first_node_under_an_id_wins() {
        let mut graph = Graph::new();
        assert!(graph.add_node(Node::new("a", 1.0, 2.0)));
        assert!(!graph.add_node(Node::new("a", 9.0, 9.0)));

        assert_eq!(graph.len(), 1);
        let node = graph.get("a").expect("node stored");
        assert_eq!((node.lat(), node.lon()), (1.0, 2.0));
        assert!(graph.contains("a"));
        assert!(graph.get("b").is_none());
    }

    #[test]
    fn connect_adds_both_directions() {
        let mut graph = Graph::new();
        graph.add_node(Node::new("a", 0.0, 0.0));
        graph.add_node(Node::new("b", 0.0, 0.0));

        assert!(graph.connect("a", "b", 5.0));
        assert!(!graph.connect("a", "missing", 1.0));

        assert_eq!(graph.get("a").unwrap().distance_to("b"), Some(5.0));
        assert_eq!(graph.get("b").unwrap().distance_to("a"), Some(5.0));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn dump_lists_neighbours() {
        let mut graph = Graph::new();
        graph.add_node(Node::new("a", 1.0, 2.0));
        graph.add_node(Node::new("b", 3.0, 4.0));
        graph.connect("a", "b", 7.5);

        let dump = graph.dump();
        assert!(dump.contains("node id: a, (lat, lon) = (1, 2)"));
        assert!(dump.contains("    adj id: b, (lat, lon) = (3, 4), dist = 7.5"));
    }
}
