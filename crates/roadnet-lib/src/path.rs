use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::heap::Heap;

/// Best-known distance from the query source to one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distance {
    pub id: NodeId,
    /// Cumulative distance from the source.
    pub distance: f64,
    /// Predecessor on the best-known path; `None` for the source.
    pub parent: Option<NodeId>,
}

/// Per-query state of a graph node.
///
/// `Unreached` stands in for a "no path known yet" distance. A record lives
/// in exactly one place: the heap while queued, this label once settled.
#[derive(Debug, Clone)]
enum Label {
    Unreached,
    Queued,
    Settled(Distance),
}

/// Dijkstra shortest path search over a borrowed [`Graph`].
///
/// The graph is read-only for the lifetime of the searcher and may serve any
/// number of sequential queries.
#[derive(Debug, Clone, Copy)]
pub struct ShortestPath<'g> {
    graph: &'g Graph,
}

impl<'g> ShortestPath<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Compute the least-cost path from `source` to `target`.
    ///
    /// The returned records run from the source to the target inclusive, each
    /// carrying the cumulative distance from the source.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingNode`] when `source` is not in the graph.
    /// - [`Error::Unreachable`] when the search exhausts without settling
    ///   `target`.
    /// - [`Error::DanglingEdge`] when an edge points outside the graph.
    pub fn calc(&self, source: &str, target: &str) -> Result<Vec<Distance>> {
        let graph = self.graph;
        let mut labels = vec![Label::Unreached; graph.len()];

        let source_slot = graph.slot(source).ok_or_else(|| Error::MissingNode {
            id: source.to_string(),
        })?;

        let mut heap = Heap::new(|d: &Distance| d.distance, |d: &Distance| d.id.clone());
        labels[source_slot] = Label::Queued;
        heap.push(Distance {
            id: source.to_string(),
            distance: 0.0,
            parent: None,
        });

        let mut settled = 0usize;
        loop {
            let Some(current) = heap.pop() else {
                debug!(source, target, settled, "search exhausted");
                return Err(Error::Unreachable {
                    start: source.to_string(),
                    goal: target.to_string(),
                });
            };
            settled += 1;

            let slot = graph
                .slot(&current.id)
                .ok_or_else(|| Error::MissingNode {
                    id: current.id.clone(),
                })?;
            let node = graph.node_at(slot).ok_or_else(|| Error::MissingNode {
                id: current.id.clone(),
            })?;

            if current.id == target {
                labels[slot] = Label::Settled(current);
                break;
            }

            for edge in node.adjacents() {
                let neighbour =
                    graph
                        .slot(&edge.destination)
                        .ok_or_else(|| Error::DanglingEdge {
                            from: current.id.clone(),
                            to: edge.destination.clone(),
                        })?;
                let candidate = current.distance + edge.distance;

                let queued = match labels[neighbour] {
                    Label::Unreached => false,
                    Label::Queued => true,
                    // Settled distances are final under non-negative weights.
                    Label::Settled(_) => continue,
                };

                if !queued {
                    labels[neighbour] = Label::Queued;
                    heap.push(Distance {
                        id: edge.destination.clone(),
                        distance: candidate,
                        parent: Some(current.id.clone()),
                    });
                    continue;
                }

                let improves = heap
                    .get(&edge.destination)
                    .is_some_and(|queued| candidate < queued.distance);
                if improves {
                    heap.update(&edge.destination, |queued| {
                        queued.distance = candidate;
                        queued.parent = Some(current.id.clone());
                    });
                }
            }

            labels[slot] = Label::Settled(current);
        }

        debug!(source, target, settled, "search settled target");
        Ok(unwind(graph, &labels, target))
    }
}

fn unwind(graph: &Graph, labels: &[Label], target: &str) -> Vec<Distance> {
    let mut path = Vec::new();
    let mut current = Some(target.to_string());
    while let Some(id) = current {
        let record = graph.slot(&id).and_then(|slot| match &labels[slot] {
            Label::Settled(record) => Some(record),
            _ => None,
        });
        let Some(record) = record else {
            break;
        };
        current = record.parent.clone();
        path.push(record.clone());
    }
    path.reverse();
    path
}
