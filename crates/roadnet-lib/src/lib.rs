//! Road network library entry points.
//!
//! This crate imports OpenStreetMap road data from the Overpass API, holds it
//! as an in-memory graph, and answers single-pair shortest path queries with
//! Dijkstra's algorithm over an indexed binary heap.
//!
//! Typical use: [`load_road_graph`] with an [`ImportOptions`], then
//! [`ShortestPath::calc`] between two OSM node ids, then [`PathSummary`] for
//! display.

#![deny(warnings)]

pub mod error;
pub mod geodesy;
pub mod graph;
pub mod heap;
pub mod output;
pub mod overpass;
pub mod path;

pub use error::{Error, Result};
pub use geodesy::{distance_meters, Coordinate};
pub use graph::{Edge, Graph, Node, NodeId};
pub use heap::{Comparator, Heap, MaxFirst, MinFirst, Sift};
pub use output::{PathStep, PathSummary};
pub use overpass::{
    build_graph, load_road_graph, parse_response, BoundingBox, ImportOptions, OverpassClient,
    OverpassQuery, OverpassResponse,
};
pub use path::{Distance, ShortestPath};
