use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the roadnet library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested source node is not part of the graph.
    #[error("node {id} is missing from the graph")]
    MissingNode { id: String },

    /// The search exhausted every reachable node without settling the target.
    #[error("no route found between {start} and {goal}")]
    Unreachable { start: String, goal: String },

    /// An adjacency entry points at a node that was never added to the graph.
    #[error("node {from} has an edge to {to}, which is not in the graph")]
    DanglingEdge { from: String, to: String },

    /// A path summary was requested for a path with no steps.
    #[error("cannot summarise an empty path")]
    EmptyPath,

    /// Raised when the Overpass response contains an element other than a way.
    #[error("unexpected osm element: {kind}")]
    UnexpectedElement { kind: String },

    /// Raised when a way lists a different number of node ids and coordinates.
    #[error("way {way} has {nodes} node ids but {points} geometry points")]
    GeometryMismatch {
        way: i64,
        nodes: usize,
        points: usize,
    },

    /// Raised when a bounding box string cannot be parsed.
    #[error("invalid bounding box '{value}'; expected south,west,north,east")]
    InvalidBoundingBox { value: String },

    /// No suitable cache directory could be resolved for storing responses.
    #[error("failed to resolve cache directories for road data")]
    CacheDirsUnavailable,

    /// Raised when a local road data file does not exist.
    #[error("road data file not found at {path}")]
    SourceNotFound { path: PathBuf },

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
