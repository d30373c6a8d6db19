//! Road data import from the Overpass API.
//!
//! Responses are requested as `out geom` JSON so every way carries its node
//! ids together with their coordinates. Consecutive nodes on a way become
//! symmetric edges weighted by geodesic distance.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::BaseDirs;
use reqwest::blocking::Client;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geodesy::{distance_meters, Coordinate};
use crate::graph::{Graph, Node};

pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";
const ENDPOINT_ENV: &str = "ROADNET_OVERPASS_URL";
const SOURCE_ENV: &str = "ROADNET_OVERPASS_SOURCE";
const CACHE_DIR_ENV: &str = "ROADNET_CACHE_DIR";
const CACHE_DIR_NAME: &str = "roadnet";
const DEFAULT_WAY_FILTER: &str = "highway";

/// Geographic bounding box in Overpass order: south, west, north, east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            south: 34.48756,
            west: 136.71216,
            north: 34.48906,
            east: 136.71424,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.south, self.west, self.north, self.east
        )
    }
}

impl FromStr for BoundingBox {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidBoundingBox {
            value: value.to_string(),
        };

        let parts = value
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        let [south, west, north, east] = parts[..] else {
            return Err(invalid());
        };

        let lat_ok = |lat: f64| (-90.0..=90.0).contains(&lat);
        let lon_ok = |lon: f64| (-180.0..=180.0).contains(&lon);
        if !(lat_ok(south) && lat_ok(north) && lon_ok(west) && lon_ok(east))
            || south > north
            || west > east
        {
            return Err(invalid());
        }

        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }
}

/// Overpass QL request for the ways inside a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassQuery {
    pub bbox: BoundingBox,
    /// Tag key a way must carry to be imported.
    pub way_filter: String,
}

impl Default for OverpassQuery {
    fn default() -> Self {
        Self::new(BoundingBox::default())
    }
}

impl OverpassQuery {
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            way_filter: DEFAULT_WAY_FILTER.to_string(),
        }
    }

    pub fn with_way_filter(mut self, filter: impl Into<String>) -> Self {
        self.way_filter = filter.into();
        self
    }

    /// Render the query in Overpass QL.
    pub fn to_ql(&self) -> String {
        format!(
            "[out:json][bbox:{}];way[\"{}\"];out geom;",
            self.bbox, self.way_filter
        )
    }
}

/// Top-level Overpass JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// One Overpass element. Only ways are accepted by [`build_graph`]; entries
/// without a `type` are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub nodes: Vec<i64>,
    /// Coordinates parallel to `nodes`; Overpass emits `null` for points it
    /// could not resolve.
    #[serde(default)]
    pub geometry: Vec<Option<Coordinate>>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Decode an Overpass JSON document and build the road graph from it.
pub fn parse_response(json: &str) -> Result<Graph> {
    let response: OverpassResponse = serde_json::from_str(json)?;
    build_graph(&response)
}

/// Convert decoded Overpass ways into a graph.
///
/// Nodes shared between ways keep the coordinates of their first occurrence
/// and accumulate adjacency and tags from every way they belong to.
pub fn build_graph(response: &OverpassResponse) -> Result<Graph> {
    let mut graph = Graph::new();

    for element in &response.elements {
        if element.kind.is_empty() {
            debug!(id = element.id, "skipping element without a type");
            continue;
        }
        if element.kind != "way" {
            return Err(Error::UnexpectedElement {
                kind: element.kind.clone(),
            });
        }
        if element.nodes.len() != element.geometry.len() {
            return Err(Error::GeometryMismatch {
                way: element.id,
                nodes: element.nodes.len(),
                points: element.geometry.len(),
            });
        }
        add_way(&mut graph, element);
    }

    info!(
        elements = response.elements.len(),
        nodes = graph.len(),
        edges = graph.edge_count(),
        "built road graph"
    );
    Ok(graph)
}

fn add_way(graph: &mut Graph, way: &Element) {
    let tags: Vec<String> = way
        .tags
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();

    let mut previous: Option<(String, Coordinate)> = None;
    for (osm_id, point) in way.nodes.iter().zip(&way.geometry) {
        let Some(point) = *point else {
            debug!(way = way.id, node = osm_id, "skipping node without geometry");
            previous = None;
            continue;
        };

        let id = osm_id.to_string();
        graph.add_node(Node::new(id.as_str(), point.lat, point.lon));
        if let Some(node) = graph.get_mut(&id) {
            node.tags_mut().extend(tags.iter().cloned());
        }

        if let Some((previous_id, previous_point)) = &previous {
            if *previous_id != id {
                graph.connect(previous_id, &id, distance_meters(*previous_point, point));
            }
        }
        previous = Some((id, point));
    }
}

/// Blocking client for an Overpass interpreter endpoint.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    endpoint: String,
}

impl OverpassClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue `query` and return the raw JSON body.
    pub fn fetch_raw(&self, query: &OverpassQuery) -> Result<String> {
        debug!(endpoint = %self.endpoint, query = %query.to_ql(), "requesting road data");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query.to_ql())])
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }

    /// Issue `query` and build the road graph from the response.
    pub fn fetch(&self, query: &OverpassQuery) -> Result<Graph> {
        parse_response(&self.fetch_raw(query)?)
    }
}

fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(user_agent())
        .build()
        .map_err(Error::Http)
}

fn user_agent() -> String {
    format!("roadnet-lib/{version}", version = env!("CARGO_PKG_VERSION"))
}

/// Where road data comes from and how it is cached.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub query: OverpassQuery,
    /// Overpass interpreter URL; falls back to `ROADNET_OVERPASS_URL`, then
    /// [`DEFAULT_ENDPOINT`].
    pub endpoint: Option<String>,
    /// Local Overpass JSON document used instead of the network.
    pub source_file: Option<PathBuf>,
    pub use_cache: bool,
    /// Cache directory; falls back to `ROADNET_CACHE_DIR`, then the OS cache
    /// directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            query: OverpassQuery::default(),
            endpoint: None,
            source_file: None,
            use_cache: true,
            cache_dir: None,
        }
    }
}

/// Load the road graph described by `options`.
///
/// Sources are tried in order: `options.source_file`, the file named by
/// `ROADNET_OVERPASS_SOURCE`, a cached response, and finally a live Overpass
/// request whose body is cached for later runs. A live body is only cached
/// once it has been converted into a graph, so a rate-limit page or error
/// document is never replayed from the cache.
pub fn load_road_graph(options: &ImportOptions) -> Result<Graph> {
    let raw = load_raw(options)?;
    let graph = parse_response(&raw.body)?;
    if let Some(path) = raw.cache_to {
        write_atomic(&path, &raw.body)?;
        debug!(path = %path.display(), "cached road data");
    }
    Ok(graph)
}

/// Response body plus the cache file it should be written to once it parses.
struct RawResponse {
    body: String,
    cache_to: Option<PathBuf>,
}

impl RawResponse {
    fn stored(body: String) -> Self {
        Self {
            body,
            cache_to: None,
        }
    }
}

fn load_raw(options: &ImportOptions) -> Result<RawResponse> {
    if let Some(path) = &options.source_file {
        info!(path = %path.display(), "using local road data");
        return read_local(path).map(RawResponse::stored);
    }

    if let Some(source) = env::var_os(SOURCE_ENV) {
        let override_path = PathBuf::from(source);
        info!(path = %override_path.display(), "using local road data override");
        return read_local(&override_path).map(RawResponse::stored);
    }

    let client = OverpassClient::new(resolve_endpoint(options.endpoint.as_deref()))?;
    if !options.use_cache {
        return client.fetch_raw(&options.query).map(RawResponse::stored);
    }

    let cache_dir = match &options.cache_dir {
        Some(dir) => dir.clone(),
        None => road_cache_dir()?,
    };
    fs::create_dir_all(&cache_dir)?;

    let cached = cache_dir.join(cache_file_name(&options.query));
    if cached.exists() {
        debug!(path = %cached.display(), "using cached road data");
        return Ok(RawResponse::stored(fs::read_to_string(&cached)?));
    }

    info!(
        endpoint = %client.endpoint(),
        bbox = %options.query.bbox,
        "fetching road data"
    );
    Ok(RawResponse {
        body: client.fetch_raw(&options.query)?,
        cache_to: Some(cached),
    })
}

fn resolve_endpoint(explicit: Option<&str>) -> String {
    if let Some(endpoint) = explicit {
        return endpoint.to_string();
    }
    env::var(ENDPOINT_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

fn read_local(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

fn road_cache_dir() -> Result<PathBuf> {
    if let Some(override_dir) = env::var_os(CACHE_DIR_ENV) {
        return Ok(PathBuf::from(override_dir));
    }

    let dirs = BaseDirs::new().ok_or(Error::CacheDirsUnavailable)?;
    Ok(dirs.cache_dir().join(CACHE_DIR_NAME))
}

fn cache_file_name(query: &OverpassQuery) -> String {
    format!(
        "overpass-{}-{}.json",
        sanitize_component(&query.way_filter),
        sanitize_component(&query.bbox.to_string())
    )
}

fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}

fn write_atomic(destination: &Path, contents: &str) -> Result<()> {
    let parent = destination.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    if destination.exists() {
        fs::remove_file(destination)?;
    }
    tmp.persist(destination).map_err(|err| err.error)?;
    Ok(())
}
