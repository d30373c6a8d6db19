use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use roadnet_lib::{distance_meters, Coordinate, Graph, Node, ShortestPath};
use std::hint::black_box;

const GRID_SIDE: usize = 60;
const SPACING_DEGREES: f64 = 0.0005;

fn grid_id(row: usize, col: usize) -> String {
    format!("{row}:{col}")
}

/// Street grid with a slight jitter in latitude so ties are rare.
fn build_grid() -> Graph {
    let mut graph = Graph::with_capacity(GRID_SIDE * GRID_SIDE);
    let mut coords = Vec::with_capacity(GRID_SIDE * GRID_SIDE);
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let jitter = ((row * 31 + col * 17) % 7) as f64 * 0.00002;
            let coord = Coordinate::new(
                34.48 + row as f64 * SPACING_DEGREES + jitter,
                136.71 + col as f64 * SPACING_DEGREES,
            );
            graph.add_node(Node::new(grid_id(row, col), coord.lat, coord.lon));
            coords.push(coord);
        }
    }

    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let here = coords[row * GRID_SIDE + col];
            if col + 1 < GRID_SIDE {
                let east = coords[row * GRID_SIDE + col + 1];
                graph.connect(
                    &grid_id(row, col),
                    &grid_id(row, col + 1),
                    distance_meters(here, east),
                );
            }
            if row + 1 < GRID_SIDE {
                let north = coords[(row + 1) * GRID_SIDE + col];
                graph.connect(
                    &grid_id(row, col),
                    &grid_id(row + 1, col),
                    distance_meters(here, north),
                );
            }
        }
    }
    graph
}

static GRID: Lazy<Graph> = Lazy::new(build_grid);

fn benchmark_pathfinding(c: &mut Criterion) {
    let graph = &*GRID;
    let search = ShortestPath::new(graph);
    let corner = grid_id(0, 0);
    let opposite = grid_id(GRID_SIDE - 1, GRID_SIDE - 1);
    let centre = grid_id(GRID_SIDE / 2, GRID_SIDE / 2);

    c.bench_function("dijkstra_grid_corner_to_corner", |b| {
        b.iter(|| {
            let path = search.calc(&corner, &opposite).expect("route exists");
            black_box(path.len())
        });
    });

    c.bench_function("dijkstra_grid_corner_to_centre", |b| {
        b.iter(|| {
            let path = search.calc(&corner, &centre).expect("route exists");
            black_box(path.len())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
