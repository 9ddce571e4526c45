//! Best-first shortest-path search over a [TileGrid]: A* with a Manhattan
//! heuristic, 4-directional movement and uniform edge cost 1. Runs fresh on
//! every invocation; all per-tile bookkeeping lives in the tiles' scratch
//! fields and is wiped up front.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexSet;
use log::{info, warn};

use crate::grid::TileGrid;

type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Manhattan distance, the exact heuristic for uniform-cost 4-grids.
pub fn manhattan_distance(a: &Point, b: &Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// One open-list entry. The same tile may be pushed more than once when its
/// cost improves; stale entries are harmless because updates are gated on a
/// strict f-cost improvement.
struct OpenEntry {
    f_cost: i32,
    seq: usize,
    tile_ix: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.seq == other.seq
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Orders for a max-heap: smallest f-cost first, then earliest
        // insertion, which reproduces a front-to-back scan of an open list
        // that keeps the first minimum found.
        match other.f_cost.cmp(&self.f_cost) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            s => s,
        }
    }
}

/// Follows parent indices from the end tile back to the start and reverses
/// the chain into start-to-end order.
fn reconstruct_path(grid: &TileGrid, end_ix: usize) -> Vec<Point> {
    let mut path: Vec<Point> = itertools::unfold(Some(end_ix), |state| {
        let ix = (*state)?;
        let tile = grid.tile(ix);
        *state = tile.parent;
        Some(tile.position)
    })
    .collect();
    path.reverse();
    path
}

/// Computes the shortest path from the grid's start tile to its end tile,
/// marking every intermediate tile on the result as pathed. Returns an empty
/// vector when no path exists.
pub(crate) fn solve(grid: &mut TileGrid) -> Vec<Point> {
    grid.reset_search_scratch();
    let (Some(start_ix), Some(end_ix)) = (grid.start_ix(), grid.end_ix()) else {
        warn!("search invoked without both endpoints placed");
        return Vec::new();
    };
    if start_ix == end_ix {
        warn!("search invoked with coinciding endpoints");
        return Vec::new();
    }

    grid.update_components();
    let end_pos = grid.tile(end_ix).position;
    if !grid.connected(start_ix, end_ix) {
        info!(
            "{} and {} are on different components, skipping search",
            grid.tile(start_ix).position,
            end_pos
        );
        return Vec::new();
    }

    let mut open = BinaryHeap::new();
    let mut closed: FxIndexSet<usize> = FxIndexSet::default();
    let mut seq = 0;

    {
        let start = grid.tile_mut(start_ix);
        start.g_cost = 0;
        start.h_cost = manhattan_distance(&start.position, &end_pos);
        start.f_cost = start.h_cost;
    }
    open.push(OpenEntry {
        f_cost: grid.tile(start_ix).f_cost,
        seq,
        tile_ix: start_ix,
    });

    while let Some(OpenEntry {
        tile_ix: current_ix,
        ..
    }) = open.pop()
    {
        let current_pos = grid.tile(current_ix).position;
        let current_g = grid.tile(current_ix).g_cost;
        for neighbor_ix in grid.neighbors4(&current_pos) {
            if neighbor_ix == end_ix {
                // First goal found wins; with a consistent heuristic and
                // minimum-f selection this is a shortest path.
                grid.tile_mut(end_ix).parent = Some(current_ix);
                let path = reconstruct_path(grid, end_ix);
                grid.mark_path(&path);
                return path;
            }
            if closed.contains(&neighbor_ix) {
                continue;
            }
            let tentative_g = current_g + 1;
            let neighbor_pos = grid.tile(neighbor_ix).position;
            let tentative_h = manhattan_distance(&neighbor_pos, &end_pos);
            let tentative_f = tentative_g + tentative_h;
            let neighbor = grid.tile_mut(neighbor_ix);
            if tentative_f < neighbor.f_cost {
                neighbor.g_cost = tentative_g;
                neighbor.h_cost = tentative_h;
                neighbor.f_cost = tentative_f;
                neighbor.parent = Some(current_ix);
                seq += 1;
                open.push(OpenEntry {
                    f_cost: tentative_f,
                    seq,
                    tile_ix: neighbor_ix,
                });
            }
        }
        closed.insert(current_ix);
    }

    info!("open list exhausted without reaching the end tile");
    Vec::new()
}
