//! # tile_pathfinder
//!
//! An interactive grid pathfinder: a fixed-size 2D map of tiles on which a
//! caller places a start cell, an end cell and obstacle cells, while the
//! crate keeps the shortest obstacle-avoiding path between the endpoints up
//! to date after every edit. Movement is 4-directional with uniform step
//! cost; the search is [A*](https://en.wikipedia.org/wiki/A*_search_algorithm)
//! with a Manhattan heuristic. Pre-computes
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! to avoid flood-filling behaviour if no path exists.
//!
//! The crate is the engine only: an input layer feeds it discrete edit
//! events ([TileGrid::place_start], [TileGrid::place_end],
//! [TileGrid::apply_streak_edit]) and a render layer reads back the tile
//! grid and the latest path ([TileGrid::tiles], [TileGrid::last_path]).
//! Obstacle drags follow a streak rule: the first cell touched decides
//! whether the whole gesture places or clears obstacles, so a single drag
//! never does both.
//!
//! ```
//! use grid_util::point::Point;
//! use tile_pathfinder::TileGrid;
//!
//! let mut grid = TileGrid::new(8, 6).unwrap();
//! grid.place_start(Point::new(0, 0));
//! let path = grid.place_end(Point::new(7, 5)).unwrap();
//! assert_eq!(path.len(), 13);
//! ```

mod astar;
mod grid;
mod tile;

pub use astar::manhattan_distance;
pub use grid::{GridError, TileGrid};
pub use tile::{StreakMode, Tile, TileKind, UNVISITED};
