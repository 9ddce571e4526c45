use core::fmt;

use grid_util::point::Point;
use log::debug;
use petgraph::unionfind::UnionFind;

use crate::astar;
use crate::tile::{StreakMode, Tile, TileKind};

/// Errors raised when constructing a [TileGrid].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// One or both dimensions were zero.
    ZeroDimension { width: usize, height: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { width, height } => {
                write!(f, "grid dimensions must be positive, got {width}x{height}")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// An editable tile map with a built-in pathfinding session.
///
/// [TileGrid] owns the tiles (row-major `Vec<Tile>`, fixed size) together
/// with all session state: the current start/end tiles, the modal
/// [StreakMode] of an in-progress drag gesture, the most recent path, and a
/// [UnionFind] over walkable cells used to reject unreachable queries without
/// flood-filling. Edit entry points ([place_start](Self::place_start),
/// [place_end](Self::place_end), [apply_streak_edit](Self::apply_streak_edit))
/// re-run the search whenever a mutation lands while both endpoints exist,
/// so a renderer can always read back a consistent grid and path.
#[derive(Clone, Debug)]
pub struct TileGrid {
    tiles: Vec<Tile>,
    width: usize,
    height: usize,
    start: Option<usize>,
    end: Option<usize>,
    streak: StreakMode,
    last_path: Option<Vec<Point>>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl TileGrid {
    /// Creates a `width` x `height` grid of [Empty](TileKind::Empty) tiles.
    /// The grid is never resized afterwards.
    pub fn new(width: usize, height: usize) -> Result<TileGrid, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        let tiles = (0..width * height)
            .map(|ix| Tile::new(Point::new((ix % width) as i32, (ix / width) as i32)))
            .collect();
        let mut grid = TileGrid {
            tiles,
            width,
            height,
            start: None,
            end: None,
            streak: StreakMode::Inactive,
            last_path: None,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All tiles in row-major order, for rendering.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The kind of the tile at `pos`, or [None] if out of bounds.
    pub fn tile_kind(&self, pos: Point) -> Option<TileKind> {
        self.index_of(&pos).map(|ix| self.tiles[ix].kind)
    }

    /// Position of the current start tile, if one has been placed.
    pub fn start(&self) -> Option<Point> {
        self.start.map(|ix| self.tiles[ix].position)
    }

    /// Position of the current end tile, if one has been placed.
    pub fn end(&self) -> Option<Point> {
        self.end.map(|ix| self.tiles[ix].position)
    }

    pub fn streak_mode(&self) -> StreakMode {
        self.streak
    }

    /// The most recent search result. [None] means no search has run yet;
    /// an empty slice means the last search found no path.
    pub fn last_path(&self) -> Option<&[Point]> {
        self.last_path.as_deref()
    }

    fn index_of(&self, pos: &Point) -> Option<usize> {
        if pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
        {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    pub(crate) fn tile(&self, ix: usize) -> &Tile {
        &self.tiles[ix]
    }

    pub(crate) fn tile_mut(&mut self, ix: usize) -> &mut Tile {
        &mut self.tiles[ix]
    }

    pub(crate) fn start_ix(&self) -> Option<usize> {
        self.start
    }

    pub(crate) fn end_ix(&self) -> Option<usize> {
        self.end
    }

    /// The up-to-4 in-bounds, non-blocked neighbors of `pos` as tile indices,
    /// in fixed up/down/left/right order so search tie-breaking stays
    /// deterministic.
    pub(crate) fn neighbors4(&self, pos: &Point) -> Vec<usize> {
        [
            Point::new(pos.x, pos.y - 1),
            Point::new(pos.x, pos.y + 1),
            Point::new(pos.x - 1, pos.y),
            Point::new(pos.x + 1, pos.y),
        ]
        .into_iter()
        .filter_map(|p| self.index_of(&p))
        .filter(|&ix| self.tiles[ix].kind.walkable())
        .collect()
    }

    /// Rewrites the kind of one tile, keeping the connected components in
    /// sync: blocking a tile may split a component (flagged dirty and
    /// regenerated lazily), unblocking one joins it to its walkable
    /// neighbors.
    fn set_kind(&mut self, ix: usize, kind: TileKind) {
        let was = self.tiles[ix].kind;
        if was == kind {
            return;
        }
        self.tiles[ix].kind = kind;
        if kind == TileKind::Blocked {
            self.components_dirty = true;
        } else if was == TileKind::Blocked {
            let pos = self.tiles[ix].position;
            for n_ix in self.neighbors4(&pos) {
                self.components.union(ix, n_ix);
            }
        }
    }

    /// Moves the start marker to `pos`, demoting any previous start tile to
    /// [Empty](TileKind::Empty). A position that is out of bounds or holds
    /// the end tile is left untouched. Returns whether an existing start
    /// tile was relocated.
    pub fn set_start(&mut self, pos: Point) -> bool {
        let Some(ix) = self.index_of(&pos) else {
            return false;
        };
        if self.tiles[ix].kind == TileKind::End {
            return false;
        }
        let relocated = match self.start {
            Some(old) if old != ix => {
                self.set_kind(old, TileKind::Empty);
                true
            }
            _ => false,
        };
        self.set_kind(ix, TileKind::Start);
        self.start = Some(ix);
        relocated
    }

    /// Counterpart of [set_start](Self::set_start), guarding against
    /// overwriting the start tile.
    pub fn set_end(&mut self, pos: Point) -> bool {
        let Some(ix) = self.index_of(&pos) else {
            return false;
        };
        if self.tiles[ix].kind == TileKind::Start {
            return false;
        }
        let relocated = match self.end {
            Some(old) if old != ix => {
                self.set_kind(old, TileKind::Empty);
                true
            }
            _ => false,
        };
        self.set_kind(ix, TileKind::End);
        self.end = Some(ix);
        relocated
    }

    /// Applies the streak rule to one touched cell. Returns whether the cell
    /// was mutated.
    fn apply_streak(&mut self, ix: usize, gesture_start: bool) -> bool {
        if gesture_start {
            self.streak = match self.tiles[ix].kind {
                TileKind::Empty | TileKind::Pathed => StreakMode::PlacingObstacles,
                TileKind::Blocked => StreakMode::ClearingObstacles,
                // Endpoints never start a streak; the gesture stays inert.
                TileKind::Start | TileKind::End => StreakMode::Inactive,
            };
        }
        match (self.tiles[ix].kind, self.streak) {
            (TileKind::Empty | TileKind::Pathed, StreakMode::PlacingObstacles) => {
                self.set_kind(ix, TileKind::Blocked);
                true
            }
            (TileKind::Blocked, StreakMode::ClearingObstacles) => {
                self.set_kind(ix, TileKind::Empty);
                true
            }
            _ => false,
        }
    }

    /// Wipes all per-search scratch state and demotes every
    /// [Pathed](TileKind::Pathed) tile back to [Empty](TileKind::Empty).
    /// Start/end/blocked classification is untouched.
    pub fn reset_search_scratch(&mut self) {
        for tile in &mut self.tiles {
            tile.clear_scratch();
            if tile.kind == TileKind::Pathed {
                tile.kind = TileKind::Empty;
            }
        }
    }

    /// Marks every non-endpoint tile on `path` as [Pathed](TileKind::Pathed).
    pub(crate) fn mark_path(&mut self, path: &[Point]) {
        for pos in path {
            if let Some(ix) = self.index_of(pos) {
                if !self.tiles[ix].kind.endpoint() {
                    self.tiles[ix].kind = TileKind::Pathed;
                }
            }
        }
    }

    /// Whether two tiles are on the same walkable component. Only meaningful
    /// once the components are up to date, see
    /// [update_components](Self::update_components).
    pub(crate) fn connected(&self, a_ix: usize, b_ix: usize) -> bool {
        self.components.equiv(a_ix, b_ix)
    }

    /// Checks whether `goal` can be reached from `start` at all, without
    /// searching. Out-of-bounds positions are unreachable.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        match (self.index_of(start), self.index_of(goal)) {
            (Some(a), Some(b)) => self.connected(a, b),
            _ => false,
        }
    }

    /// Regenerates the components if an edit has marked them dirty.
    pub fn update_components(&mut self) {
        if self.components_dirty {
            debug!("components are dirty: regenerating");
            self.generate_components();
        }
    }

    /// Rebuilds the [UnionFind] from scratch, unioning every walkable tile
    /// with its walkable right/down neighbors.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.width * self.height);
        self.components_dirty = false;
        for ix in 0..self.tiles.len() {
            if !self.tiles[ix].kind.walkable() {
                continue;
            }
            let pos = self.tiles[ix].position;
            let forward = [Point::new(pos.x + 1, pos.y), Point::new(pos.x, pos.y + 1)];
            for n in forward {
                if let Some(n_ix) = self.index_of(&n) {
                    if self.tiles[n_ix].kind.walkable() {
                        self.components.union(ix, n_ix);
                    }
                }
            }
        }
    }

    /// Runs a fresh search if both endpoints are present, storing the result
    /// as the last path.
    fn resolve(&mut self) -> Option<&[Point]> {
        if self.start.is_some() && self.end.is_some() {
            let path = astar::solve(self);
            self.last_path = Some(path);
        }
        self.last_path.as_deref()
    }

    /// Places (or moves) the start tile and re-solves. Out-of-bounds
    /// positions and the current end tile are rejected without mutation.
    /// Returns the current path; [None] means no search has run yet.
    pub fn place_start(&mut self, pos: Point) -> Option<&[Point]> {
        match self.index_of(&pos) {
            Some(ix) if self.tiles[ix].kind != TileKind::End => {
                self.set_start(pos);
                self.resolve()
            }
            _ => self.last_path.as_deref(),
        }
    }

    /// Places (or moves) the end tile and re-solves, mirroring
    /// [place_start](Self::place_start).
    pub fn place_end(&mut self, pos: Point) -> Option<&[Point]> {
        match self.index_of(&pos) {
            Some(ix) if self.tiles[ix].kind != TileKind::Start => {
                self.set_end(pos);
                self.resolve()
            }
            _ => self.last_path.as_deref(),
        }
    }

    /// Feeds one touched cell of a drag gesture through the streak rule and
    /// re-solves if the cell was mutated. The first touched cell
    /// (`gesture_start`) locks the gesture to placing or clearing obstacles;
    /// every later cell either applies that one edit kind or is left alone,
    /// so a single drag never both places and clears.
    pub fn apply_streak_edit(&mut self, pos: Point, gesture_start: bool) -> Option<&[Point]> {
        if let Some(ix) = self.index_of(&pos) {
            if self.apply_streak(ix, gesture_start) {
                return self.resolve();
            }
        }
        self.last_path.as_deref()
    }

    /// Ends the current drag gesture. No search is triggered.
    pub fn end_streak(&mut self) {
        self.streak = StreakMode::Inactive;
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = match self.tiles[y * self.width + x].kind {
                    TileKind::Empty => '.',
                    TileKind::Start => 'S',
                    TileKind::End => 'E',
                    TileKind::Blocked => '#',
                    TileKind::Pathed => '*',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(grid: &TileGrid, kind: TileKind) -> usize {
        grid.tiles().iter().filter(|t| t.kind == kind).count()
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            TileGrid::new(0, 5),
            Err(GridError::ZeroDimension { .. })
        ));
        assert!(matches!(
            TileGrid::new(5, 0),
            Err(GridError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn tiles_are_row_major_and_empty() {
        let grid = TileGrid::new(4, 3).unwrap();
        assert_eq!(grid.tiles().len(), 12);
        assert_eq!(grid.tiles()[5].position, Point::new(1, 1));
        assert!(grid.tiles().iter().all(|t| t.kind == TileKind::Empty));
    }

    #[test]
    fn at_most_one_start_and_one_end() {
        let mut grid = TileGrid::new(6, 6).unwrap();
        grid.place_start(Point::new(0, 0));
        grid.place_end(Point::new(5, 5));
        grid.place_start(Point::new(2, 2));
        grid.place_start(Point::new(4, 1));
        grid.place_end(Point::new(1, 4));
        assert_eq!(kinds(&grid, TileKind::Start), 1);
        assert_eq!(kinds(&grid, TileKind::End), 1);
        assert_eq!(grid.start(), Some(Point::new(4, 1)));
        assert_eq!(grid.end(), Some(Point::new(1, 4)));
    }

    #[test]
    fn moving_start_empties_old_cell() {
        let mut grid = TileGrid::new(4, 4).unwrap();
        assert!(!grid.set_start(Point::new(0, 0)));
        assert!(grid.set_start(Point::new(2, 2)));
        assert_eq!(grid.tile_kind(Point::new(0, 0)), Some(TileKind::Empty));
        assert_eq!(grid.tile_kind(Point::new(2, 2)), Some(TileKind::Start));
    }

    #[test]
    fn endpoints_do_not_overwrite_each_other() {
        let mut grid = TileGrid::new(4, 4).unwrap();
        grid.set_start(Point::new(1, 1));
        grid.set_end(Point::new(2, 2));
        assert!(!grid.set_start(Point::new(2, 2)));
        assert!(!grid.set_end(Point::new(1, 1)));
        assert_eq!(grid.tile_kind(Point::new(1, 1)), Some(TileKind::Start));
        assert_eq!(grid.tile_kind(Point::new(2, 2)), Some(TileKind::End));
        assert_eq!(grid.start(), Some(Point::new(1, 1)));
        assert_eq!(grid.end(), Some(Point::new(2, 2)));
    }

    #[test]
    fn out_of_bounds_edits_are_noops() {
        let mut grid = TileGrid::new(3, 3).unwrap();
        assert!(grid.place_start(Point::new(-1, 0)).is_none());
        assert!(grid.place_end(Point::new(0, 9)).is_none());
        assert!(grid.apply_streak_edit(Point::new(3, 3), true).is_none());
        assert!(grid.tiles().iter().all(|t| t.kind == TileKind::Empty));
        assert_eq!(grid.tile_kind(Point::new(5, 5)), None);
    }

    #[test]
    fn streak_mode_is_locked_by_first_cell() {
        let mut grid = TileGrid::new(5, 1).unwrap();
        // Pre-block the middle cell, then drag from (0,0) across it.
        grid.apply_streak_edit(Point::new(2, 0), true);
        grid.end_streak();
        assert_eq!(grid.tile_kind(Point::new(2, 0)), Some(TileKind::Blocked));

        grid.apply_streak_edit(Point::new(0, 0), true);
        assert_eq!(grid.streak_mode(), StreakMode::PlacingObstacles);
        grid.apply_streak_edit(Point::new(1, 0), false);
        grid.apply_streak_edit(Point::new(2, 0), false);
        grid.apply_streak_edit(Point::new(3, 0), false);
        grid.end_streak();
        // The pre-blocked cell was not cleared: the gesture only places.
        for x in 0..4 {
            assert_eq!(grid.tile_kind(Point::new(x, 0)), Some(TileKind::Blocked));
        }
        assert_eq!(grid.streak_mode(), StreakMode::Inactive);
    }

    #[test]
    fn clearing_streak_leaves_empty_cells_alone() {
        let mut grid = TileGrid::new(4, 1).unwrap();
        grid.apply_streak_edit(Point::new(0, 0), true);
        grid.apply_streak_edit(Point::new(2, 0), false);
        grid.end_streak();

        // Drag starting on a blocked cell clears blocked cells only.
        grid.apply_streak_edit(Point::new(0, 0), true);
        assert_eq!(grid.streak_mode(), StreakMode::ClearingObstacles);
        grid.apply_streak_edit(Point::new(1, 0), false);
        grid.apply_streak_edit(Point::new(2, 0), false);
        grid.end_streak();
        assert!(grid.tiles().iter().all(|t| t.kind == TileKind::Empty));
    }

    #[test]
    fn streak_starting_on_endpoint_is_inert() {
        let mut grid = TileGrid::new(4, 4).unwrap();
        grid.set_start(Point::new(0, 0));
        grid.apply_streak_edit(Point::new(0, 0), true);
        assert_eq!(grid.streak_mode(), StreakMode::Inactive);
        grid.apply_streak_edit(Point::new(1, 0), false);
        grid.end_streak();
        assert_eq!(grid.tile_kind(Point::new(0, 0)), Some(TileKind::Start));
        assert_eq!(grid.tile_kind(Point::new(1, 0)), Some(TileKind::Empty));
    }

    #[test]
    fn streak_never_touches_endpoints() {
        let mut grid = TileGrid::new(4, 1).unwrap();
        grid.set_start(Point::new(1, 0));
        grid.set_end(Point::new(3, 0));
        grid.apply_streak_edit(Point::new(0, 0), true);
        grid.apply_streak_edit(Point::new(1, 0), false);
        grid.apply_streak_edit(Point::new(3, 0), false);
        grid.end_streak();
        assert_eq!(grid.tile_kind(Point::new(0, 0)), Some(TileKind::Blocked));
        assert_eq!(grid.tile_kind(Point::new(1, 0)), Some(TileKind::Start));
        assert_eq!(grid.tile_kind(Point::new(3, 0)), Some(TileKind::End));
    }

    #[test]
    fn reset_scratch_clears_parents_and_path_marks() {
        let mut grid = TileGrid::new(5, 5).unwrap();
        grid.place_start(Point::new(0, 0));
        grid.place_end(Point::new(4, 4));
        assert!(kinds(&grid, TileKind::Pathed) > 0);
        grid.reset_search_scratch();
        assert_eq!(kinds(&grid, TileKind::Pathed), 0);
        assert!(grid.tiles().iter().all(|t| t.parent.is_none()));
        assert!(grid.tiles().iter().all(|t| t.f_cost == crate::tile::UNVISITED));
        // Classification survives the wipe.
        assert_eq!(kinds(&grid, TileKind::Start), 1);
        assert_eq!(kinds(&grid, TileKind::End), 1);
    }

    #[test]
    fn components_track_blocking_and_clearing() {
        let mut grid = TileGrid::new(3, 3).unwrap();
        // Wall down the middle column.
        for y in 0..3 {
            grid.apply_streak_edit(Point::new(1, y), y == 0);
        }
        grid.end_streak();
        grid.update_components();
        assert!(!grid.reachable(&Point::new(0, 1), &Point::new(2, 1)));

        // Clearing one wall cell reconnects the halves.
        grid.apply_streak_edit(Point::new(1, 1), true);
        grid.end_streak();
        grid.update_components();
        assert!(grid.reachable(&Point::new(0, 1), &Point::new(2, 1)));
    }

    #[test]
    fn display_renders_all_kinds() {
        let mut grid = TileGrid::new(3, 1).unwrap();
        grid.place_start(Point::new(0, 0));
        grid.place_end(Point::new(2, 0));
        let rendered = grid.to_string();
        assert_eq!(rendered, "S*E\n");
    }
}
