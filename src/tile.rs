use grid_util::point::Point;

/// Sentinel f-cost for a tile the search has not visited yet.
pub const UNVISITED: i32 = i32::MAX;

/// The semantic state of a single grid cell. Exactly one kind holds at any
/// time; at most one tile in a grid is [Start](TileKind::Start) and at most
/// one is [End](TileKind::End).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileKind {
    #[default]
    Empty,
    Start,
    End,
    Blocked,
    Pathed,
}

impl TileKind {
    /// Whether the search may step onto a tile of this kind.
    pub fn walkable(self) -> bool {
        self != TileKind::Blocked
    }

    /// Whether this tile is one of the two endpoints.
    pub fn endpoint(self) -> bool {
        matches!(self, TileKind::Start | TileKind::End)
    }
}

/// One grid cell: an immutable position, a [TileKind] and the per-search
/// scratch fields the A* run writes in place. The scratch fields are only
/// meaningful during/after a search run and are wiped by
/// [TileGrid::reset_search_scratch](crate::TileGrid::reset_search_scratch).
///
/// `parent` is an index into the owning grid's tile vector rather than a
/// reference, so the back-chain stays valid however tiles are borrowed.
#[derive(Clone, Debug)]
pub struct Tile {
    pub position: Point,
    pub kind: TileKind,
    pub g_cost: i32,
    pub h_cost: i32,
    pub f_cost: i32,
    pub parent: Option<usize>,
}

impl Tile {
    pub(crate) fn new(position: Point) -> Tile {
        Tile {
            position,
            kind: TileKind::Empty,
            g_cost: 0,
            h_cost: 0,
            f_cost: UNVISITED,
            parent: None,
        }
    }

    pub(crate) fn clear_scratch(&mut self) {
        self.g_cost = 0;
        self.h_cost = 0;
        self.f_cost = UNVISITED;
        self.parent = None;
    }
}

/// The modal flag of an in-progress drag gesture. The first cell touched
/// locks the mode for the whole gesture; see
/// [TileGrid::apply_streak_edit](crate::TileGrid::apply_streak_edit).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreakMode {
    #[default]
    Inactive,
    PlacingObstacles,
    ClearingObstacles,
}
