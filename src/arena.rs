use crate::constants::*;
use crate::location::*;
use serde::{Deserialize, Serialize};

/// True if `(x, y)` lies inside the diamond-shaped arena.
pub fn in_arena_bounds(x: i16, y: i16) -> bool {
    let half = HALF_ARENA as i16;
    let size = ARENA_SIZE as i16;
    if !(0..size).contains(&y) {
        return false;
    }
    // Row width grows by two per row towards the middle and shrinks again.
    let row_size = if y < half { y + 1 } else { size - y };
    let start_x = half - row_size;
    let end_x = start_x + 2 * row_size - 1;
    (start_x..=end_x).contains(&x)
}

impl Location {
    pub fn is_in_arena(self) -> bool {
        in_arena_bounds(self.x() as i16, self.y() as i16)
    }
}

/// One of the four diagonal edges of the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Edge {
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
}

impl Edge {
    pub const ALL: [Edge; 4] = [
        Edge::TopRight,
        Edge::TopLeft,
        Edge::BottomLeft,
        Edge::BottomRight,
    ];

    /// Cells along the edge, ordered from the middle of the arena outwards.
    pub fn locations(self) -> Vec<Location> {
        (0..HALF_ARENA as u32)
            .map(|n| {
                let half = HALF_ARENA as u32;
                let top = ARENA_SIZE as u32 - 1 - n;
                match self {
                    Edge::TopRight => Location::from_coords(half + n, top),
                    Edge::TopLeft => Location::from_coords(half - 1 - n, top),
                    Edge::BottomLeft => Location::from_coords(half - 1 - n, n),
                    Edge::BottomRight => Location::from_coords(half + n, n),
                }
            })
            .collect()
    }

    /// Number of orthogonal steps between `loc` and the line this edge lies on.
    /// Zero for cells on the edge; never negative for cells inside the arena.
    pub fn distance_from(self, loc: Location) -> i16 {
        let x = loc.x() as i16;
        let y = loc.y() as i16;
        let half = HALF_ARENA as i16;
        let size = ARENA_SIZE as i16;
        match self {
            Edge::TopRight => (size - 1 + half) - (x + y),
            Edge::TopLeft => half - (y - x),
            Edge::BottomLeft => (x + y) - (half - 1),
            Edge::BottomRight => half - (x - y),
        }
    }

    pub fn contains(self, loc: Location) -> bool {
        loc.is_in_arena() && self.distance_from(loc) == 0
    }

    pub fn opposite(self) -> Edge {
        match self {
            Edge::TopRight => Edge::BottomLeft,
            Edge::TopLeft => Edge::BottomRight,
            Edge::BottomLeft => Edge::TopRight,
            Edge::BottomRight => Edge::TopLeft,
        }
    }
}

/// Which side of the table a unit or query belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct PlayerIndex(pub u8);

impl PlayerIndex {
    pub const ME: PlayerIndex = PlayerIndex(0);
    pub const ENEMY: PlayerIndex = PlayerIndex(1);

    pub fn opponent(self) -> PlayerIndex {
        PlayerIndex(1 - (self.0 & 1))
    }

    /// Edges this player may launch mobile units from.
    pub fn friendly_edges(self) -> [Edge; 2] {
        if self.0 == 0 {
            [Edge::BottomLeft, Edge::BottomRight]
        } else {
            [Edge::TopLeft, Edge::TopRight]
        }
    }

    /// `(entry edge, target edge)` pairs for this player's attackers.
    pub fn attack_lanes(self) -> [(Edge, Edge); 2] {
        if self.0 == 0 {
            [
                (Edge::BottomLeft, Edge::TopRight),
                (Edge::BottomRight, Edge::TopLeft),
            ]
        } else {
            [
                (Edge::TopLeft, Edge::BottomRight),
                (Edge::TopRight, Edge::BottomLeft),
            ]
        }
    }

    /// True if row `y` is on this player's half of the arena.
    pub fn owns_row(self, y: u8) -> bool {
        (y < HALF_ARENA) == (self.0 == 0)
    }

    /// Row offset pointing towards the opponent.
    pub fn forward(self) -> i8 {
        if self.0 == 0 {
            1
        } else {
            -1
        }
    }
}

/// A 28x28 array for per-cell data.
#[derive(Clone)]
pub struct ArenaDataArray<T: Copy> {
    data: Vec<T>,
}

impl<T: Copy> ArenaDataArray<T> {
    pub fn new(initial: T) -> Self {
        ArenaDataArray {
            data: vec![initial; (ARENA_SIZE as usize) * (ARENA_SIZE as usize)],
        }
    }

    #[inline]
    pub fn get_mut(&mut self, loc: Location) -> &mut T {
        &mut self.data[Self::index(loc)]
    }

    #[inline]
    fn index(loc: Location) -> usize {
        loc.y() as usize * (ARENA_SIZE as usize) + loc.x() as usize
    }
}

/// Neighbor offsets for orthogonal movement, the only movement mobile units have.
pub const NEIGHBORS_4: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// All in-arena orthogonal neighbors of `loc`.
pub fn arena_neighbors(loc: Location) -> impl Iterator<Item = Location> {
    NEIGHBORS_4
        .iter()
        .filter_map(move |&(dx, dy)| loc.offset(dx, dy))
        .filter(|n| n.is_in_arena())
}

/// Every cell of the arena, row by row.
pub fn all_locations() -> impl Iterator<Item = Location> {
    (0..ARENA_SIZE as u32)
        .flat_map(|y| (0..ARENA_SIZE as u32).map(move |x| Location::from_coords(x, y)))
        .filter(|loc| loc.is_in_arena())
}
