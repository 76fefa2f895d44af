use crate::arena::*;
use crate::config::UnitRole;
use crate::location::*;
use serde::{Deserialize, Serialize};

/// The two currencies a player spends.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Resource {
    /// Slow currency spent on stationary units.
    Cores,
    /// Fast currency spent on mobile units.
    Bits,
}

/// Trait for the live game state the decision code reads and places through.
///
/// Decision code never manipulates the board directly; every change goes
/// through `attempt_spawn`, and its boolean result is the only evidence that a
/// placement happened.
pub trait Battlefield {
    /// True if a stationary unit sits on `loc` (including ones queued this turn).
    fn is_occupied(&self, loc: Location) -> bool;

    /// Try to place `count` units of `role` at `loc`. Returns false and leaves
    /// the state untouched when the placement is illegal or unaffordable.
    fn attempt_spawn(&mut self, role: UnitRole, loc: Location, count: u32) -> bool;

    fn edge_locations(&self, edge: Edge) -> Vec<Location> {
        edge.locations()
    }

    /// Ordered cells a mobile unit starting at `start` walks towards `edge`.
    /// Always contains at least `start`.
    fn path_to_edge(&self, start: Location, edge: Edge) -> Vec<Location>;

    /// Number of defenders not owned by `player` that can hit `loc`.
    fn defenders_in_range(&self, loc: Location, player: PlayerIndex) -> u32;

    /// Whole units of `kind` available to us.
    fn resource(&self, kind: Resource) -> u32;

    fn unit_cost(&self, role: UnitRole) -> u32;

    fn turn_number(&self) -> u32;
}

/// A placement that was committed through `Battlefield::attempt_spawn`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub role: UnitRole,
    pub location: Location,
    pub count: u32,
}

impl Placement {
    pub fn new(role: UnitRole, location: Location, count: u32) -> Self {
        Placement {
            role,
            location,
            count,
        }
    }
}
