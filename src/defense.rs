//! Spending cores on structures.
//!
//! Two modes share one placement primitive: walking a fixed template in
//! priority order, or filling randomly sampled gaps along two defensive rows.
//! Every core the local budget gives up corresponds to exactly one successful
//! `attempt_spawn` on the battlefield.

use crate::arena::*;
use crate::battlefield::*;
use crate::config::UnitRole;
use crate::constants::*;
use crate::location::*;
use crate::template::*;
use log::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// Local mirror of the two currencies, read once per turn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub cores: u32,
    pub bits: u32,
}

impl Budget {
    pub fn new(cores: u32, bits: u32) -> Self {
        Budget { cores, bits }
    }

    pub fn read<B: Battlefield + ?Sized>(battlefield: &B) -> Self {
        Budget {
            cores: battlefield.resource(Resource::Cores),
            bits: battlefield.resource(Resource::Bits),
        }
    }

    pub fn get(&self, kind: Resource) -> u32 {
        match kind {
            Resource::Cores => self.cores,
            Resource::Bits => self.bits,
        }
    }

    pub fn can_afford(&self, kind: Resource, amount: u32) -> bool {
        self.get(kind) >= amount
    }

    /// Deduct `amount`. Returns false and leaves the budget alone if that
    /// would take it below zero.
    pub fn spend(&mut self, kind: Resource, amount: u32) -> bool {
        let counter = match kind {
            Resource::Cores => &mut self.cores,
            Resource::Bits => &mut self.bits,
        };
        match counter.checked_sub(amount) {
            Some(rest) => {
                *counter = rest;
                true
            }
            None => false,
        }
    }
}

/// Empty, eligible cells for one structure role. Sampling removes.
#[derive(Clone, Debug)]
pub struct GapPool {
    role: UnitRole,
    cells: Vec<Location>,
}

impl GapPool {
    pub fn new(role: UnitRole, cells: Vec<Location>) -> Self {
        GapPool { role, cells }
    }

    /// Unoccupied arena cells of `row` within `columns`, skipping `opening`.
    pub fn from_row<B: Battlefield + ?Sized>(
        battlefield: &B,
        role: UnitRole,
        row: u8,
        columns: Range<u8>,
        opening: Option<u8>,
    ) -> Self {
        let cells = columns
            .filter(|&x| Some(x) != opening)
            .map(|x| Location::from_coords(x as u32, row as u32))
            .filter(|loc| loc.is_in_arena() && !battlefield.is_occupied(*loc))
            .collect();

        GapPool { role, cells }
    }

    pub fn role(&self) -> UnitRole {
        self.role
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, loc: Location) -> bool {
        self.cells.contains(&loc)
    }

    pub fn remove(&mut self, loc: Location) -> bool {
        match self.cells.iter().position(|c| *c == loc) {
            Some(index) => {
                self.cells.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Pick a cell uniformly at random and take it out of the pool.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Location> {
        if self.cells.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.cells.len());
        Some(self.cells.swap_remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.cells.iter()
    }
}

/// Settings for the randomized gap filler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomizedDefense {
    pub filter_row: u8,
    pub destructor_row: u8,
    pub destructor_columns: Range<u8>,
    /// Column never reinforced so our own attackers keep a lane.
    pub opening_column: Option<u8>,
    /// Destructors are preferred while more than this many gaps remain.
    pub saturation_threshold: usize,
}

impl Default for RandomizedDefense {
    fn default() -> Self {
        RandomizedDefense {
            filter_row: FILTER_ROW,
            destructor_row: DESTRUCTOR_ROW,
            destructor_columns: 1..ARENA_SIZE - 1,
            opening_column: Some(DEFAULT_OPENING_COLUMN),
            saturation_threshold: DESTRUCTOR_SATURATION_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefenseStrategy {
    Templated(DefenseLayout),
    Randomized(RandomizedDefense),
}

/// Column offsets of the support filters placed in front of a destructor:
/// straight ahead, then to either side.
const SUPPORT_OFFSETS: [i8; 3] = [0, -1, 1];

pub struct DefenseAllocator {
    library: Arc<DefenseLibrary>,
    player: PlayerIndex,
}

impl DefenseAllocator {
    pub fn new(library: Arc<DefenseLibrary>, player: PlayerIndex) -> Self {
        DefenseAllocator { library, player }
    }

    pub fn allocate<B, R>(
        &self,
        battlefield: &mut B,
        budget: &mut Budget,
        strategy: &DefenseStrategy,
        rng: &mut R,
    ) -> Vec<Placement>
    where
        B: Battlefield + ?Sized,
        R: Rng + ?Sized,
    {
        match strategy {
            DefenseStrategy::Templated(layout) => match self.library.get(*layout) {
                Some(template) => self.apply_template(battlefield, budget, template),
                None => {
                    warn!("No template for layout {:?}", layout);
                    Vec::new()
                }
            },
            DefenseStrategy::Randomized(settings) => {
                let mut filters = GapPool::from_row(
                    battlefield,
                    UnitRole::Filter,
                    settings.filter_row,
                    0..ARENA_SIZE,
                    settings.opening_column,
                );
                let mut destructors = GapPool::from_row(
                    battlefield,
                    UnitRole::Destructor,
                    settings.destructor_row,
                    settings.destructor_columns.clone(),
                    settings.opening_column,
                );

                debug!(
                    "Gap pools: {} filter, {} destructor",
                    filters.len(),
                    destructors.len()
                );

                self.fill_gaps(
                    battlefield,
                    budget,
                    &mut filters,
                    &mut destructors,
                    settings.saturation_threshold,
                    rng,
                )
            }
        }
    }

    /// Walk `template` in order, committing every entry that is free and
    /// affordable at the moment it is reached.
    pub fn apply_template<B: Battlefield + ?Sized>(
        &self,
        battlefield: &mut B,
        budget: &mut Budget,
        template: &DefenseTemplate,
    ) -> Vec<Placement> {
        let mut placements = Vec::new();

        for entry in template.iter() {
            if battlefield.is_occupied(entry.location) {
                continue;
            }
            self.place(battlefield, budget, entry.role, entry.location, &mut placements);
        }

        debug!(
            "Template committed {} of {} entries",
            placements.len(),
            template.len()
        );

        placements
    }

    /// Fill gaps from the two pools until money or gaps run out.
    pub fn fill_gaps<B, R>(
        &self,
        battlefield: &mut B,
        budget: &mut Budget,
        filters: &mut GapPool,
        destructors: &mut GapPool,
        saturation_threshold: usize,
        rng: &mut R,
    ) -> Vec<Placement>
    where
        B: Battlefield + ?Sized,
        R: Rng + ?Sized,
    {
        let filter_cost = battlefield.unit_cost(filters.role());
        let destructor_cost = battlefield.unit_cost(destructors.role());
        let cheapest = filter_cost.min(destructor_cost);

        let mut placements = Vec::new();

        while budget.can_afford(Resource::Cores, cheapest) {
            let filter_ready =
                !filters.is_empty() && budget.can_afford(Resource::Cores, filter_cost);
            let destructor_ready =
                !destructors.is_empty() && budget.can_afford(Resource::Cores, destructor_cost);

            let pool = if destructor_ready && destructors.len() > saturation_threshold {
                &mut *destructors
            } else if filter_ready {
                &mut *filters
            } else if destructor_ready {
                &mut *destructors
            } else {
                break;
            };

            let role = pool.role();
            let loc = match pool.sample(rng) {
                Some(loc) => loc,
                None => break,
            };

            if !self.place(battlefield, budget, role, loc, &mut placements) {
                continue;
            }

            if role == destructors.role() {
                self.place_supports(battlefield, budget, filters, loc, &mut placements);
            }
        }

        placements
    }

    /// Screen a freshly placed destructor with filters directly in front of it.
    fn place_supports<B: Battlefield + ?Sized>(
        &self,
        battlefield: &mut B,
        budget: &mut Budget,
        filters: &mut GapPool,
        anchor: Location,
        placements: &mut Vec<Placement>,
    ) {
        let forward = self.player.forward();

        for dx in SUPPORT_OFFSETS.iter() {
            let loc = match anchor.offset(*dx, forward) {
                Some(loc) => loc,
                None => continue,
            };
            if !filters.contains(loc) {
                continue;
            }
            if self.place(battlefield, budget, filters.role(), loc, placements) {
                filters.remove(loc);
            }
        }
    }

    /// Affordability-gated single placement. The budget only moves when the
    /// battlefield accepts the spawn.
    fn place<B: Battlefield + ?Sized>(
        &self,
        battlefield: &mut B,
        budget: &mut Budget,
        role: UnitRole,
        loc: Location,
        placements: &mut Vec<Placement>,
    ) -> bool {
        let cost = battlefield.unit_cost(role);
        if !budget.can_afford(Resource::Cores, cost) {
            trace!("Cannot afford {:?} at {}", role, loc);
            return false;
        }
        if !battlefield.attempt_spawn(role, loc, 1) {
            trace!("Spawn of {:?} at {} rejected", role, loc);
            return false;
        }

        budget.spend(Resource::Cores, cost);
        debug!("Placed {:?} at {}", role, loc);
        placements.push(Placement::new(role, loc, 1));
        true
    }
}
