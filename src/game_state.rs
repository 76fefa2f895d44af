//! Live turn state built from an engine frame.
//!
//! `GameState` is the concrete `Battlefield` the agent plays against. It keeps
//! the units on the board by location, mirrors both players' resources and
//! records every accepted spawn in a build stack (stationary units) or deploy
//! stack (mobile units) until `submit_turn` turns them into engine commands.
//!
//! The engine always presents the board from our side, so we are player 0
//! (`p1*` keys) and own the bottom half.

use crate::arena::*;
use crate::battlefield::*;
use crate::config::*;
use crate::constants::*;
use crate::error::*;
use crate::location::*;
use fnv::FnvHashMap;
use log::*;
use pathfinding::directed::bfs::{bfs, bfs_reach};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A unit on the board.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Unit {
    pub role: UnitRole,
    pub owner: PlayerIndex,
    pub health: f32,
    /// Queued by us this turn rather than reported by the engine.
    pub pending: bool,
}

/// Per-player statistics from the frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PlayerStats {
    pub health: f32,
    pub cores: f32,
    pub bits: f32,
}

/// A single engine command: `[shorthand, x, y]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCommand(pub String, pub u8, pub u8);

/// Everything queued during a turn, ready to send to the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSubmission {
    pub build: Vec<SpawnCommand>,
    pub deploy: Vec<SpawnCommand>,
}

impl TurnSubmission {
    /// The two protocol lines: build commands first, then deploy commands.
    pub fn to_engine_lines(&self) -> Result<[String; 2]> {
        Ok([
            serde_json::to_string(&self.build)?,
            serde_json::to_string(&self.deploy)?,
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.build.is_empty() && self.deploy.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrame {
    turn_info: Vec<i64>,
    p1_stats: Vec<f64>,
    p2_stats: Vec<f64>,
    #[serde(default)]
    p1_units: Vec<Vec<Vec<serde_json::Value>>>,
    #[serde(default)]
    p2_units: Vec<Vec<Vec<serde_json::Value>>>,
}

#[derive(Clone)]
pub struct GameState {
    catalog: Arc<UnitCatalog>,
    phase: u8,
    turn: u32,
    stats: [PlayerStats; 2],
    units: FnvHashMap<Location, Vec<Unit>>,
    build_stack: Vec<SpawnCommand>,
    deploy_stack: Vec<SpawnCommand>,
}

impl GameState {
    /// An empty board on turn 0 with no resources.
    pub fn new(catalog: Arc<UnitCatalog>) -> Self {
        GameState {
            catalog,
            phase: PHASE_DEPLOY,
            turn: 0,
            stats: [PlayerStats::default(); 2],
            units: FnvHashMap::default(),
            build_stack: Vec::new(),
            deploy_stack: Vec::new(),
        }
    }

    /// The `turnInfo` phase of a frame, read without parsing the rest, so a
    /// frame that is otherwise malformed can still be answered.
    pub fn peek_phase(json: &str) -> Option<u8> {
        let frame: serde_json::Value = serde_json::from_str(json).ok()?;
        frame
            .get("turnInfo")?
            .get(0)?
            .as_u64()
            .and_then(|phase| u8::try_from(phase).ok())
    }

    /// Parse an engine frame.
    pub fn from_frame(catalog: Arc<UnitCatalog>, json: &str) -> Result<Self> {
        let raw: RawFrame = serde_json::from_str(json)?;
        let mut state = GameState::new(catalog);

        state.phase = *raw
            .turn_info
            .first()
            .ok_or_else(|| AlgoError::InvalidFrame("empty turnInfo".to_string()))?
            as u8;
        state.turn = raw.turn_info.get(1).copied().unwrap_or(0).max(0) as u32;
        state.stats[0] = parse_stats(&raw.p1_stats)?;
        state.stats[1] = parse_stats(&raw.p2_stats)?;

        for (owner, groups) in [(PlayerIndex::ME, &raw.p1_units), (PlayerIndex::ENEMY, &raw.p2_units)] {
            // Groups follow `unitInformation` order; anything past the last
            // role (removal markers) is not a unit.
            for (role, entries) in UnitRole::ALL.iter().zip(groups.iter()) {
                for entry in entries {
                    let (loc, health) = parse_unit(entry)?;
                    state.units.entry(loc).or_default().push(Unit {
                        role: *role,
                        owner,
                        health,
                        pending: false,
                    });
                }
            }
        }

        debug!(
            "Parsed frame: turn {} phase {} with {} occupied cells",
            state.turn,
            state.phase,
            state.units.len()
        );

        Ok(state)
    }

    pub fn catalog(&self) -> &Arc<UnitCatalog> {
        &self.catalog
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn stats(&self, player: PlayerIndex) -> &PlayerStats {
        &self.stats[(player.0 & 1) as usize]
    }

    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    pub fn set_resources(&mut self, cores: f32, bits: f32) {
        self.stats[0].cores = cores;
        self.stats[0].bits = bits;
    }

    /// Put a unit on the board as if the engine had reported it.
    pub fn add_unit(&mut self, role: UnitRole, loc: Location, owner: PlayerIndex) {
        self.units.entry(loc).or_default().push(Unit {
            role,
            owner,
            health: 1.0,
            pending: false,
        });
    }

    pub fn units_at(&self, loc: Location) -> &[Unit] {
        self.units.get(&loc).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn stationary_unit(&self, loc: Location) -> Option<&Unit> {
        self.units_at(loc).iter().find(|u| u.role.is_stationary())
    }

    /// All stationary units owned by `player`.
    pub fn defenders(&self, player: PlayerIndex) -> Vec<(Location, Unit)> {
        let mut defenders: Vec<(Location, Unit)> = self
            .units
            .iter()
            .flat_map(|(loc, units)| units.iter().map(move |u| (*loc, *u)))
            .filter(|(_, u)| u.owner == player && u.role.is_stationary())
            .collect();
        defenders.sort_by_key(|(loc, _)| *loc);
        defenders
    }

    /// A hypothetical copy with our filters added at `blockers`, for
    /// evaluating layouts before paying for them. Nothing is queued.
    pub fn with_additional_blockers(&self, blockers: &[Location]) -> GameState {
        let mut state = self.clone();
        for &loc in blockers {
            if loc.is_in_arena() && !state.is_occupied(loc) {
                state.add_unit(UnitRole::Filter, loc, PlayerIndex::ME);
            }
        }
        state
    }

    /// Whether `count` units of `role` could be placed at `loc` right now.
    pub fn can_spawn(&self, role: UnitRole, loc: Location, count: u32) -> bool {
        if count == 0 || !loc.is_in_arena() {
            return false;
        }

        let cost = match self.spawn_cost(role, count) {
            Some(cost) => cost,
            None => return false,
        };
        let available = if role.is_stationary() {
            self.stats[0].cores
        } else {
            self.stats[0].bits
        };
        if cost > available {
            return false;
        }

        if role.is_stationary() {
            count == 1 && PlayerIndex::ME.owns_row(loc.y()) && self.units_at(loc).is_empty()
        } else {
            PlayerIndex::ME
                .friendly_edges()
                .iter()
                .any(|edge| edge.contains(loc))
                && !self.is_occupied(loc)
        }
    }

    /// Cost of `count` units of `role`, or `None` if it overflows.
    fn spawn_cost(&self, role: UnitRole, count: u32) -> Option<f32> {
        self.catalog
            .cost(role)
            .checked_mul(count)
            .map(|cost| cost as f32)
    }

    /// Finalize the turn.
    pub fn submit_turn(self) -> TurnSubmission {
        info!(
            "Submitting turn {}: {} builds, {} deploys",
            self.turn,
            self.build_stack.len(),
            self.deploy_stack.len()
        );
        TurnSubmission {
            build: self.build_stack,
            deploy: self.deploy_stack,
        }
    }

    pub fn queued_builds(&self) -> &[SpawnCommand] {
        &self.build_stack
    }

    pub fn queued_deploys(&self) -> &[SpawnCommand] {
        &self.deploy_stack
    }
}

impl Battlefield for GameState {
    fn is_occupied(&self, loc: Location) -> bool {
        self.stationary_unit(loc).is_some()
    }

    fn attempt_spawn(&mut self, role: UnitRole, loc: Location, count: u32) -> bool {
        if !self.can_spawn(role, loc, count) {
            trace!("Rejected spawn of {} {:?} at {}", count, role, loc);
            return false;
        }

        let cost = match self.spawn_cost(role, count) {
            Some(cost) => cost,
            None => return false,
        };
        let command = SpawnCommand(self.catalog.shorthand(role).to_string(), loc.x(), loc.y());
        let units = self.units.entry(loc).or_default();
        for _ in 0..count {
            units.push(Unit {
                role,
                owner: PlayerIndex::ME,
                health: 1.0,
                pending: true,
            });
        }

        if role.is_stationary() {
            self.stats[0].cores -= cost;
            self.build_stack.push(command);
        } else {
            self.stats[0].bits -= cost;
            self.deploy_stack
                .extend(std::iter::repeat(command).take(count as usize));
        }

        true
    }

    fn path_to_edge(&self, start: Location, edge: Edge) -> Vec<Location> {
        let successors = |loc: &Location| -> Vec<Location> {
            arena_neighbors(*loc)
                .filter(|n| !self.is_occupied(*n))
                .collect()
        };

        if let Some(path) = bfs(&start, successors, |loc| edge.contains(*loc)) {
            return path;
        }

        // Edge is sealed off: walk to the reachable cell nearest to it. Reach
        // order is breadth-first, so ties go to the cell fewest steps away.
        let closest = bfs_reach(start, successors)
            .min_by_key(|loc| edge.distance_from(*loc))
            .unwrap_or(start);

        bfs(&start, successors, |loc| *loc == closest).unwrap_or_else(|| vec![start])
    }

    fn defenders_in_range(&self, loc: Location, player: PlayerIndex) -> u32 {
        self.units
            .iter()
            .flat_map(|(pos, units)| units.iter().map(move |u| (*pos, u)))
            .filter(|(pos, u)| {
                u.owner != player
                    && self.catalog.is_defender(u.role)
                    && pos.distance_to(loc) <= self.catalog.range(u.role)
            })
            .count() as u32
    }

    fn resource(&self, kind: Resource) -> u32 {
        let value = match kind {
            Resource::Cores => self.stats[0].cores,
            Resource::Bits => self.stats[0].bits,
        };
        value.max(0.0).floor() as u32
    }

    fn unit_cost(&self, role: UnitRole) -> u32 {
        self.catalog.cost(role)
    }

    fn turn_number(&self) -> u32 {
        self.turn
    }
}

fn parse_stats(raw: &[f64]) -> Result<PlayerStats> {
    if raw.len() < 3 {
        return Err(AlgoError::InvalidFrame(format!(
            "expected at least 3 stats, got {}",
            raw.len()
        )));
    }
    Ok(PlayerStats {
        health: raw[0] as f32,
        cores: raw[1] as f32,
        bits: raw[2] as f32,
    })
}

fn parse_unit(entry: &[serde_json::Value]) -> Result<(Location, f32)> {
    let coord = |i: usize| {
        entry
            .get(i)
            .and_then(|v| v.as_i64())
            .filter(|v| (0..ARENA_SIZE as i64).contains(v))
            .ok_or_else(|| AlgoError::InvalidFrame(format!("bad unit entry {:?}", entry)))
    };
    let x = coord(0)?;
    let y = coord(1)?;
    let health = entry.get(2).and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Ok((Location::from_coords(x as u32, y as u32), health))
}
