//! The per-turn decision pass.
//!
//! `AlgoStrategy` is built once from the match configuration and then asked
//! for one decision pass per deploy phase: read the budget, spend cores on
//! defense, optionally rate the launch lanes, then spend bits on attackers.

use crate::arena::*;
use crate::attack::*;
use crate::battlefield::*;
use crate::config::*;
use crate::defense::*;
use crate::error::*;
use crate::rating::*;
use crate::template::*;
use log::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Knobs fixed for the whole match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Applied in order each turn, all from the same core budget.
    pub defenses: Vec<DefenseStrategy>,
    pub attack: AttackStrategy,
    pub scout: Option<ScoutPolicy>,
    /// Rate launch lanes every turn and log the result.
    pub rate_lanes: bool,
}

impl Default for StrategySettings {
    fn default() -> Self {
        StrategySettings {
            defenses: vec![DefenseStrategy::Randomized(RandomizedDefense::default())],
            attack: AttackStrategy::EmpLanes,
            scout: Some(ScoutPolicy::default()),
            rate_lanes: false,
        }
    }
}

/// What one decision pass did.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u32,
    pub starting_budget: Budget,
    pub remaining_budget: Budget,
    pub defense: Vec<Placement>,
    pub attack: Vec<Placement>,
    pub ratings: Vec<AttackRating>,
}

pub struct AlgoStrategy {
    catalog: Arc<UnitCatalog>,
    defenses: Vec<DefenseStrategy>,
    allocator: DefenseAllocator,
    dispatcher: AttackDispatcher,
    rate_lanes: bool,
    rng: ChaCha8Rng,
}

impl AlgoStrategy {
    pub fn new(catalog: Arc<UnitCatalog>, settings: StrategySettings, rng: ChaCha8Rng) -> Self {
        let library = Arc::new(DefenseLibrary::new());

        AlgoStrategy {
            catalog,
            defenses: settings.defenses,
            allocator: DefenseAllocator::new(library, PlayerIndex::ME),
            dispatcher: AttackDispatcher::new(settings.attack, settings.scout, PlayerIndex::ME),
            rate_lanes: settings.rate_lanes,
            rng,
        }
    }

    /// Build the strategy from the engine's configuration line.
    pub fn on_game_start(config_json: &str, settings: StrategySettings, rng: ChaCha8Rng) -> Result<Self> {
        let catalog = Arc::new(UnitCatalog::from_json(config_json)?);

        info!(
            "Configured units: {}",
            UnitRole::ALL
                .iter()
                .map(|role| format!("{:?}={}@{}", role, catalog.shorthand(*role), catalog.cost(*role)))
                .collect::<Vec<_>>()
                .join(" ")
        );

        Ok(AlgoStrategy::new(catalog, settings, rng))
    }

    pub fn catalog(&self) -> &Arc<UnitCatalog> {
        &self.catalog
    }

    /// Run one decision pass. Placements are issued through `battlefield`;
    /// submitting them to the engine is left to the caller.
    pub fn on_turn<B: Battlefield + ?Sized>(&mut self, battlefield: &mut B) -> TurnReport {
        let turn = battlefield.turn_number();
        let starting_budget = Budget::read(battlefield);
        let mut budget = starting_budget;

        info!(
            "Turn {}: {} cores, {} bits",
            turn, starting_budget.cores, starting_budget.bits
        );

        let mut defense = Vec::new();
        for strategy in self.defenses.iter() {
            let placed = self
                .allocator
                .allocate(battlefield, &mut budget, strategy, &mut self.rng);
            defense.extend(placed);
        }

        let ratings = if self.rate_lanes {
            let ratings = rate_attack_positions(&*battlefield, PlayerIndex::ME);
            if let Some(best) = least_exposed(&ratings) {
                info!(
                    "Least exposed lane: {} -> {:?} ({} hits)",
                    best.entry,
                    best.target,
                    best.total_exposure()
                );
            }
            ratings
        } else {
            Vec::new()
        };

        let attack = self.dispatcher.dispatch(battlefield, &mut budget, &mut self.rng);

        info!(
            "Turn {}: {} structures, {} launches, {} cores and {} bits left",
            turn,
            defense.len(),
            attack.len(),
            budget.cores,
            budget.bits
        );

        TurnReport {
            turn,
            starting_budget,
            remaining_budget: budget,
            defense,
            attack,
            ratings,
        }
    }
}
