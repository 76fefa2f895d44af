//! Spending bits on mobile units.

use crate::arena::*;
use crate::battlefield::*;
use crate::config::UnitRole;
use crate::constants::*;
use crate::defense::Budget;
use crate::location::*;
use crate::rating::*;
use log::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Where a wave is launched from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchSite {
    Fixed(Location),
    /// One of these, drawn uniformly each time.
    Random(Vec<Location>),
    /// The free launch cell whose path passes the fewest enemy defenders.
    LeastExposed,
}

impl LaunchSite {
    pub fn resolve<B, R>(&self, battlefield: &B, player: PlayerIndex, rng: &mut R) -> Option<Location>
    where
        B: Battlefield + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            LaunchSite::Fixed(loc) => Some(*loc),
            LaunchSite::Random(choices) => choices.choose(rng).copied(),
            LaunchSite::LeastExposed => {
                let ratings = rate_attack_positions(battlefield, player);
                least_exposed(&ratings).map(|r| {
                    debug!(
                        "Least exposed launch {} towards {:?} (exposure {})",
                        r.entry,
                        r.target,
                        r.total_exposure()
                    );
                    r.entry
                })
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackStrategy {
    /// A big ping rush from the bottom corner.
    SendPings,
    /// A small EMP group to wear down structures.
    SendEmps,
    /// Five EMPs down one of two central lanes.
    EmpLanes,
    Wave {
        unit: UnitRole,
        count: u32,
        launch: LaunchSite,
    },
    /// Never attack, scouts included.
    Hold,
}

impl Default for AttackStrategy {
    fn default() -> Self {
        AttackStrategy::SendPings
    }
}

impl AttackStrategy {
    /// The `(unit, count, launch)` wave this strategy sends, if any.
    pub fn wave(&self) -> Option<(UnitRole, u32, LaunchSite)> {
        match self {
            AttackStrategy::SendPings => Some((
                UnitRole::Ping,
                PING_WAVE_SIZE,
                LaunchSite::Fixed(Location::from_coords(14, 0)),
            )),
            AttackStrategy::SendEmps => Some((
                UnitRole::Emp,
                EMP_WAVE_SIZE,
                LaunchSite::Fixed(Location::from_coords(11, 2)),
            )),
            AttackStrategy::EmpLanes => Some((
                UnitRole::Emp,
                EMP_LANE_WAVE_SIZE,
                LaunchSite::Random(vec![
                    Location::from_coords(12, 1),
                    Location::from_coords(15, 1),
                ]),
            )),
            AttackStrategy::Wave {
                unit,
                count,
                launch,
            } => Some((*unit, *count, launch.clone())),
            AttackStrategy::Hold => None,
        }
    }
}

/// Cheap probing units sent early on when a full wave is out of reach.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutPolicy {
    pub unit: UnitRole,
    /// Units per launch cell.
    pub count: u32,
    /// Last turn (inclusive) scouts are sent on.
    pub until_turn: u32,
    pub launches: Vec<Location>,
}

impl Default for ScoutPolicy {
    fn default() -> Self {
        ScoutPolicy {
            unit: UnitRole::Ping,
            count: 1,
            until_turn: SCOUT_UNTIL_TURN,
            launches: vec![Location::from_coords(13, 0), Location::from_coords(14, 0)],
        }
    }
}

pub struct AttackDispatcher {
    strategy: AttackStrategy,
    scout: Option<ScoutPolicy>,
    player: PlayerIndex,
}

impl AttackDispatcher {
    pub fn new(strategy: AttackStrategy, scout: Option<ScoutPolicy>, player: PlayerIndex) -> Self {
        AttackDispatcher {
            strategy,
            scout,
            player,
        }
    }

    pub fn dispatch<B, R>(&self, battlefield: &mut B, budget: &mut Budget, rng: &mut R) -> Vec<Placement>
    where
        B: Battlefield + ?Sized,
        R: Rng + ?Sized,
    {
        let mut placements = Vec::new();

        if self.strategy == AttackStrategy::Hold {
            return placements;
        }

        if let Some((unit, count, launch)) = self.strategy.wave() {
            let affordable = wave_cost(&*battlefield, unit, count)
                .map_or(false, |cost| budget.can_afford(Resource::Bits, cost));
            if count > 0 && affordable {
                match launch.resolve(&*battlefield, self.player, rng) {
                    Some(loc) => {
                        launch_wave(battlefield, budget, unit, loc, count, &mut placements);
                    }
                    None => debug!("No launch cell for {:?} wave", unit),
                }
                return placements;
            }
        }

        let turn = battlefield.turn_number();
        match &self.scout {
            Some(scout) if turn <= scout.until_turn => {
                for loc in scout.launches.iter() {
                    launch_wave(battlefield, budget, scout.unit, *loc, scout.count, &mut placements);
                }
            }
            _ => {}
        }

        placements
    }
}

/// Bits needed for `count` units of `unit`, or `None` if that overflows.
fn wave_cost<B: Battlefield + ?Sized>(battlefield: &B, unit: UnitRole, count: u32) -> Option<u32> {
    battlefield.unit_cost(unit).checked_mul(count)
}

fn launch_wave<B: Battlefield + ?Sized>(
    battlefield: &mut B,
    budget: &mut Budget,
    unit: UnitRole,
    loc: Location,
    count: u32,
    placements: &mut Vec<Placement>,
) -> bool {
    let cost = match wave_cost(&*battlefield, unit, count) {
        Some(cost) if budget.can_afford(Resource::Bits, cost) => cost,
        _ => return false,
    };
    if !battlefield.attempt_spawn(unit, loc, count) {
        debug!("Launch of {} {:?} at {} rejected", count, unit, loc);
        return false;
    }

    budget.spend(Resource::Bits, cost);
    info!("Launched {} {:?} at {}", count, unit, loc);
    placements.push(Placement::new(unit, loc, count));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battlefield::tests::ScriptedBoard;
    use crate::game_state::tests::empty_state;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn loc(x: u32, y: u32) -> Location {
        Location::from_coords(x, y)
    }

    fn run(dispatcher: &AttackDispatcher, board: &mut ScriptedBoard) -> Vec<Placement> {
        let mut budget = Budget::read(board);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let placements = dispatcher.dispatch(board, &mut budget, &mut rng);
        assert_eq!(budget.bits, board.bits);
        placements
    }

    #[test]
    fn exact_budget_sends_one_batch() {
        let dispatcher = AttackDispatcher::new(AttackStrategy::SendPings, None, PlayerIndex::ME);
        let mut board = ScriptedBoard::with_budget(0, PING_WAVE_SIZE);

        let placements = run(&dispatcher, &mut board);

        assert_eq!(
            placements,
            vec![Placement::new(UnitRole::Ping, loc(14, 0), PING_WAVE_SIZE)]
        );
        assert_eq!(board.attempts, 1);
        assert_eq!(board.bits, 0);
    }

    #[test]
    fn one_short_sends_nothing_late() {
        let dispatcher = AttackDispatcher::new(
            AttackStrategy::SendPings,
            Some(ScoutPolicy::default()),
            PlayerIndex::ME,
        );
        let mut board = ScriptedBoard::with_budget(0, PING_WAVE_SIZE - 1);
        board.turn = SCOUT_UNTIL_TURN + 1;

        assert!(run(&dispatcher, &mut board).is_empty());
        assert_eq!(board.attempts, 0);
    }

    #[test]
    fn one_short_scouts_early() {
        let dispatcher = AttackDispatcher::new(
            AttackStrategy::SendPings,
            Some(ScoutPolicy::default()),
            PlayerIndex::ME,
        );
        let mut board = ScriptedBoard::with_budget(0, PING_WAVE_SIZE - 1);
        board.turn = 2;

        assert_eq!(
            run(&dispatcher, &mut board),
            vec![
                Placement::new(UnitRole::Ping, loc(13, 0), 1),
                Placement::new(UnitRole::Ping, loc(14, 0), 1),
            ]
        );
    }

    #[test]
    fn scouts_stop_when_bits_run_out() {
        let dispatcher = AttackDispatcher::new(
            AttackStrategy::SendEmps,
            Some(ScoutPolicy::default()),
            PlayerIndex::ME,
        );
        let mut board = ScriptedBoard::with_budget(0, 1);

        assert_eq!(
            run(&dispatcher, &mut board),
            vec![Placement::new(UnitRole::Ping, loc(13, 0), 1)]
        );
    }

    #[test]
    fn hold_never_attacks() {
        let dispatcher = AttackDispatcher::new(AttackStrategy::Hold, None, PlayerIndex::ME);
        let mut board = ScriptedBoard::with_budget(0, 100);
        assert!(run(&dispatcher, &mut board).is_empty());
    }

    #[test]
    fn hold_sends_no_scouts() {
        let dispatcher = AttackDispatcher::new(
            AttackStrategy::Hold,
            Some(ScoutPolicy::default()),
            PlayerIndex::ME,
        );
        let mut board = ScriptedBoard::with_budget(0, 100);
        board.turn = 1;

        assert!(run(&dispatcher, &mut board).is_empty());
        assert_eq!(board.attempts, 0);
    }

    #[test]
    fn oversized_wave_is_unaffordable() {
        let dispatcher = AttackDispatcher::new(
            AttackStrategy::Wave {
                unit: UnitRole::Emp,
                count: u32::MAX / 2,
                launch: LaunchSite::Fixed(loc(14, 0)),
            },
            None,
            PlayerIndex::ME,
        );
        let mut board = ScriptedBoard::with_budget(0, 100);

        assert!(run(&dispatcher, &mut board).is_empty());
        assert_eq!(board.attempts, 0);
        assert_eq!(board.bits, 100);
    }

    #[test]
    fn oversized_scouts_are_unaffordable() {
        let dispatcher = AttackDispatcher::new(
            AttackStrategy::SendPings,
            Some(ScoutPolicy {
                unit: UnitRole::Emp,
                count: u32::MAX / 2,
                ..ScoutPolicy::default()
            }),
            PlayerIndex::ME,
        );
        let mut board = ScriptedBoard::with_budget(0, 5);

        assert!(run(&dispatcher, &mut board).is_empty());
        assert_eq!(board.attempts, 0);
    }

    #[test]
    fn emp_lanes_pick_one_of_two() {
        let dispatcher = AttackDispatcher::new(AttackStrategy::EmpLanes, None, PlayerIndex::ME);
        let mut board = ScriptedBoard::with_budget(0, 15);

        let placements = run(&dispatcher, &mut board);

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].count, EMP_LANE_WAVE_SIZE);
        assert!(placements[0].location == loc(12, 1) || placements[0].location == loc(15, 1));
    }

    #[test]
    fn rejected_launch_keeps_bits() {
        let dispatcher = AttackDispatcher::new(AttackStrategy::SendEmps, None, PlayerIndex::ME);
        let mut board = ScriptedBoard::with_budget(0, 9);
        board.rejected.insert(loc(11, 2));

        assert!(run(&dispatcher, &mut board).is_empty());
        assert_eq!(board.bits, 9);
    }

    #[test]
    fn least_exposed_launch_avoids_defenders() {
        let mut state = empty_state(0.0, 20.0);
        for x in 10..18 {
            state.add_unit(UnitRole::Destructor, loc(x, 15), PlayerIndex::ENEMY);
        }
        for x in 0..10 {
            state.add_unit(UnitRole::Destructor, loc(x, 14), PlayerIndex::ENEMY);
        }
        let dispatcher = AttackDispatcher::new(
            AttackStrategy::Wave {
                unit: UnitRole::Ping,
                count: 5,
                launch: LaunchSite::LeastExposed,
            },
            None,
            PlayerIndex::ME,
        );
        let mut budget = Budget::read(&state);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let expected = {
            let ratings = rate_attack_positions(&state, PlayerIndex::ME);
            least_exposed(&ratings).map(|r| r.entry)
        };
        let placements = dispatcher.dispatch(&mut state, &mut budget, &mut rng);

        assert_eq!(placements.len(), 1);
        assert_eq!(Some(placements[0].location), expected);
        assert_eq!(budget.bits, 15);
    }
}
