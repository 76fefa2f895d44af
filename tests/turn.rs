use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use terminal_foreman::arena::PlayerIndex;
use terminal_foreman::attack::*;
use terminal_foreman::config::UnitRole;
use terminal_foreman::defense::*;
use terminal_foreman::game_state::GameState;
use terminal_foreman::template::DefenseLayout;
use terminal_foreman::*;

const CONFIG: &str = r#"{"unitInformation": [
    {"shorthand": "FF", "cost": 1.0, "display": "Filter"},
    {"shorthand": "EF", "cost": 4.0, "range": 3.0, "display": "Encryptor"},
    {"shorthand": "DF", "cost": 3.0, "range": 3.0, "damage": 4.0, "display": "Destructor"},
    {"shorthand": "PI", "cost": 1.0, "range": 3.0, "damage": 1.0, "display": "Ping"},
    {"shorthand": "EI", "cost": 3.0, "range": 5.0, "damage": 3.0, "display": "EMP"},
    {"shorthand": "SI", "cost": 1.0, "range": 3.0, "damage": 10.0, "display": "Scrambler"},
    {"shorthand": "RM", "display": "Remove"}
]}"#;

const FRAME: &str = r#"{
    "turnInfo": [0, 7, -1],
    "p1Stats": [30.0, 10.5, 15.2, 900],
    "p2Stats": [30.0, 8.0, 4.0, 1100],
    "p1Units": [[[0, 13, 60.0, "1"], [1, 13, 60.0, "2"]], [], [], [], [], [], []],
    "p2Units": [[], [], [[13, 16, 75.0, "3"], [14, 16, 75.0, "4"]], [], [], [], []]
}"#;

fn algo(settings: StrategySettings, seed: u64) -> AlgoStrategy {
    AlgoStrategy::on_game_start(CONFIG, settings, ChaCha8Rng::seed_from_u64(seed)).unwrap()
}

#[test]
fn full_turn_from_engine_frame() {
    let mut algo = algo(
        StrategySettings {
            defenses: vec![DefenseStrategy::Templated(DefenseLayout::EdgeAttack)],
            attack: AttackStrategy::EmpLanes,
            scout: Some(ScoutPolicy::default()),
            rate_lanes: true,
        },
        9,
    );
    let mut state = GameState::from_frame(algo.catalog().clone(), FRAME).unwrap();

    let report = algo.on_turn(&mut state);

    assert_eq!(report.turn, 7);
    assert_eq!(report.starting_budget, Budget::new(10, 15));
    // [0, 13] and [1, 13] already stand, so the walk starts at [2, 13].
    assert_eq!(report.defense.len(), 10);
    assert_eq!(report.defense[0].location, Location::from_coords(2, 13));
    assert_eq!(report.attack.len(), 1);
    assert_eq!(report.attack[0].role, UnitRole::Emp);
    assert_eq!(report.attack[0].count, 5);
    assert_eq!(report.remaining_budget, Budget::new(0, 0));

    let [build, deploy] = state.submit_turn().to_engine_lines().unwrap();
    assert!(build.starts_with(r#"[["FF",2,13],["FF",3,12]"#));
    assert!(deploy == r#"[["EI",12,1],["EI",12,1],["EI",12,1],["EI",12,1],["EI",12,1]]"#
        || deploy == r#"[["EI",15,1],["EI",15,1],["EI",15,1],["EI",15,1],["EI",15,1]]"#);
}

#[test]
fn same_seed_same_turn() {
    let run = |seed| {
        let mut algo = algo(StrategySettings::default(), seed);
        let mut state = GameState::from_frame(algo.catalog().clone(), FRAME).unwrap();
        algo.on_turn(&mut state);
        state.submit_turn()
    };

    assert_eq!(run(3), run(3));
}

#[test]
fn randomized_turn_stays_legal() {
    let mut algo = algo(StrategySettings::default(), 21);
    let mut state = GameState::from_frame(algo.catalog().clone(), FRAME).unwrap();

    let report = algo.on_turn(&mut state);

    assert!(!report.defense.is_empty());
    for placement in &report.defense {
        assert!(placement.location.y() == 12 || placement.location.y() == 13);
        assert_ne!(placement.location.x(), 16);
        assert!(state.is_occupied(placement.location));
    }
    assert_eq!(Budget::read(&state), report.remaining_budget);
}

#[test]
fn rating_respects_blocked_launch_cells() {
    let catalog = Arc::new(
        terminal_foreman::config::UnitCatalog::from_json(CONFIG).unwrap(),
    );
    let mut state = GameState::new(catalog);
    state.add_unit(UnitRole::Filter, Location::from_coords(13, 0), PlayerIndex::ME);
    state.add_unit(UnitRole::Filter, Location::from_coords(14, 0), PlayerIndex::ME);

    let ratings = terminal_foreman::rating::rate_attack_positions(&state, PlayerIndex::ME);

    assert_eq!(ratings.len(), 26);
    assert!(ratings.iter().all(|r| r.path[0] == r.entry));
}
