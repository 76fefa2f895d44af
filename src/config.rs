//! Match configuration.
//!
//! The engine sends a configuration blob once per match. Unit identities are
//! only known through the `unitInformation` table, whose order is fixed
//! (filter, encryptor, destructor, ping, EMP, scrambler) but whose shorthand
//! tags and costs vary from match to match. `UnitCatalog` captures that table
//! once and is shared read-only by every component for the rest of the match.

use crate::error::*;
use serde::{Deserialize, Serialize};

/// The role a unit plays, independent of the per-match shorthand tag.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub enum UnitRole {
    /// Cheap blocker.
    Filter,
    /// Support structure.
    Encryptor,
    /// Point-defense turret.
    Destructor,
    /// Fast, fragile attacker.
    Ping,
    /// Long-range attacker used to break defenses.
    Emp,
    /// Interceptor of enemy mobile units.
    Scrambler,
}

impl UnitRole {
    /// Roles in `unitInformation` order.
    pub const ALL: [UnitRole; 6] = [
        UnitRole::Filter,
        UnitRole::Encryptor,
        UnitRole::Destructor,
        UnitRole::Ping,
        UnitRole::Emp,
        UnitRole::Scrambler,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_stationary(self) -> bool {
        matches!(
            self,
            UnitRole::Filter | UnitRole::Encryptor | UnitRole::Destructor
        )
    }
}

/// One row of the engine's `unitInformation` table. Unknown keys are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInformation {
    pub shorthand: String,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default, alias = "cost1")]
    pub cost: f32,
    #[serde(default, alias = "attackRange")]
    pub range: f32,
    #[serde(default, alias = "attackDamageWalker")]
    pub damage: f32,
}

/// The parts of the match configuration the agent reads.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub unit_information: Vec<UnitInformation>,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<GameConfig> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Catalog entry for a single role.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitSpec {
    pub role: UnitRole,
    pub shorthand: String,
    pub cost: u32,
    pub range: f32,
    pub damage: f32,
}

/// Immutable per-match unit table, indexed by role.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitCatalog {
    specs: Vec<UnitSpec>,
}

impl UnitCatalog {
    pub fn from_config(config: &GameConfig) -> Result<UnitCatalog> {
        let specs = UnitRole::ALL
            .iter()
            .map(|&role| {
                let info = config
                    .unit_information
                    .get(role.index())
                    .ok_or(AlgoError::MissingUnit(role))?;
                Ok(UnitSpec {
                    role,
                    shorthand: info.shorthand.clone(),
                    cost: info.cost.max(0.0).round() as u32,
                    range: info.range.max(0.0),
                    damage: info.damage.max(0.0),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(UnitCatalog { specs })
    }

    pub fn from_json(json: &str) -> Result<UnitCatalog> {
        UnitCatalog::from_config(&GameConfig::from_json(json)?)
    }

    pub fn spec(&self, role: UnitRole) -> &UnitSpec {
        &self.specs[role.index()]
    }

    pub fn shorthand(&self, role: UnitRole) -> &str {
        &self.spec(role).shorthand
    }

    pub fn cost(&self, role: UnitRole) -> u32 {
        self.spec(role).cost
    }

    pub fn range(&self, role: UnitRole) -> f32 {
        self.spec(role).range
    }

    /// True for stationary units that shoot at attackers.
    pub fn is_defender(&self, role: UnitRole) -> bool {
        let spec = self.spec(role);
        role.is_stationary() && spec.damage > 0.0 && spec.range > 0.0
    }

}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A configuration shaped like the one the engine sends.
    pub const SAMPLE_CONFIG: &str = r#"{
        "debug": {"printMapString": false},
        "unitInformation": [
            {"damage": 0.0, "cost": 1.0, "getHitRadius": 0.01, "display": "Filter", "range": 0.0, "shorthand": "FF", "stability": 60.0},
            {"damage": 0.0, "cost": 4.0, "display": "Encryptor", "range": 3.0, "shorthand": "EF", "stability": 30.0},
            {"damage": 4.0, "cost": 3.0, "display": "Destructor", "range": 3.0, "shorthand": "DF", "stability": 75.0},
            {"damage": 1.0, "cost": 1.0, "display": "Ping", "range": 3.0, "shorthand": "PI", "stability": 15.0},
            {"damage": 3.0, "cost": 3.0, "display": "EMP", "range": 5.0, "shorthand": "EI", "stability": 5.0},
            {"damage": 10.0, "cost": 1.0, "display": "Scrambler", "range": 3.0, "shorthand": "SI", "stability": 40.0},
            {"display": "Remove", "shorthand": "RM"}
        ]
    }"#;

    pub fn sample_catalog() -> UnitCatalog {
        UnitCatalog::from_json(SAMPLE_CONFIG).unwrap()
    }

    #[test]
    fn reads_roles_in_table_order() {
        let catalog = sample_catalog();
        assert_eq!(catalog.shorthand(UnitRole::Filter), "FF");
        assert_eq!(catalog.shorthand(UnitRole::Destructor), "DF");
        assert_eq!(catalog.shorthand(UnitRole::Scrambler), "SI");
        assert_eq!(catalog.cost(UnitRole::Destructor), 3);
        assert_eq!(catalog.cost(UnitRole::Emp), 3);
        assert_eq!(catalog.range(UnitRole::Destructor), 3.0);
        assert!(catalog.is_defender(UnitRole::Destructor));
        assert!(!catalog.is_defender(UnitRole::Encryptor));
        assert!(!catalog.is_defender(UnitRole::Ping));
    }

    #[test]
    fn accepts_alternate_field_names() {
        let json = r#"{"unitInformation": [
            {"shorthand": "A", "cost1": 2.0},
            {"shorthand": "B", "cost1": 4.0},
            {"shorthand": "C", "cost1": 6.0, "attackRange": 3.5, "attackDamageWalker": 8.0},
            {"shorthand": "D", "cost1": 1.0},
            {"shorthand": "E", "cost1": 3.0},
            {"shorthand": "F", "cost1": 1.0}
        ]}"#;
        let catalog = UnitCatalog::from_json(json).unwrap();
        assert_eq!(catalog.cost(UnitRole::Destructor), 6);
        assert_eq!(catalog.range(UnitRole::Destructor), 3.5);
        assert!(catalog.is_defender(UnitRole::Destructor));
        assert_eq!(catalog.cost(UnitRole::Filter), 2);
    }

    #[test]
    fn short_table_is_an_error() {
        let json = r#"{"unitInformation": [{"shorthand": "FF", "cost": 1.0}]}"#;
        match UnitCatalog::from_json(json) {
            Err(AlgoError::MissingUnit(UnitRole::Encryptor)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            UnitCatalog::from_json("{not json"),
            Err(AlgoError::Json(_))
        ));
    }
}
