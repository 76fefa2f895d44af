use crate::arena::*;
use crate::battlefield::*;
use crate::location::*;
use itertools::Itertools;
use log::*;
use serde::{Deserialize, Serialize};

/// Exposure of one launch cell: how many enemy defenders can reach each step
/// of the path an attacker would take from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRating {
    pub entry: Location,
    pub target: Edge,
    pub path: Vec<Location>,
    pub exposure: Vec<u32>,
}

impl AttackRating {
    pub fn total_exposure(&self) -> u32 {
        self.exposure.iter().sum()
    }
}

/// Rate every free launch cell on `player`'s two friendly edges.
///
/// Ratings come back in enumeration order (lane by lane, then edge order) and
/// are not ranked. Occupied entry cells are skipped. A path that comes back
/// empty is treated as the attacker staying on its entry cell.
pub fn rate_attack_positions<B: Battlefield + ?Sized>(
    battlefield: &B,
    player: PlayerIndex,
) -> Vec<AttackRating> {
    let mut cache: ArenaDataArray<Option<u32>> = ArenaDataArray::new(None);
    let mut ratings = Vec::new();

    for (entry_edge, target) in player.attack_lanes().iter() {
        for entry in battlefield.edge_locations(*entry_edge) {
            if battlefield.is_occupied(entry) {
                trace!("Skipping occupied launch cell {}", entry);
                continue;
            }

            let mut path = battlefield.path_to_edge(entry, *target);
            if path.is_empty() {
                path.push(entry);
            }

            let exposure = path
                .iter()
                .map(|step| {
                    *cache
                        .get_mut(*step)
                        .get_or_insert_with(|| battlefield.defenders_in_range(*step, player))
                })
                .collect_vec();

            trace!(
                "Launch {} -> {:?}: {} steps, exposure [{}]",
                entry,
                target,
                path.len(),
                exposure.iter().join(", ")
            );

            ratings.push(AttackRating {
                entry,
                target: *target,
                path,
                exposure,
            });
        }
    }

    debug!("Rated {} launch cells", ratings.len());

    ratings
}

/// The rating with the lowest total exposure; the earliest wins ties.
pub fn least_exposed(ratings: &[AttackRating]) -> Option<&AttackRating> {
    ratings.iter().min_by_key(|r| r.total_exposure())
}
