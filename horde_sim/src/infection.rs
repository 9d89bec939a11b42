use std::ops::Add;

use bevy::math::Vec2;
use rayon::prelude::*;

use crate::{
    actors::{ActorKind, ActorStore, Slot, Target},
    fault::SimulationFault,
    indexes::{ClaimSet, IdentityIndex},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InfectionReport {
    /// Zombies within infection distance of their target.
    pub contacts: usize,
    /// Contacts that won the claim on their target.
    pub claims: usize,
    /// Resolved targets no longer present in the identity index.
    pub lost: usize,
}

impl Add for InfectionReport {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            contacts: self.contacts + rhs.contacts,
            claims: self.claims + rhs.claims,
            lost: self.lost + rhs.lost,
        }
    }
}

/// Let every zombie in contact with its target propose the conversion.
///
/// The claim set is the only shared write: many zombies may reach the same
/// human in one pass and exactly one insert succeeds. Every zombie that made
/// contact drops its target so it searches again next tick. Kinds are not
/// changed here; see [`apply_conversions`].
pub fn propose_infections(
    store: &mut ActorStore,
    identities: &IdentityIndex,
    claims: &ClaimSet,
    infection_distance: f32,
    chunk_size: usize,
) -> InfectionReport {
    let chunk_size = chunk_size.max(1);
    let ActorStore {
        kinds,
        positions,
        targets,
        ..
    } = store;
    let kinds: &[ActorKind] = kinds;
    let positions: &[Vec2] = positions;

    targets
        .par_chunks_mut(chunk_size)
        .enumerate()
        .map(|(chunk_index, targets)| {
            let base = chunk_index * chunk_size;
            let mut report = InfectionReport::default();
            for (offset, target) in targets.iter_mut().enumerate() {
                let index = base + offset;
                if kinds[index] != ActorKind::Zombie {
                    continue;
                }
                let Some((identity, target_position)) = target.resolved() else {
                    continue;
                };

                let distance = positions[index].distance(target_position);
                if infection_distance < distance {
                    continue;
                }

                match identities.get(identity) {
                    Some(slot) => {
                        report.contacts += 1;
                        if claims.claim(slot) {
                            report.claims += 1;
                        }
                    }
                    None => report.lost += 1,
                }
                *target = Target::None;
            }
            report
        })
        .reduce(InfectionReport::default, |a, b| a + b)
}

/// Turn every claimed human into a zombie. Returns the converted slots in
/// ascending order.
pub fn apply_conversions(
    store: &mut ActorStore,
    claims: &ClaimSet,
) -> Result<Vec<Slot>, SimulationFault> {
    let converted = claims.sorted_slots();
    for slot in &converted {
        let index = slot.index();
        match store.kinds.get(index).copied() {
            Some(ActorKind::Human) => {
                store.kinds[index] = ActorKind::Zombie;
                store.targets[index] = Target::None;
                store.velocities[index] = 0.0;
            }
            Some(kind) => {
                return Err(SimulationFault::ClaimOnNonHuman { slot: *slot, kind });
            }
            None => {
                return Err(SimulationFault::ColumnMismatch {
                    column: "kinds",
                    len: store.kinds.len(),
                    expected: index + 1,
                });
            }
        }
    }
    Ok(converted)
}
