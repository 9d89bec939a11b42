use std::ops::Add;

use bevy::math::Vec2;
use rayon::prelude::*;

use crate::{
    actors::{ActorId, ActorKind, ActorStore, Target},
    hex::{hex_cell, search_keys},
    indexes::{IdentityIndex, SpatialIndex},
};

/// Per-tick tallies of the targeting pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TargetingReport {
    /// Zombies whose resolved target was still tracked and only had its
    /// position refreshed.
    pub refreshed: usize,
    /// Zombies that ran a spatial search.
    pub searched: usize,
    /// Searches that found a target.
    pub resolved: usize,
    /// Searches that found nobody.
    pub exhausted: usize,
}

impl Add for TargetingReport {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            refreshed: self.refreshed + rhs.refreshed,
            searched: self.searched + rhs.searched,
            resolved: self.resolved + rhs.resolved,
            exhausted: self.exhausted + rhs.exhausted,
        }
    }
}

/// Resolve or refresh the target of every zombie.
///
/// A zombie whose resolved target is still present in `identities` keeps it
/// and only copies the current position. Every other zombie, including one
/// that came up empty last tick, searches its own hex cell and the fixed
/// neighbour pattern for the nearest human.
pub fn update_targets(
    store: &mut ActorStore,
    identities: &IdentityIndex,
    spatial: &SpatialIndex,
    scale: f32,
    chunk_size: usize,
) -> TargetingReport {
    let chunk_size = chunk_size.max(1);
    let ActorStore {
        identities: actor_ids,
        kinds,
        positions,
        targets,
        ..
    } = store;
    let actor_ids: &[ActorId] = actor_ids;
    let kinds: &[ActorKind] = kinds;
    let positions: &[Vec2] = positions;

    targets
        .par_chunks_mut(chunk_size)
        .enumerate()
        .map(|(chunk_index, targets)| {
            let base = chunk_index * chunk_size;
            let mut report = TargetingReport::default();
            for (offset, target) in targets.iter_mut().enumerate() {
                let index = base + offset;
                if kinds[index] != ActorKind::Zombie {
                    continue;
                }

                if let Target::Resolved { identity, .. } = *target {
                    if let Some(slot) = identities.get(identity) {
                        *target = Target::Resolved {
                            identity,
                            position: positions[slot.index()],
                        };
                        report.refreshed += 1;
                        continue;
                    }
                }

                report.searched += 1;
                *target = match find_nearest(spatial, actor_ids, positions, positions[index], scale)
                {
                    Some((identity, position)) => {
                        report.resolved += 1;
                        Target::Resolved { identity, position }
                    }
                    None => {
                        report.exhausted += 1;
                        Target::Exhausted
                    }
                };
            }
            report
        })
        .reduce(TargetingReport::default, |a, b| a + b)
}

/// Nearest bucketed actor to `origin` across the search pattern. A candidate
/// replaces the incumbent only when strictly closer, so the first one scanned
/// wins ties.
pub fn find_nearest(
    spatial: &SpatialIndex,
    identities: &[ActorId],
    positions: &[Vec2],
    origin: Vec2,
    scale: f32,
) -> Option<(ActorId, Vec2)> {
    let mut best: Option<usize> = None;
    let mut best_distance = f32::MAX;

    for key in search_keys(hex_cell(origin, scale)) {
        spatial.for_each_in(key, |slot| {
            let index = slot.index();
            let distance = origin.distance(positions[index]);
            if distance < best_distance {
                best_distance = distance;
                best = Some(index);
            }
        });
    }

    best.map(|index| (identities[index], positions[index]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{actors::Slot, hex::axial_to_position};

    const SCALE: f32 = 10.0;

    fn run(store: &mut ActorStore) -> TargetingReport {
        let identities = IdentityIndex::default();
        identities.rebuild(store, 64);
        let mut spatial = SpatialIndex::default();
        spatial.rebuild(store, SCALE, 64);
        update_targets(store, &identities, &spatial, SCALE, 64)
    }

    #[test]
    fn nearest_human_in_shared_cell_wins() {
        let mut store = ActorStore::new();
        let near = store.spawn(ActorKind::Human, Vec2::new(0.0, 0.0), 100.0);
        store.spawn(ActorKind::Human, Vec2::new(1.0, 0.0), 100.0);
        store.spawn(ActorKind::Human, Vec2::new(5.0, 5.0), 100.0);
        store.spawn(ActorKind::Zombie, Vec2::new(0.1, 0.0), 0.0);

        let report = run(&mut store);
        assert_eq!(report.searched, 1);
        assert_eq!(report.resolved, 1);
        assert_eq!(
            store.target(Slot(3)),
            Some(Target::Resolved {
                identity: near,
                position: Vec2::ZERO
            })
        );
    }

    #[test]
    fn equidistant_candidates_keep_the_first_scanned() {
        let mut store = ActorStore::new();
        let first = store.spawn(ActorKind::Human, Vec2::new(-0.5, 0.0), 100.0);
        store.spawn(ActorKind::Human, Vec2::new(0.5, 0.0), 100.0);
        store.spawn(ActorKind::Zombie, Vec2::ZERO, 0.0);

        run(&mut store);
        let (identity, _) = store.target(Slot(2)).and_then(|t| t.resolved()).expect("target");
        assert_eq!(identity, first);
    }

    #[test]
    fn tracked_target_is_refreshed_without_search() {
        let mut store = ActorStore::new();
        let tracked = store.spawn(ActorKind::Human, Vec2::new(3.0, 0.0), 100.0);
        store.spawn(ActorKind::Human, Vec2::new(0.2, 0.0), 100.0);
        store.spawn(ActorKind::Zombie, Vec2::ZERO, 0.0);
        store.set_target(
            Slot(2),
            Target::Resolved {
                identity: tracked,
                position: Vec2::new(-50.0, -50.0),
            },
        );

        let report = run(&mut store);
        assert_eq!(report.refreshed, 1);
        assert_eq!(report.searched, 0);
        assert_eq!(
            store.target(Slot(2)),
            Some(Target::Resolved {
                identity: tracked,
                position: Vec2::new(3.0, 0.0)
            })
        );
    }

    #[test]
    fn lost_target_triggers_a_new_search() {
        let mut store = ActorStore::new();
        let gone = store.spawn(ActorKind::Zombie, Vec2::new(1.0, 1.0), 0.0);
        let fresh = store.spawn(ActorKind::Human, Vec2::new(0.5, 0.0), 100.0);
        store.spawn(ActorKind::Zombie, Vec2::ZERO, 0.0);
        store.set_target(
            Slot(2),
            Target::Resolved {
                identity: gone,
                position: Vec2::new(1.0, 1.0),
            },
        );

        let report = run(&mut store);
        assert_eq!(report.searched, 2);
        let (identity, _) = store.target(Slot(2)).and_then(|t| t.resolved()).expect("target");
        assert_eq!(identity, fresh);
    }

    #[test]
    fn empty_neighbourhood_marks_exhausted_and_retries() {
        let mut store = ActorStore::new();
        store.spawn(ActorKind::Human, Vec2::new(500.0, 500.0), 100.0);
        store.spawn(ActorKind::Zombie, Vec2::ZERO, 0.0);

        for _ in 0..3 {
            let report = run(&mut store);
            assert_eq!(report.searched, 1);
            assert_eq!(report.exhausted, 1);
            assert_eq!(store.target(Slot(1)), Some(Target::Exhausted));
        }
    }

    #[test]
    fn omitted_diagonal_is_never_selected_even_when_closer() {
        let scale = 1.0;
        // Zombie near the edge of cell (0, 0) facing cell (-1, +1).
        let zombie_at = axial_to_position(-0.45, 0.45, scale);
        let hidden_at = axial_to_position(-0.55, 0.55, scale);
        let visible_at = axial_to_position(1.0, 0.0, scale);
        assert_eq!(hex_cell(zombie_at, scale), bevy::math::IVec2::new(0, 0));
        assert_eq!(hex_cell(hidden_at, scale), bevy::math::IVec2::new(-1, 1));
        assert!(zombie_at.distance(hidden_at) < zombie_at.distance(visible_at));

        let mut store = ActorStore::new();
        store.spawn(ActorKind::Human, hidden_at, 100.0);
        let visible = store.spawn(ActorKind::Human, visible_at, 100.0);
        store.spawn(ActorKind::Zombie, zombie_at, 0.0);

        let identities = IdentityIndex::default();
        identities.rebuild(&store, 64);
        let mut spatial = SpatialIndex::default();
        spatial.rebuild(&store, scale, 64);
        update_targets(&mut store, &identities, &spatial, scale, 64);

        let (identity, _) = store.target(Slot(2)).and_then(|t| t.resolved()).expect("target");
        assert_eq!(identity, visible);
    }

    #[test]
    fn omitted_diagonal_alone_leaves_zombie_exhausted() {
        let scale = 1.0;
        let zombie_at = axial_to_position(0.45, -0.45, scale);
        let hidden_at = axial_to_position(0.55, -0.55, scale);
        assert_eq!(hex_cell(hidden_at, scale), bevy::math::IVec2::new(1, -1));

        let mut store = ActorStore::new();
        store.spawn(ActorKind::Human, hidden_at, 100.0);
        store.spawn(ActorKind::Zombie, zombie_at, 0.0);

        let identities = IdentityIndex::default();
        identities.rebuild(&store, 64);
        let mut spatial = SpatialIndex::default();
        spatial.rebuild(&store, scale, 64);
        let report = update_targets(&mut store, &identities, &spatial, scale, 64);

        assert_eq!(report.exhausted, 1);
        assert_eq!(store.target(Slot(1)), Some(Target::Exhausted));
    }

    #[test]
    fn far_field_search_resolves_without_overflow() {
        let far = Vec2::new(1.0e12, 0.0);
        let mut store = ActorStore::new();
        let human = store.spawn(ActorKind::Human, far, 100.0);
        store.spawn(ActorKind::Zombie, far, 0.0);

        let report = run(&mut store);
        assert_eq!(report.resolved, 1);
        assert_eq!(
            store.target(Slot(1)),
            Some(Target::Resolved {
                identity: human,
                position: far
            })
        );
    }

    #[test]
    fn non_zombies_are_untouched() {
        let mut store = ActorStore::new();
        store.spawn(ActorKind::Human, Vec2::ZERO, 100.0);
        store.spawn(ActorKind::None, Vec2::ONE, 100.0);
        let report = run(&mut store);
        assert_eq!(report, TargetingReport::default());
        assert_eq!(store.target(Slot(0)), Some(Target::None));
        assert_eq!(store.target(Slot(1)), Some(Target::None));
    }
}
