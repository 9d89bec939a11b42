use bevy::math::{DVec2, Vec2};
use rayon::prelude::*;

use crate::{
    actors::{ActorKind, ActorStore, Heading, Slot, Target},
    rng::HeadingSeed,
};

/// Minimum seconds between wander re-rolls.
pub const WANDER_TIMEOUT_BASE: f32 = 2.5;
/// Scale applied to the x component of the new direction when re-rolling.
pub const WANDER_TIMEOUT_SPREAD: f64 = 7.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    pub dt: f32,
    pub human_speed: f32,
    pub zombie_speed: f32,
}

/// Time until the next re-roll after picking `direction`. Always within
/// `[2.5, 10.0]` for a unit direction.
pub fn wander_timeout(direction: DVec2) -> f32 {
    WANDER_TIMEOUT_BASE + (WANDER_TIMEOUT_SPREAD * direction.x).abs() as f32
}

/// Assign headings and speeds from each actor's kind and target. Returns the
/// number of humans that picked a new wander direction.
pub fn update_headings(
    store: &mut ActorStore,
    seed: HeadingSeed,
    params: SteeringParams,
    chunk_size: usize,
) -> usize {
    let chunk_size = chunk_size.max(1);
    let ActorStore {
        kinds,
        positions,
        headings,
        velocities,
        timeouts,
        targets,
        ..
    } = store;
    let kinds: &[ActorKind] = kinds;
    let positions: &[Vec2] = positions;
    let targets: &[Target] = targets;

    headings
        .par_chunks_mut(chunk_size)
        .zip(velocities.par_chunks_mut(chunk_size))
        .zip(timeouts.par_chunks_mut(chunk_size))
        .enumerate()
        .map(|(chunk_index, ((headings, velocities), timeouts))| {
            let base = chunk_index * chunk_size;
            let mut rerolls = 0;
            for offset in 0..headings.len() {
                let index = base + offset;
                let heading = &mut headings[offset];
                let velocity = &mut velocities[offset];
                match kinds[index] {
                    ActorKind::None => heading.value = Vec2::ZERO,
                    ActorKind::Human => {
                        let timeout = &mut timeouts[offset];
                        *timeout -= params.dt;
                        if *timeout > 0.0 {
                            continue;
                        }
                        let direction = seed.direction_for(Slot::from_index(index));
                        *timeout = wander_timeout(direction);
                        *heading = Heading {
                            value: direction.as_vec2(),
                            angle: direction.x.atan2(direction.y) as f32,
                        };
                        *velocity = params.human_speed;
                        rerolls += 1;
                    }
                    ActorKind::Zombie => match targets[index] {
                        Target::Resolved { position, .. } => {
                            let direction = (position - positions[index]).normalize_or_zero();
                            *heading = Heading {
                                value: direction,
                                angle: direction.x.atan2(direction.y),
                            };
                            *velocity = params.zombie_speed;
                        }
                        Target::None | Target::Exhausted => *velocity = 0.0,
                    },
                }
            }
            rerolls
        })
        .sum()
}
