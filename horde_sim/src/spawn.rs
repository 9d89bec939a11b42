use bevy::math::Vec2;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::info;

use crate::{
    actors::{ActorKind, ActorStore},
    config::PopulationConfig,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpawnSummary {
    pub humans: usize,
    pub zombies: usize,
}

/// Spawn the configured humans followed by the zombies, each at a uniformly
/// random point of the playfield with a random initial wander countdown.
pub fn spawn_population(store: &mut ActorStore, config: &PopulationConfig) -> SpawnSummary {
    let mut rng = if config.spawn_seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(config.spawn_seed)
    };

    let min = config.playfield.min();
    let max = config.playfield.max();
    let (timeout_min, timeout_max) = config.initial_timeout;

    let sample = |rng: &mut SmallRng| {
        let position = Vec2::new(
            sample_range(rng, min.x, max.x),
            sample_range(rng, min.y, max.y),
        );
        let timeout = sample_range(rng, timeout_min, timeout_max);
        (position, timeout)
    };

    for _ in 0..config.human_count {
        let (position, timeout) = sample(&mut rng);
        store.spawn(ActorKind::Human, position, timeout);
    }
    for _ in 0..config.zombie_count {
        let (position, timeout) = sample(&mut rng);
        store.spawn(ActorKind::Zombie, position, timeout);
    }

    let summary = SpawnSummary {
        humans: config.human_count,
        zombies: config.zombie_count,
    };
    info!(
        target: "horde_sim::spawn",
        humans = summary.humans,
        zombies = summary.zombies,
        seed = config.spawn_seed,
        "population.spawned"
    );
    summary
}

/// Uniform in `[low, high)`, or `low` for an empty range.
fn sample_range(rng: &mut SmallRng, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}
