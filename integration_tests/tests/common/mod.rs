#![allow(dead_code)]

use bevy::{app::App, math::Vec2};
use horde_sim::{
    build_headless_app, build_headless_app_with_store, ActorKind, ActorStore, SimulationConfig,
    TickSnapshot,
};

/// Wander countdown long enough that a human never moves during a test.
pub const STILL: f32 = 1.0e6;

pub const DT: f32 = 0.1;

pub fn store_with(actors: &[(ActorKind, Vec2)]) -> ActorStore {
    let mut store = ActorStore::with_capacity(actors.len());
    for (kind, position) in actors {
        store.spawn(*kind, *position, STILL);
    }
    store
}

pub fn scenario_app(actors: &[(ActorKind, Vec2)]) -> App {
    build_headless_app_with_store(SimulationConfig::default(), store_with(actors))
}

pub fn seeded_config(humans: usize, zombies: usize) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.population.human_count = humans;
    config.population.zombie_count = zombies;
    config.population.spawn_seed = 0xD00D_F00D;
    config.heading_seed = 0x1234_5678_9ABC;
    config
}

pub fn run_simulation(config: SimulationConfig, ticks: usize) -> TickSnapshot {
    let mut app = build_headless_app(config);
    for _ in 0..ticks {
        horde_sim::run_tick(&mut app, 1.0 / 60.0).expect("tick");
    }
    app.world.resource::<TickSnapshot>().clone()
}
