//! Parallel zombie/human actor simulation.
//!
//! Every tick runs a fixed chain of data-parallel passes over a flat actor
//! store: transient identity and spatial indexes are rebuilt, zombies resolve
//! targets and infect humans in contact, then headings and positions are
//! integrated. Call [`run_tick`] to resolve one tick.

pub mod actors;
pub mod config;
pub mod fault;
pub mod hashing;
pub mod hex;
pub mod indexes;
pub mod infection;
pub mod metrics;
pub mod motion;
pub mod navigation;
mod resources;
pub mod rng;
mod snapshot;
pub mod spawn;
mod systems;
pub mod targeting;

use bevy::prelude::*;

pub use actors::{ActorId, ActorKind, ActorStore, ActorView, Heading, KindCounts, Slot, Target};
pub use config::{
    load_simulation_config_from_env, Playfield, PopulationConfig, SimulationConfig,
    SimulationConfigError,
};
pub use fault::{SimulationFault, TickFault};
pub use indexes::{ClaimSet, IdentityIndex, SpatialIndex};
pub use metrics::{SimulationMetrics, TickReport};
pub use resources::{SimulationTick, StepDelta};
pub use rng::HeadingSeed;
pub use snapshot::TickSnapshot;
pub use spawn::{spawn_population, SpawnSummary};

/// Construct a Bevy [`App`] running the actor pipeline over the population
/// described by `config.population`.
pub fn build_headless_app(config: SimulationConfig) -> App {
    let mut store = ActorStore::with_capacity(
        config.population.human_count + config.population.zombie_count,
    );
    spawn::spawn_population(&mut store, &config.population);
    build_headless_app_with_store(config, store)
}

/// Construct the pipeline around a caller-provided actor store.
pub fn build_headless_app_with_store(config: SimulationConfig, store: ActorStore) -> App {
    let mut app = App::new();

    let seed = HeadingSeed::new(config.heading_seed);

    app.insert_resource(config)
        .insert_resource(store)
        .insert_resource(seed)
        .insert_resource(StepDelta::default())
        .insert_resource(SimulationTick::default())
        .insert_resource(TickReport::default())
        .insert_resource(TickFault::default())
        .insert_resource(TickSnapshot::default())
        .insert_resource(SimulationMetrics::default())
        .insert_resource(IdentityIndex::default())
        .insert_resource(SpatialIndex::default())
        .insert_resource(ClaimSet::default())
        .add_plugins(MinimalPlugins)
        .add_systems(
            Update,
            (
                (
                    systems::verify_actor_store,
                    systems::begin_tick,
                    (
                        systems::rebuild_identity_index,
                        systems::rebuild_spatial_index,
                    ),
                    systems::resolve_targets,
                    systems::resolve_infections,
                    systems::convert_claimed_humans,
                    systems::steer_actors,
                    systems::integrate_positions,
                    systems::advance_tick,
                    snapshot::capture_snapshot,
                    metrics::collect_metrics,
                )
                    .chain()
                    .distributive_run_if(fault::tick_is_healthy),
                systems::clear_transient_indexes,
            )
                .chain(),
        );

    app
}

/// Execute a single simulation tick advancing `dt` seconds.
///
/// Each call processes the chained systems configured in
/// [`build_headless_app_with_store`] (verify → seed → indexes → targeting →
/// infection → conversion → navigation → motion → tick → snapshot → metrics),
/// then clears the transient indexes. A fault aborts the remaining phases and
/// is returned here.
pub fn run_tick(app: &mut App, dt: f32) -> Result<(), SimulationFault> {
    app.world.resource_mut::<StepDelta>().0 = dt;
    app.update();
    match app.world.resource_mut::<TickFault>().take() {
        Some(fault) => Err(fault),
        None => Ok(()),
    }
}
