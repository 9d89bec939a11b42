use bevy::prelude::*;
use tracing::info;

use crate::{
    actors::ActorStore,
    config::SimulationConfig,
    fault::TickFault,
    indexes::{ClaimSet, IdentityIndex, SpatialIndex},
    infection::{apply_conversions, propose_infections},
    metrics::TickReport,
    motion::integrate,
    navigation::{update_headings, SteeringParams},
    resources::{SimulationTick, StepDelta},
    rng::HeadingSeed,
    targeting::update_targets,
};

pub fn begin_tick(mut seed: ResMut<HeadingSeed>, mut report: ResMut<TickReport>) {
    seed.advance();
    *report = TickReport::default();
}

pub fn verify_actor_store(store: Res<ActorStore>, mut fault: ResMut<TickFault>) {
    if let Err(err) = store.verify() {
        fault.record(err);
    }
}

pub fn rebuild_identity_index(
    config: Res<SimulationConfig>,
    store: Res<ActorStore>,
    identities: ResMut<IdentityIndex>,
) {
    identities.rebuild(&store, config.chunk_size);
}

pub fn rebuild_spatial_index(
    config: Res<SimulationConfig>,
    store: Res<ActorStore>,
    mut spatial: ResMut<SpatialIndex>,
) {
    spatial.rebuild(&store, config.spatial_scale, config.chunk_size);
}

pub fn resolve_targets(
    config: Res<SimulationConfig>,
    identities: Res<IdentityIndex>,
    spatial: Res<SpatialIndex>,
    mut store: ResMut<ActorStore>,
    mut report: ResMut<TickReport>,
) {
    report.targeting = update_targets(
        &mut store,
        &identities,
        &spatial,
        config.spatial_scale,
        config.chunk_size,
    );
}

pub fn resolve_infections(
    config: Res<SimulationConfig>,
    identities: Res<IdentityIndex>,
    claims: ResMut<ClaimSet>,
    mut store: ResMut<ActorStore>,
    mut report: ResMut<TickReport>,
) {
    report.infection = propose_infections(
        &mut store,
        &identities,
        &claims,
        config.infection_distance,
        config.chunk_size,
    );
}

pub fn convert_claimed_humans(
    tick: Res<SimulationTick>,
    claims: Res<ClaimSet>,
    mut store: ResMut<ActorStore>,
    mut report: ResMut<TickReport>,
    mut fault: ResMut<TickFault>,
) {
    match apply_conversions(&mut store, &claims) {
        Ok(converted) => {
            report.conversions = converted.len();
            if !converted.is_empty() {
                info!(
                    target: "horde_sim::pipeline",
                    tick = tick.0 + 1,
                    conversions = converted.len(),
                    "actors.converted"
                );
            }
        }
        Err(err) => fault.record(err),
    }
}

pub fn steer_actors(
    config: Res<SimulationConfig>,
    seed: Res<HeadingSeed>,
    delta: Res<StepDelta>,
    mut store: ResMut<ActorStore>,
    mut report: ResMut<TickReport>,
) {
    let params = SteeringParams {
        dt: delta.0,
        human_speed: config.human_speed,
        zombie_speed: config.zombie_speed,
    };
    report.rerolls = update_headings(&mut store, *seed, params, config.chunk_size);
}

pub fn integrate_positions(
    config: Res<SimulationConfig>,
    delta: Res<StepDelta>,
    mut store: ResMut<ActorStore>,
) {
    integrate(&mut store, delta.0, config.chunk_size);
}

pub fn advance_tick(mut tick: ResMut<SimulationTick>) {
    tick.0 += 1;
}

/// Runs every tick, faulted or not, so no slot survives into the next one.
pub fn clear_transient_indexes(
    mut identities: ResMut<IdentityIndex>,
    mut spatial: ResMut<SpatialIndex>,
    mut claims: ResMut<ClaimSet>,
) {
    identities.clear();
    spatial.clear();
    claims.clear();
}
