use bevy::prelude::*;
use serde::Serialize;

use crate::{
    actors::{ActorStore, ActorView},
    hashing::digest_actor_views,
    resources::SimulationTick,
};

/// Per-actor output of the most recently completed tick, in slot order.
#[derive(Resource, Debug, Default, Clone, PartialEq, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub actors: Vec<ActorView>,
    pub digest: u64,
}

impl TickSnapshot {
    pub fn capture(tick: u64, store: &ActorStore) -> Self {
        let actors: Vec<ActorView> = store.views().collect();
        let digest = digest_actor_views(tick, &actors);
        Self {
            tick,
            actors,
            digest,
        }
    }
}

pub fn capture_snapshot(
    tick: Res<SimulationTick>,
    store: Res<ActorStore>,
    mut snapshot: ResMut<TickSnapshot>,
) {
    // Reuse the view buffer between ticks.
    snapshot.actors.clear();
    snapshot.actors.extend(store.views());
    let digest = digest_actor_views(tick.0, &snapshot.actors);
    snapshot.tick = tick.0;
    snapshot.digest = digest;
}
