//! Runs the passes directly on rayon pools of different sizes and with
//! different chunkings; the resulting actor state must be bit-identical.

use bevy::math::Vec2;
use horde_sim::{
    infection::{apply_conversions, propose_infections},
    motion::integrate,
    navigation::{update_headings, SteeringParams},
    spawn_population,
    targeting::update_targets,
    ActorStore, ActorView, ClaimSet, HeadingSeed, IdentityIndex, SimulationConfig, SpatialIndex,
};

fn step(store: &mut ActorStore, seed: &mut HeadingSeed, config: &SimulationConfig, dt: f32) {
    seed.advance();

    let mut identities = IdentityIndex::default();
    let mut spatial = SpatialIndex::default();
    let mut claims = ClaimSet::default();
    identities.rebuild(store, config.chunk_size);
    spatial.rebuild(store, config.spatial_scale, config.chunk_size);

    update_targets(
        store,
        &identities,
        &spatial,
        config.spatial_scale,
        config.chunk_size,
    );
    propose_infections(
        store,
        &identities,
        &claims,
        config.infection_distance,
        config.chunk_size,
    );
    apply_conversions(store, &claims).expect("conversion");
    let params = SteeringParams {
        dt,
        human_speed: config.human_speed,
        zombie_speed: config.zombie_speed,
    };
    update_headings(store, *seed, params, config.chunk_size);
    integrate(store, dt, config.chunk_size);

    identities.clear();
    spatial.clear();
    claims.clear();
}

fn simulate(threads: usize, chunk_size: usize) -> Vec<ActorView> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .expect("thread pool");

    let mut config = SimulationConfig::default();
    config.chunk_size = chunk_size;
    config.population.human_count = 600;
    config.population.zombie_count = 20;
    config.population.spawn_seed = 77;

    pool.install(|| {
        let mut store = ActorStore::new();
        spawn_population(&mut store, &config.population);
        let mut seed = HeadingSeed::new(0xABCD);
        for _ in 0..90 {
            step(&mut store, &mut seed, &config, 1.0 / 30.0);
        }
        store.views().collect()
    })
}

fn bits(views: &[ActorView]) -> Vec<(u32, u8, [u32; 4])> {
    views
        .iter()
        .map(|view| {
            let to_bits = |v: Vec2| [v.x.to_bits(), v.y.to_bits()];
            let [px, py] = to_bits(view.position);
            let [rx, ry] = to_bits(view.rotation);
            (view.identity.0, u8::from(view.kind), [px, py, rx, ry])
        })
        .collect()
}

#[test]
fn single_and_multi_threaded_runs_agree() {
    let serial = simulate(1, 64);
    let parallel = simulate(4, 64);
    assert_eq!(bits(&serial), bits(&parallel));
}

#[test]
fn chunking_does_not_change_results() {
    let fine = simulate(4, 1);
    let coarse = simulate(4, 1024);
    assert_eq!(bits(&fine), bits(&coarse));
}
