use bevy::prelude::*;

use crate::{
    actors::ActorStore, infection::InfectionReport, resources::SimulationTick,
    targeting::TargetingReport,
};

/// Pass tallies accumulated while the current tick runs. Reset at the start
/// of every tick.
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub targeting: TargetingReport,
    pub infection: InfectionReport,
    pub conversions: usize,
    pub rerolls: usize,
}

#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct SimulationMetrics {
    pub tick: u64,
    pub humans: usize,
    pub zombies: usize,
    pub inert: usize,
    pub conversions: usize,
    pub total_conversions: u64,
    pub searches: usize,
    pub refreshes: usize,
    pub exhausted: usize,
    pub lost_targets: usize,
    pub rerolls: usize,
}

pub fn collect_metrics(
    tick: Res<SimulationTick>,
    store: Res<ActorStore>,
    report: Res<TickReport>,
    mut metrics: ResMut<SimulationMetrics>,
) {
    let counts = store.kind_counts();

    metrics.tick = tick.0;
    metrics.humans = counts.humans;
    metrics.zombies = counts.zombies;
    metrics.inert = counts.inert;
    metrics.conversions = report.conversions;
    metrics.total_conversions += report.conversions as u64;
    metrics.searches = report.targeting.searched;
    metrics.refreshes = report.targeting.refreshed;
    metrics.exhausted = report.targeting.exhausted;
    metrics.lost_targets = report.infection.lost;
    metrics.rerolls = report.rerolls;

    tracing::debug!(
        target: "horde_sim::pipeline",
        tick = metrics.tick,
        humans = metrics.humans,
        zombies = metrics.zombies,
        conversions = metrics.conversions,
        searches = metrics.searches,
        refreshes = metrics.refreshes,
        exhausted = metrics.exhausted,
        "tick.summary"
    );
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec2;
    use bevy_ecs::system::RunSystemOnce;

    use super::*;
    use crate::actors::ActorKind;

    #[test]
    fn metrics_accumulate_conversions_across_ticks() {
        let mut store = ActorStore::new();
        store.spawn(ActorKind::Human, Vec2::ZERO, 1.0);
        store.spawn(ActorKind::Zombie, Vec2::ZERO, 1.0);
        store.spawn(ActorKind::Zombie, Vec2::ONE, 1.0);

        let mut world = World::new();
        world.insert_resource(store);
        world.insert_resource(SimulationTick(1));
        world.insert_resource(SimulationMetrics::default());
        world.insert_resource(TickReport {
            conversions: 2,
            targeting: TargetingReport {
                searched: 3,
                exhausted: 1,
                ..Default::default()
            },
            ..Default::default()
        });

        world.run_system_once(collect_metrics);
        world.resource_mut::<SimulationTick>().0 = 2;
        world.resource_mut::<TickReport>().conversions = 1;
        world.run_system_once(collect_metrics);

        let metrics = world.resource::<SimulationMetrics>();
        assert_eq!(metrics.tick, 2);
        assert_eq!(metrics.humans, 1);
        assert_eq!(metrics.zombies, 2);
        assert_eq!(metrics.conversions, 1);
        assert_eq!(metrics.total_conversions, 3);
        assert_eq!(metrics.searches, 3);
        assert_eq!(metrics.exhausted, 1);
    }
}
