use bevy::prelude::*;

/// Tracks total simulation ticks completed.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationTick(pub u64);

/// Elapsed seconds applied by the tick currently being resolved.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct StepDelta(pub f32);

impl Default for StepDelta {
    fn default() -> Self {
        Self(1.0 / 60.0)
    }
}
