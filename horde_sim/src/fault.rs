use bevy::prelude::*;
use thiserror::Error;

use crate::actors::{ActorId, ActorKind, Slot};

/// Integrity violations that abort a tick. These indicate a caller misusing
/// the actor lifecycle (for example disabling actors instead of transitioning
/// their kind), never an expected simulation outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationFault {
    #[error("actor store column `{column}` has {len} entries, expected {expected}")]
    ColumnMismatch {
        column: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("{identity} at {slot} is {kind:?} but still holds a target")]
    TargetOnNonZombie {
        identity: ActorId,
        slot: Slot,
        kind: ActorKind,
    },
    #[error("infection claim on {slot} found {kind:?}, expected a human")]
    ClaimOnNonHuman { slot: Slot, kind: ActorKind },
}

/// First fault raised during the current tick, if any.
#[derive(Resource, Debug, Default)]
pub struct TickFault(Option<SimulationFault>);

impl TickFault {
    /// Keep the earliest fault; later phases do not run once one is set.
    pub fn record(&mut self, fault: SimulationFault) {
        if self.0.is_none() {
            tracing::error!(
                target: "horde_sim::pipeline",
                error = %fault,
                "tick.fault"
            );
            self.0 = Some(fault);
        }
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn take(&mut self) -> Option<SimulationFault> {
        self.0.take()
    }
}

/// Run condition gating every pipeline phase on the absence of a fault.
pub fn tick_is_healthy(fault: Res<TickFault>) -> bool {
    !fault.is_set()
}
