use std::fmt;

use bevy::{math::Vec2, prelude::*};
use serde::Serialize;

use crate::fault::SimulationFault;

/// Stable, process-unique handle for an actor. Used as the key of every
/// cross-slot lookup; never derived from an array position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Position of an actor inside the store columns. Only valid for the tick in
/// which it was read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(pub u32);

impl Slot {
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// Behavioural class of an actor.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ActorKind {
    /// Inert; heading is zeroed and no pass acts on it.
    #[default]
    None,
    Human,
    Zombie,
}

impl From<ActorKind> for u8 {
    fn from(value: ActorKind) -> Self {
        value as u8
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Heading {
    pub value: Vec2,
    /// Facing angle, `atan2(value.x, value.y)` at the time the heading was set.
    pub angle: f32,
}

/// Pursuit state of a zombie.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Target {
    /// No target sought yet, or the previous one was lost or converted.
    #[default]
    None,
    /// A living human and its position as of the last refresh.
    Resolved { identity: ActorId, position: Vec2 },
    /// The last spatial search found nobody; searched again next tick.
    Exhausted,
}

impl Target {
    pub fn is_none(&self) -> bool {
        matches!(self, Target::None)
    }

    pub fn resolved(&self) -> Option<(ActorId, Vec2)> {
        match *self {
            Target::Resolved { identity, position } => Some((identity, position)),
            _ => None,
        }
    }
}

/// Per-actor record handed to presentation consumers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ActorView {
    pub identity: ActorId,
    pub kind: ActorKind,
    #[serde(serialize_with = "serialize_vec2")]
    pub position: Vec2,
    #[serde(serialize_with = "serialize_vec2")]
    pub rotation: Vec2,
}

fn serialize_vec2<S: serde::Serializer>(value: &Vec2, serializer: S) -> Result<S::Ok, S::Error> {
    [value.x, value.y].serialize(serializer)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub inert: usize,
    pub humans: usize,
    pub zombies: usize,
}

/// Structure-of-arrays storage for every actor in the simulation.
///
/// Each column holds one entry per slot. Passes borrow columns disjointly and
/// split them into chunks, so the columns are kept crate-visible rather than
/// hidden behind per-actor accessors.
#[derive(Resource, Debug, Default, Clone)]
pub struct ActorStore {
    pub(crate) identities: Vec<ActorId>,
    pub(crate) kinds: Vec<ActorKind>,
    pub(crate) positions: Vec<Vec2>,
    pub(crate) headings: Vec<Heading>,
    pub(crate) velocities: Vec<f32>,
    pub(crate) timeouts: Vec<f32>,
    pub(crate) targets: Vec<Target>,
    pub(crate) rotations: Vec<Vec2>,
    next_identity: u32,
}

impl ActorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            identities: Vec::with_capacity(capacity),
            kinds: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
            headings: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            timeouts: Vec::with_capacity(capacity),
            targets: Vec::with_capacity(capacity),
            rotations: Vec::with_capacity(capacity),
            next_identity: 0,
        }
    }

    /// Append a new actor and return its identity. Velocity and heading start
    /// at zero; the facing rotation starts at identity.
    pub fn spawn(&mut self, kind: ActorKind, position: Vec2, timeout: f32) -> ActorId {
        let identity = ActorId(self.next_identity);
        self.next_identity += 1;

        self.identities.push(identity);
        self.kinds.push(kind);
        self.positions.push(position);
        self.headings.push(Heading::default());
        self.velocities.push(0.0);
        self.timeouts.push(timeout);
        self.targets.push(Target::None);
        self.rotations.push(Vec2::new(0.0, 1.0));
        identity
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Linear lookup of the slot currently holding `identity`. Intended for
    /// callers outside the pipeline; passes use the per-tick identity index.
    pub fn slot_of(&self, identity: ActorId) -> Option<Slot> {
        self.identities
            .iter()
            .position(|candidate| *candidate == identity)
            .map(Slot::from_index)
    }

    pub fn identity(&self, slot: Slot) -> Option<ActorId> {
        self.identities.get(slot.index()).copied()
    }

    pub fn kind(&self, slot: Slot) -> Option<ActorKind> {
        self.kinds.get(slot.index()).copied()
    }

    pub fn position(&self, slot: Slot) -> Option<Vec2> {
        self.positions.get(slot.index()).copied()
    }

    pub fn heading(&self, slot: Slot) -> Option<Heading> {
        self.headings.get(slot.index()).copied()
    }

    pub fn velocity(&self, slot: Slot) -> Option<f32> {
        self.velocities.get(slot.index()).copied()
    }

    pub fn timeout(&self, slot: Slot) -> Option<f32> {
        self.timeouts.get(slot.index()).copied()
    }

    pub fn target(&self, slot: Slot) -> Option<Target> {
        self.targets.get(slot.index()).copied()
    }

    pub fn rotation(&self, slot: Slot) -> Option<Vec2> {
        self.rotations.get(slot.index()).copied()
    }

    /// Change the kind of an actor between ticks. Leaves the target untouched,
    /// so disabling a zombie that still holds a target is reported as a fault
    /// on the next tick.
    pub fn set_kind(&mut self, slot: Slot, kind: ActorKind) -> bool {
        match self.kinds.get_mut(slot.index()) {
            Some(current) => {
                *current = kind;
                true
            }
            None => false,
        }
    }

    pub fn set_target(&mut self, slot: Slot, target: Target) -> bool {
        match self.targets.get_mut(slot.index()) {
            Some(current) => {
                *current = target;
                true
            }
            None => false,
        }
    }

    pub fn kinds(&self) -> &[ActorKind] {
        &self.kinds
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn rotations(&self) -> &[Vec2] {
        &self.rotations
    }

    pub fn identities(&self) -> &[ActorId] {
        &self.identities
    }

    pub fn view(&self, slot: Slot) -> Option<ActorView> {
        let index = slot.index();
        Some(ActorView {
            identity: *self.identities.get(index)?,
            kind: *self.kinds.get(index)?,
            position: *self.positions.get(index)?,
            rotation: *self.rotations.get(index)?,
        })
    }

    pub fn views(&self) -> impl Iterator<Item = ActorView> + '_ {
        self.identities
            .iter()
            .zip(&self.kinds)
            .zip(&self.positions)
            .zip(&self.rotations)
            .map(|(((identity, kind), position), rotation)| ActorView {
                identity: *identity,
                kind: *kind,
                position: *position,
                rotation: *rotation,
            })
    }

    pub fn kind_counts(&self) -> KindCounts {
        let mut counts = KindCounts::default();
        for kind in &self.kinds {
            match kind {
                ActorKind::None => counts.inert += 1,
                ActorKind::Human => counts.humans += 1,
                ActorKind::Zombie => counts.zombies += 1,
            }
        }
        counts
    }

    /// Check the structural invariants every pass relies on: equal column
    /// lengths and targets held only by zombies.
    pub fn verify(&self) -> Result<(), SimulationFault> {
        let expected = self.identities.len();
        let columns = [
            ("kinds", self.kinds.len()),
            ("positions", self.positions.len()),
            ("headings", self.headings.len()),
            ("velocities", self.velocities.len()),
            ("timeouts", self.timeouts.len()),
            ("targets", self.targets.len()),
            ("rotations", self.rotations.len()),
        ];
        for (column, len) in columns {
            if len != expected {
                return Err(SimulationFault::ColumnMismatch {
                    column,
                    len,
                    expected,
                });
            }
        }

        let stray = self
            .kinds
            .iter()
            .zip(&self.targets)
            .position(|(kind, target)| *kind != ActorKind::Zombie && !target.is_none());
        match stray {
            Some(index) => Err(SimulationFault::TargetOnNonZombie {
                identity: self.identities[index],
                slot: Slot::from_index(index),
                kind: self.kinds[index],
            }),
            None => Ok(()),
        }
    }
}
