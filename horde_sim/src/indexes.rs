//! Transient per-tick indexes.
//!
//! All three containers are owned resources that live for the whole run and
//! are cleared at the end of every tick, so their allocations are reused.
//! Concurrent writers only ever go through the map's insert-if-absent or
//! per-key exclusive entry operations.

use bevy::prelude::*;
use dashmap::{DashMap, DashSet};
use rayon::prelude::*;

use crate::{
    actors::{ActorId, ActorKind, ActorStore, Slot},
    hex::{cell_key, hex_cell},
};

/// Identity → slot for every human this tick.
#[derive(Resource, Debug, Default)]
pub struct IdentityIndex {
    slots: DashMap<ActorId, Slot>,
}

impl IdentityIndex {
    /// Insert every human of `store`. Duplicate identities keep whichever slot
    /// was inserted first.
    pub fn rebuild(&self, store: &ActorStore, chunk_size: usize) {
        let chunk_size = chunk_size.max(1);
        store
            .kinds
            .par_chunks(chunk_size)
            .zip(store.identities.par_chunks(chunk_size))
            .enumerate()
            .for_each(|(chunk_index, (kinds, identities))| {
                let base = chunk_index * chunk_size;
                for (offset, (kind, identity)) in kinds.iter().zip(identities).enumerate() {
                    if *kind != ActorKind::Human {
                        continue;
                    }
                    self.slots
                        .entry(*identity)
                        .or_insert(Slot::from_index(base + offset));
                }
            });
    }

    pub fn get(&self, identity: ActorId) -> Option<Slot> {
        self.slots.get(&identity).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Hashed hex cell → human slots located in it this tick.
#[derive(Resource, Debug, Default)]
pub struct SpatialIndex {
    buckets: DashMap<u32, Vec<Slot>>,
}

impl SpatialIndex {
    /// Bucket every human of `store` by hex cell. Buckets are sorted by slot
    /// once all workers finish, so scan order never depends on scheduling.
    pub fn rebuild(&mut self, store: &ActorStore, scale: f32, chunk_size: usize) {
        let chunk_size = chunk_size.max(1);
        let buckets = &self.buckets;
        store
            .kinds
            .par_chunks(chunk_size)
            .zip(store.positions.par_chunks(chunk_size))
            .enumerate()
            .for_each(|(chunk_index, (kinds, positions))| {
                let base = chunk_index * chunk_size;
                for (offset, (kind, position)) in kinds.iter().zip(positions).enumerate() {
                    if *kind != ActorKind::Human {
                        continue;
                    }
                    let key = cell_key(hex_cell(*position, scale));
                    buckets
                        .entry(key)
                        .or_insert_with(Vec::new)
                        .push(Slot::from_index(base + offset));
                }
            });

        for mut bucket in self.buckets.iter_mut() {
            bucket.value_mut().sort_unstable();
        }
    }

    /// Visit every slot bucketed under `key`, in slot order.
    pub fn for_each_in<F>(&self, key: u32, mut visit: F)
    where
        F: FnMut(Slot),
    {
        if let Some(bucket) = self.buckets.get(&key) {
            for slot in bucket.value() {
                visit(*slot);
            }
        }
    }

    /// Number of occupied buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

/// Slots whose conversion has been claimed this tick.
#[derive(Resource, Debug, Default)]
pub struct ClaimSet {
    claimed: DashSet<Slot>,
}

impl ClaimSet {
    /// Linearizable insert-if-absent. Exactly one caller per slot per tick
    /// sees `true`.
    pub fn claim(&self, slot: Slot) -> bool {
        self.claimed.insert(slot)
    }

    /// Claimed slots in ascending order.
    pub fn sorted_slots(&self) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self.claimed.iter().map(|slot| *slot).collect();
        slots.sort_unstable();
        slots
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    pub fn clear(&mut self) {
        self.claimed.clear();
    }
}
