//! Deterministic xorshift stream used for wander headings.
//!
//! The shared seed advances once per tick; every actor derives its own value
//! from the shared seed and its slot index alone, so results do not depend on
//! which worker processes the actor or in what order.

use bevy::{math::DVec2, prelude::*};

use crate::actors::Slot;

/// Offset and span mapping a signed 32-bit integer onto the unit interval.
const UNIT_OFFSET: f64 = 2147483646.0;
const UNIT_SPAN: f64 = 4294967293.0;

/// Substituted for a zero seed, which is a fixed point of xorshift.
const ZERO_SEED_REPLACEMENT: i64 = 0x2545_F491_4F6C_DD1D;

/// One xorshift round with shifts 13, -7, 17. The right shift is arithmetic.
#[inline]
pub fn xorshift(mut x: i64) -> i64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingSeed(i64);

impl HeadingSeed {
    pub fn new(seed: u64) -> Self {
        let seed = seed as i64;
        if seed == 0 {
            Self(ZERO_SEED_REPLACEMENT)
        } else {
            Self(seed)
        }
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Advance the shared stream; called once at the start of every tick.
    pub fn advance(&mut self) -> i64 {
        self.0 = xorshift(self.0);
        self.0
    }

    /// Unit direction for `slot`, seeded as `((seed + slot) << 15) + seed`.
    pub fn direction_for(self, slot: Slot) -> DVec2 {
        let seed = self.0;
        let mixed = xorshift((seed.wrapping_add(slot.0 as i64) << 15).wrapping_add(seed));
        ((unit_pair(mixed) - 0.5) * 2.0).normalize()
    }

    /// Raw uniform pair for `slot`, seeded as `seed * slot + seed`.
    pub fn unit_pair_for(self, slot: Slot) -> DVec2 {
        let seed = self.0;
        unit_pair(xorshift(seed.wrapping_mul(slot.0 as i64).wrapping_add(seed)))
    }
}

/// Split the mixed value into its low and high signed halves and map each
/// onto roughly `[0, 1]`.
fn unit_pair(mixed: i64) -> DVec2 {
    let low = mixed as i32;
    let high = (mixed >> 32) as i32;
    (DVec2::new(low as f64, high as f64) + UNIT_OFFSET) / UNIT_SPAN
}
