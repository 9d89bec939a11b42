use bevy::math::Vec2;
use rayon::prelude::*;

use crate::actors::{ActorStore, Heading};

/// Half-angle facing representation `(sin(a/2), cos(a/2))`, i.e. the y and w
/// components of a rotation about the vertical axis.
#[inline]
pub fn facing_rotation(angle: f32) -> Vec2 {
    let half = angle * 0.5;
    Vec2::new(half.sin(), half.cos())
}

/// Advance every actor along its heading and refresh its facing rotation.
pub fn integrate(store: &mut ActorStore, dt: f32, chunk_size: usize) {
    let chunk_size = chunk_size.max(1);
    let ActorStore {
        positions,
        rotations,
        headings,
        velocities,
        ..
    } = store;
    let headings: &[Heading] = headings;
    let velocities: &[f32] = velocities;

    positions
        .par_chunks_mut(chunk_size)
        .zip(rotations.par_chunks_mut(chunk_size))
        .zip(headings.par_chunks(chunk_size))
        .zip(velocities.par_chunks(chunk_size))
        .for_each(|(((positions, rotations), headings), velocities)| {
            for (((position, rotation), heading), velocity) in positions
                .iter_mut()
                .zip(rotations.iter_mut())
                .zip(headings)
                .zip(velocities)
            {
                *position += heading.value * *velocity * dt;
                *rotation = facing_rotation(heading.angle);
            }
        });
}
