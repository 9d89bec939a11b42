use std::hash::Hasher;

use crate::actors::ActorView;

/// A deterministic FNV-1a 64-bit hasher.
///
/// `DefaultHasher` is randomly keyed per process, so it cannot be used for
/// digests compared across runs.
#[derive(Debug)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Digest of the tick number and every view's identity, kind and the raw
/// bits of its position and rotation.
pub fn digest_actor_views<'a>(tick: u64, views: impl IntoIterator<Item = &'a ActorView>) -> u64 {
    let mut hasher = FnvHasher::new();
    hasher.write_u64(tick);
    for view in views {
        hasher.write_u32(view.identity.0);
        hasher.write_u8(view.kind.into());
        hasher.write_u32(view.position.x.to_bits());
        hasher.write_u32(view.position.y.to_bits());
        hasher.write_u32(view.rotation.x.to_bits());
        hasher.write_u32(view.rotation.y.to_bits());
    }
    hasher.finish()
}
