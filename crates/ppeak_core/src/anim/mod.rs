//! Decorative animation controllers driven by host callbacks.
//!
//! # Responsibility
//! - Particle backdrop simulation tied to the active world.
//! - Viewport-gated activation and scroll-triggered effect bindings.
//!
//! # Invariants
//! - Controllers never allocate per frame beyond their fixed pools.
//! - Every host registration (frame request, observer, trigger) made by a
//!   controller is released by its teardown/deactivate path.

pub mod particles;
pub mod scroll;
pub mod visibility;

/// Deterministic xorshift32 PRNG shared by the animation controllers.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Zero is not a valid xorshift state and is remapped.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform index in `0..len`; `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        (self.next_f32() * len as f32) as usize % len
    }
}
