//! RNG oracle for deterministic stick throws.
//!
//! The rules never draw randomness themselves: a roll carries an explicit
//! [`StickThrow`]. Whoever is authoritative for a game (the orchestrator's
//! room, or the local runner) resolves random rolls through an [`RngOracle`]
//! before handing the action to the engine, so every replica applies the same
//! throw.
//!
//! All implementations must be deterministic: given the same seed they must
//! produce the same sequence, which keeps recorded games replayable.

use crate::state::StickThrow;

/// Source of random numbers for stick throws.
pub trait RngOracle: Send {
    fn next_u32(&mut self) -> u32;

    /// One stick lands flat side up with probability 1/2.
    fn flip(&mut self) -> bool {
        self.next_u32() >> 31 == 1
    }

    fn throw_sticks(&mut self) -> StickThrow {
        StickThrow::new([self.flip(), self.flip(), self.flip(), self.flip()])
    }

    /// Uniform value in `[min, max]` inclusive.
    fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        // Widened so the full `u32` span does not overflow.
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32()) % span) as u32
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// This implementation uses PCG-XSH-RR, which produces 32-bit output from
/// 64-bit state.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn seeded(seed: u64) -> Self {
        Self {
            state: Self::pcg_step(seed.wrapping_add(Self::INCREMENT)),
        }
    }

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output: xorshift high bits, then a state-dependent rotation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }
}
