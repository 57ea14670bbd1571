//! Rotation jitter sources.
//!
//! Dealt and discarded cards land at a small random angle so the table
//! looks hand-dealt. The randomness is injected so timelines stay
//! deterministic:
//!
//! - [`SeededJitter`]: ChaCha8 stream, same seed gives the same angles
//! - [`FixedJitter`]: constant angle, for tests
//!
//! ```
//! use marbles_screen::core::{JitterSource, SeededJitter};
//!
//! let mut a = SeededJitter::new(7);
//! let mut b = SeededJitter::new(7);
//! assert_eq!(a.next_angle(10.0), b.next_angle(10.0));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of rotation jitter angles, in degrees.
pub trait JitterSource {
    /// Next angle in `-max_degrees..=max_degrees`.
    fn next_angle(&mut self, max_degrees: f32) -> f32;
}

/// Deterministic jitter backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct SeededJitter {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SeededJitter {
    /// Create a jitter stream from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Capture the stream position so a replay can resume it.
    #[must_use]
    pub fn state(&self) -> JitterState {
        JitterState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Resume a stream from a captured position.
    #[must_use]
    pub fn from_state(state: &JitterState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl JitterSource for SeededJitter {
    fn next_angle(&mut self, max_degrees: f32) -> f32 {
        if max_degrees <= 0.0 {
            return 0.0;
        }
        self.inner.gen_range(-max_degrees..=max_degrees)
    }
}

/// Serializable position of a [`SeededJitter`] stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JitterState {
    pub seed: u64,
    pub word_pos: u128,
}

/// Always returns the same angle, clamped to the requested range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedJitter(pub f32);

impl JitterSource for FixedJitter {
    fn next_angle(&mut self, max_degrees: f32) -> f32 {
        let max = max_degrees.max(0.0);
        self.0.clamp(-max, max)
    }
}

impl<J: JitterSource + ?Sized> JitterSource for Box<J> {
    fn next_angle(&mut self, max_degrees: f32) -> f32 {
        (**self).next_angle(max_degrees)
    }
}
