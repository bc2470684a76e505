//! Seeded card-draw stream.
//!
//! ## Key Features
//!
//! - **Reproducible**: one seed, one sequence of draws
//! - **Resumable**: the stream position is a `u128`, so a host can
//!   persist it next to a store snapshot and pick up where it left off
//! - **Named streams**: `for_context` derives an unrelated sequence per name
//!
//! A host that needs caller-unpredictable draws seeds this from its
//! verifiable randomness facility, or supplies its own
//! [`CardSource`](crate::supply::CardSource) instead.
//!
//! ```
//! use escalate_engine::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.draw_card(), b.draw_card());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::card::Card;

/// Seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Stream for `seed`, positioned at its first draw.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Derive the stream for a named use of this seed.
    ///
    /// Equal seed and name always give the same stream.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..bound`.
    pub fn gen_index(&mut self, bound: usize) -> usize {
        self.inner.gen_range(0..bound)
    }

    /// Draw one card uniformly from the 14-value domain.
    pub fn draw_card(&mut self) -> Card {
        let index = self.gen_index(Card::COUNT);
        Card::ALL[index]
    }

    /// Capture the stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Resume a stream captured by [`GameRng::state`].
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Position of a [`GameRng`], independent of how many cards were drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word counter.
    pub word_pos: u128,
}
