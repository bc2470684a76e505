//! Injectable randomness for card draws.
//!
//! The engine never picks its own randomness: `buy_cards` draws from a
//! `CardSource` handed in by the caller. Production binds this to the
//! host's verifiable randomness; tests use `ScriptedSource`.

use crate::core::{Card, GameRng};

/// Source of uniformly distributed card draws.
pub trait CardSource {
    /// Draw one card.
    fn draw(&mut self) -> Card;

    /// Draw `n` independent cards.
    fn draw_many(&mut self, n: usize) -> Vec<Card> {
        (0..n).map(|_| self.draw()).collect()
    }
}

impl CardSource for GameRng {
    fn draw(&mut self) -> Card {
        self.draw_card()
    }
}

impl<S: CardSource + ?Sized> CardSource for Box<S> {
    fn draw(&mut self) -> Card {
        (**self).draw()
    }
}

/// Replays a fixed card sequence, wrapping around at the end.
///
/// ```
/// use escalate_engine::core::Card;
/// use escalate_engine::supply::{CardSource, ScriptedSource};
///
/// let mut source = ScriptedSource::new(vec![Card::Ace, Card::King]);
/// assert_eq!(source.draw_many(3), vec![Card::Ace, Card::King, Card::Ace]);
/// ```
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    script: Vec<Card>,
    position: usize,
}

impl ScriptedSource {
    /// Create a source from a non-empty script.
    #[must_use]
    pub fn new(script: Vec<Card>) -> Self {
        assert!(!script.is_empty(), "Script must contain at least one card");
        Self {
            script,
            position: 0,
        }
    }

    /// A source that always draws `card`.
    #[must_use]
    pub fn repeating(card: Card) -> Self {
        Self::new(vec![card])
    }

    /// Number of cards drawn so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.position
    }
}

impl CardSource for ScriptedSource {
    fn draw(&mut self) -> Card {
        let card = self.script[self.position % self.script.len()];
        self.position += 1;
        card
    }
}
