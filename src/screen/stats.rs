//! Counters kept over one game.

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;

/// What happened on the screen during a game.
///
/// Handed to the game-over transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenStats {
    /// Event batches turned into timelines.
    pub batches: u32,
    pub cards_dealt: u32,
    pub cards_played: u32,
    /// `CannotPlay` events; each one discards a whole hand.
    pub forced_discards: u32,
    pub marble_moves: u32,
    pub deck_shuffles: u32,
    pub moves_accepted: u32,
    pub moves_rejected: u32,
}

impl ScreenStats {
    /// Count one received event.
    pub fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::DealtCard { .. } => self.cards_dealt += 1,
            GameEvent::PlayedCard { .. } => self.cards_played += 1,
            GameEvent::MovedMarble { .. } => self.marble_moves += 1,
            GameEvent::CannotPlay { .. } => self.forced_discards += 1,
            GameEvent::ShuffledDeck => self.deck_shuffles += 1,
            GameEvent::ExitedState { .. } => {}
        }
    }
}
