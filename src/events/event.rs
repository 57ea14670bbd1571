//! Game event types.
//!
//! Events are the notifications the rule engine emits while it processes
//! one step. They are immutable once created and carry only identities
//! (cards, seats, marbles, board indices); geometry is looked up later
//! through `BoardView`.

use serde::{Deserialize, Serialize};

use crate::core::{BoardIndex, Card, MarbleRef, SeatId};

/// Engine state reported by an `ExitedState` boundary.
///
/// The states form a closed set and are ordered only by occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineState {
    DetermineDealer,
    DealCards,
    PlayerTurn,
    GameOver,
}

impl EngineState {
    /// Is this a dealing state (cards travel from the dealer to seats)?
    #[must_use]
    pub const fn is_dealing(self) -> bool {
        matches!(self, EngineState::DetermineDealer | EngineState::DealCards)
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EngineState::DetermineDealer => "determine dealer",
            EngineState::DealCards => "deal cards",
            EngineState::PlayerTurn => "player turn",
            EngineState::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// A notification from the rule engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// `dealer` dealt `card` to `recipient`.
    DealtCard {
        card: Card,
        dealer: SeatId,
        recipient: SeatId,
    },

    /// `seat` played `card` onto the discard pile.
    PlayedCard { card: Card, seat: SeatId },

    /// `marble` now sits on `new_index`.
    MovedMarble {
        marble: MarbleRef,
        new_index: BoardIndex,
    },

    /// `seat` has no legal move and discards its hand.
    ///
    /// Carries no cards: the consumer snapshots the hand on receipt.
    CannotPlay { seat: SeatId },

    /// The discard pile was shuffled back into the deck.
    ShuffledDeck,

    /// The engine left `state`. Terminates a batch.
    ExitedState { state: EngineState },
}

impl GameEvent {
    pub fn dealt(card: Card, dealer: SeatId, recipient: SeatId) -> Self {
        GameEvent::DealtCard {
            card,
            dealer,
            recipient,
        }
    }

    pub fn played(card: Card, seat: SeatId) -> Self {
        GameEvent::PlayedCard { card, seat }
    }

    pub fn moved(marble: MarbleRef, new_index: BoardIndex) -> Self {
        GameEvent::MovedMarble { marble, new_index }
    }

    pub fn cannot_play(seat: SeatId) -> Self {
        GameEvent::CannotPlay { seat }
    }

    pub fn exited(state: EngineState) -> Self {
        GameEvent::ExitedState { state }
    }

    /// Short name of the variant, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::DealtCard { .. } => "dealt_card",
            GameEvent::PlayedCard { .. } => "played_card",
            GameEvent::MovedMarble { .. } => "moved_marble",
            GameEvent::CannotPlay { .. } => "cannot_play",
            GameEvent::ShuffledDeck => "shuffled_deck",
            GameEvent::ExitedState { .. } => "exited_state",
        }
    }

    /// The state this boundary exits, if this is a boundary.
    #[must_use]
    pub fn exited_state(&self) -> Option<EngineState> {
        match self {
            GameEvent::ExitedState { state } => Some(*state),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.exited_state().is_some()
    }
}
