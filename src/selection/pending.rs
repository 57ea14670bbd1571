//! The move-selection state machine as a pure function.
//!
//! [`transition`] maps `(Selection, SelectionInput)` to the next
//! `Selection` plus what happened. It has no side effects and knows nothing
//! about input gating or the rule engine, so it can be tested exhaustively
//! on its own.
//!
//! ## Phases
//!
//! ```text
//! Idle -> CardSelected ------------------------------> (complete)
//!           |                                    \
//!           |                                     -> AwaitingSecondMarble -> (complete)
//!           v                                    /
//!      AwaitingSplitValue -> AwaitingFirstMarble -
//! ```
//!
//! Re-clicking the selected card cancels from any phase.

use serde::{Deserialize, Serialize};

use crate::core::{Card, MarbleRef, SPLIT_TOTAL};

/// The move being assembled from clicks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingMove {
    pub card: Option<Card>,
    pub split: Option<u8>,
    pub marble1: Option<MarbleRef>,
    pub marble2: Option<MarbleRef>,
}

impl PendingMove {
    fn with_card(card: Card) -> Self {
        Self {
            card: Some(card),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Marbles the selected card needs, given the split chosen so far.
    fn marbles_required(&self) -> usize {
        self.card
            .map_or(0, |card| card.rank.marbles_required(self.split))
    }
}

/// Where the selection currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionPhase {
    /// No card selected.
    #[default]
    Idle,
    /// A card that needs no split is selected; waiting for the first marble.
    CardSelected,
    /// A split card is selected; waiting for the split value.
    AwaitingSplitValue,
    /// Split chosen; waiting for the first marble.
    AwaitingFirstMarble,
    /// First marble chosen; the card needs a second one.
    AwaitingSecondMarble,
}

/// One click, as seen by the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionInput {
    Card(Card),
    SplitValue(u8),
    Marble(MarbleRef),
}

/// Phase plus pending move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub phase: SelectionPhase,
    pub pending: PendingMove,
}

/// What one input did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Not valid in this phase; nothing changed.
    Ignored,
    /// The selection moved forward.
    Advanced,
    /// The selected card was clicked again; back to an empty `Idle`.
    Cancelled,
    /// The move is complete. The returned selection is already empty.
    Completed(PendingMove),
}

/// Apply one input to a selection.
#[must_use]
pub fn transition(selection: Selection, input: SelectionInput) -> (Selection, Transition) {
    let Selection { phase, mut pending } = selection;

    match input {
        SelectionInput::Card(card) if pending.card == Some(card) => {
            (Selection::default(), Transition::Cancelled)
        }
        SelectionInput::Card(card) => match phase {
            SelectionPhase::Idle | SelectionPhase::CardSelected => {
                let phase = if card.rank.requires_split() {
                    SelectionPhase::AwaitingSplitValue
                } else {
                    SelectionPhase::CardSelected
                };
                let next = Selection {
                    phase,
                    pending: PendingMove::with_card(card),
                };
                (next, Transition::Advanced)
            }
            _ => (selection, Transition::Ignored),
        },
        SelectionInput::SplitValue(value) => {
            if phase != SelectionPhase::AwaitingSplitValue || !(1..=SPLIT_TOTAL).contains(&value) {
                return (selection, Transition::Ignored);
            }
            pending.split = Some(value);
            let next = Selection {
                phase: SelectionPhase::AwaitingFirstMarble,
                pending,
            };
            (next, Transition::Advanced)
        }
        SelectionInput::Marble(marble) => match phase {
            SelectionPhase::Idle | SelectionPhase::AwaitingSplitValue => {
                (selection, Transition::Ignored)
            }
            SelectionPhase::CardSelected | SelectionPhase::AwaitingFirstMarble => {
                pending.marble1 = Some(marble);
                if pending.marbles_required() > 1 {
                    let next = Selection {
                        phase: SelectionPhase::AwaitingSecondMarble,
                        pending,
                    };
                    (next, Transition::Advanced)
                } else {
                    (Selection::default(), Transition::Completed(pending))
                }
            }
            SelectionPhase::AwaitingSecondMarble => {
                pending.marble2 = Some(marble);
                (Selection::default(), Transition::Completed(pending))
            }
        },
    }
}
