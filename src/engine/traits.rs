//! Rule engine seam.
//!
//! The board game rules live outside this crate. The screen talks to them
//! through two traits:
//!
//! - [`BoardView`]: read-only hands and board geometry
//! - [`RuleEngine`]: step the game, validate human moves, and receive the
//!   move the human chose
//!
//! ## Implementation Notes
//!
//! - `advance` returns the events of the step instead of pushing them to a
//!   listener, so the engine never needs a handle back into the screen
//! - `advance` must not be called while the engine is waiting on a decision
//!   it has already requested
//! - `select_move` answers the most recent decision request
//! - a seat's hand may change later in the step that reports its
//!   `CannotPlay`, so the engine records the hand at emission time in
//!   `EngineStep::hand_snapshots`

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{BoardIndex, Card, InvalidMoveError, MarbleRef, Rect, SeatId};
use crate::events::{GameEvent, HandSnapshot};

/// A move assembled from human clicks, before validation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Seat making the move.
    pub seat: SeatId,

    /// Card being played.
    pub card: Card,

    /// How many spaces the first marble takes, for split cards.
    pub split: Option<u8>,

    /// Selected marbles in click order. One or two entries.
    pub marbles: SmallVec<[MarbleRef; 2]>,
}

impl MoveRequest {
    /// A move with a single marble.
    #[must_use]
    pub fn single(seat: SeatId, card: Card, marble: MarbleRef) -> Self {
        Self {
            seat,
            card,
            split: None,
            marbles: SmallVec::from_slice(&[marble]),
        }
    }

    /// Set the second marble (builder pattern).
    #[must_use]
    pub fn with_second(mut self, marble: MarbleRef) -> Self {
        self.marbles.truncate(1);
        self.marbles.push(marble);
        self
    }

    /// Set the split value (builder pattern).
    #[must_use]
    pub fn with_split(mut self, split: u8) -> Self {
        self.split = Some(split);
        self
    }

    #[must_use]
    pub fn first_marble(&self) -> Option<MarbleRef> {
        self.marbles.first().copied()
    }

    #[must_use]
    pub fn second_marble(&self) -> Option<MarbleRef> {
        self.marbles.get(1).copied()
    }
}

/// A move the engine has accepted as legal.
///
/// Only the engine constructs these, either while listing the legal moves
/// of a decision request or as the result of `validate`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatedMove {
    pub request: MoveRequest,
}

impl ValidatedMove {
    #[must_use]
    pub fn new(request: MoveRequest) -> Self {
        Self { request }
    }

    #[must_use]
    pub fn card(&self) -> Card {
        self.request.card
    }
}

/// The engine asking a human seat to choose a move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub seat: SeatId,
    pub available_moves: Vec<ValidatedMove>,
}

/// Everything one `advance` produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStep {
    /// Events in emission order.
    pub events: Vec<GameEvent>,

    /// Hands captured when each `CannotPlay` was emitted, in emission order.
    pub hand_snapshots: Vec<(SeatId, HandSnapshot)>,

    /// Set when the engine now waits on a human seat.
    pub decision: Option<DecisionRequest>,
}

impl EngineStep {
    #[must_use]
    pub fn new(events: Vec<GameEvent>) -> Self {
        Self {
            events,
            hand_snapshots: Vec::new(),
            decision: None,
        }
    }

    /// Record the hand `seat` held when its `CannotPlay` was emitted
    /// (builder pattern).
    #[must_use]
    pub fn with_hand_snapshot(mut self, seat: SeatId, hand: HandSnapshot) -> Self {
        self.hand_snapshots.push((seat, hand));
        self
    }

    /// Take the first recorded snapshot for `seat`.
    pub fn take_hand_snapshot(&mut self, seat: SeatId) -> Option<HandSnapshot> {
        let position = self.hand_snapshots.iter().position(|(s, _)| *s == seat)?;
        Some(self.hand_snapshots.remove(position).1)
    }

    /// Attach a decision request (builder pattern).
    #[must_use]
    pub fn with_decision(mut self, decision: DecisionRequest) -> Self {
        self.decision = Some(decision);
        self
    }
}

/// Read-only board introspection.
///
/// Bounds are in normalized board coordinates (see `core::geometry`).
pub trait BoardView {
    /// Cards currently held by `seat`.
    fn hand(&self, seat: SeatId) -> HandSnapshot;

    /// The seat's safe space, where its dealt and played cards start.
    fn safe_board_index(&self, seat: SeatId) -> BoardIndex;

    /// First space of the seat's home row.
    fn home_min_board_index(&self, seat: SeatId) -> BoardIndex;

    /// Bounds of a board space.
    fn bounds_for_board_index(&self, index: BoardIndex) -> Rect;

    /// Bounds of a marble sitting on a board space.
    fn bounds_for_marble(&self, index: BoardIndex) -> Rect;

    /// Bounds of the discard pile. Every card actor has this footprint.
    fn bounds_for_discard_pile(&self) -> Rect;

    /// Rotation, in degrees, of a marble sitting on `index`.
    fn orientation_for_board_index(&self, index: BoardIndex) -> f32;
}

/// Rule engine trait.
pub trait RuleEngine: BoardView {
    /// Advance the engine by one step.
    fn advance(&mut self) -> EngineStep;

    /// Check a human move.
    fn validate(&self, request: &MoveRequest) -> Result<ValidatedMove, InvalidMoveError>;

    /// Supply the move chosen by `seat` for its pending decision.
    fn select_move(&mut self, seat: SeatId, chosen: ValidatedMove);
}
