//! Human move selection.
//!
//! A move is entered over several clicks: a card, a split value for cards
//! that split their movement, then one or two marbles. The module is split
//! into two layers:
//!
//! - [`transition`]: the pure state machine over [`Selection`]
//! - [`MoveSelectionController`]: input gating, the legal moves offered by
//!   the engine, and submission through [`RuleEngine`](crate::engine::RuleEngine)
//!
//! ## Example
//!
//! ```
//! use marbles_screen::core::{Card, MarbleRef, SeatId};
//! use marbles_screen::selection::{transition, Selection, SelectionInput, SelectionPhase, Transition};
//!
//! let jack: Card = "JH".parse().unwrap();
//! let (selection, _) = transition(Selection::default(), SelectionInput::Card(jack));
//! let (selection, _) = transition(selection, SelectionInput::Marble(MarbleRef::new(SeatId(0), 0)));
//! assert_eq!(selection.phase, SelectionPhase::AwaitingSecondMarble);
//!
//! let (_, done) = transition(selection, SelectionInput::Marble(MarbleRef::new(SeatId(1), 2)));
//! assert!(matches!(done, Transition::Completed(_)));
//! ```

mod controller;
mod pending;

pub use controller::{MoveSelectionController, SelectionOutcome};
pub use pending::{transition, PendingMove, Selection, SelectionInput, SelectionPhase, Transition};
