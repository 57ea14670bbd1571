//! Move selection for the human seat.
//!
//! [`MoveSelectionController`] wraps the pure [`transition`] function with
//! the parts that are not pure: whether input is currently accepted, the
//! legal moves the engine offered, and submission to the engine.
//!
//! ## Submission
//!
//! When a selection completes, the controller builds a [`MoveRequest`] and
//! asks the engine to validate it.
//!
//! - Accepted: input is closed, the move is handed to the engine's
//!   selector, and the outcome tells the coordinator to advance.
//! - Rejected: the pending move is dropped and input stays open. The
//!   human simply chooses again.
//!
//! Either way the pending move is empty afterwards.

use crate::core::{
    Card, InvalidMoveError, MarbleRef, ProtocolViolation, SeatId, SelectionMode, ViolationPolicy,
};
use crate::engine::{MoveRequest, RuleEngine, ValidatedMove};

use super::pending::{transition, PendingMove, Selection, SelectionInput, SelectionPhase, Transition};

/// Result of one input operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The input is not valid in the current phase.
    Ignored,
    /// The selection moved to a new phase.
    Updated(SelectionPhase),
    /// The selected card was clicked again.
    Cancelled,
    /// The engine accepted the move; the coordinator must advance.
    Submitted(ValidatedMove),
    /// The engine rejected the move; input stays open.
    Rejected(InvalidMoveError),
}

/// Collects a human move click by click.
#[derive(Clone, Debug)]
pub struct MoveSelectionController {
    seat: SeatId,
    mode: SelectionMode,
    policy: ViolationPolicy,
    accepting: bool,
    selection: Selection,
    available: Vec<ValidatedMove>,
}

impl MoveSelectionController {
    #[must_use]
    pub fn new(seat: SeatId, mode: SelectionMode, policy: ViolationPolicy) -> Self {
        Self {
            seat,
            mode,
            policy,
            accepting: false,
            selection: Selection::default(),
            available: Vec::new(),
        }
    }

    #[must_use]
    pub fn seat(&self) -> SeatId {
        self.seat
    }

    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Is the controller waiting for clicks?
    #[must_use]
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    #[must_use]
    pub fn phase(&self) -> SelectionPhase {
        self.selection.phase
    }

    /// The card to highlight, if any.
    #[must_use]
    pub fn selected_card(&self) -> Option<Card> {
        self.selection.pending.card
    }

    #[must_use]
    pub fn selected_split(&self) -> Option<u8> {
        self.selection.pending.split
    }

    #[must_use]
    pub fn is_pending_empty(&self) -> bool {
        self.selection.pending.is_empty()
    }

    /// Legal moves offered by the engine for the current decision.
    #[must_use]
    pub fn available_moves(&self) -> &[ValidatedMove] {
        &self.available
    }

    /// Cards that appear in at least one legal move.
    #[must_use]
    pub fn playable_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self.available.iter().map(ValidatedMove::card).collect();
        cards.sort();
        cards.dedup();
        cards
    }

    /// The engine needs a decision from this seat.
    ///
    /// In `Interactive` mode input opens in an empty `Idle` phase and
    /// `None` is returned. In `AutoSelectFirst` mode input stays closed
    /// and the first legal move is returned for immediate submission.
    ///
    /// With no legal move to pick, auto mode opens input like interactive
    /// mode. The engine is still waiting on the decision.
    pub fn enable_input(&mut self, available: Vec<ValidatedMove>) -> Option<ValidatedMove> {
        self.selection = Selection::default();

        if self.mode == SelectionMode::AutoSelectFirst {
            if let Some(chosen) = available.first().cloned() {
                tracing::debug!(seat = %self.seat, "auto-selecting move");
                self.available.clear();
                self.accepting = false;
                return Some(chosen);
            }
            tracing::warn!(seat = %self.seat, "no legal move to auto-select, waiting for input");
        }

        tracing::debug!(seat = %self.seat, moves = available.len(), "input enabled");
        self.available = available;
        self.accepting = true;
        None
    }

    /// Close input and drop any partial selection.
    pub fn disable_input(&mut self) {
        self.accepting = false;
        self.selection = Selection::default();
        self.available.clear();
    }

    /// A card of the human hand was clicked.
    pub fn select_card(&mut self, card: Card) -> Result<SelectionOutcome, ProtocolViolation> {
        self.check_accepting("card click")?;
        Ok(self.apply_local(SelectionInput::Card(card)))
    }

    /// A split value option was clicked.
    pub fn select_split_value(&mut self, value: u8) -> Result<SelectionOutcome, ProtocolViolation> {
        self.check_accepting("split value click")?;
        Ok(self.apply_local(SelectionInput::SplitValue(value)))
    }

    /// A marble was clicked. Submits to `engine` if this completes the move.
    pub fn select_marble<E>(
        &mut self,
        marble: MarbleRef,
        engine: &mut E,
    ) -> Result<SelectionOutcome, ProtocolViolation>
    where
        E: RuleEngine + ?Sized,
    {
        self.check_accepting("marble click")?;

        let (next, step) = transition(self.selection, SelectionInput::Marble(marble));
        self.selection = next;
        Ok(match step {
            Transition::Completed(pending) => self.submit(pending, engine),
            other => self.outcome(other),
        })
    }

    /// Inputs that can never complete a move.
    fn apply_local(&mut self, input: SelectionInput) -> SelectionOutcome {
        let (next, step) = transition(self.selection, input);
        self.selection = next;
        debug_assert!(!matches!(step, Transition::Completed(_)));
        self.outcome(step)
    }

    fn outcome(&self, step: Transition) -> SelectionOutcome {
        match step {
            Transition::Ignored => SelectionOutcome::Ignored,
            Transition::Advanced => {
                tracing::debug!(phase = ?self.selection.phase, "selection advanced");
                SelectionOutcome::Updated(self.selection.phase)
            }
            Transition::Cancelled => {
                tracing::debug!("selection cancelled");
                SelectionOutcome::Cancelled
            }
            Transition::Completed(_) => SelectionOutcome::Ignored,
        }
    }

    fn submit<E>(&mut self, pending: PendingMove, engine: &mut E) -> SelectionOutcome
    where
        E: RuleEngine + ?Sized,
    {
        // The pending move is consumed either way.
        self.selection = Selection::default();

        let Some(request) = self.request_from(pending) else {
            return SelectionOutcome::Ignored;
        };

        match engine.validate(&request) {
            Ok(chosen) => {
                tracing::info!(seat = %self.seat, card = %request.card, "move accepted");
                self.disable_input();
                engine.select_move(self.seat, chosen.clone());
                SelectionOutcome::Submitted(chosen)
            }
            Err(error) => {
                tracing::info!(seat = %self.seat, %error, "move rejected, choose again");
                SelectionOutcome::Rejected(error)
            }
        }
    }

    fn request_from(&self, pending: PendingMove) -> Option<MoveRequest> {
        let card = pending.card?;
        let first = pending.marble1?;
        let mut request = MoveRequest::single(self.seat, card, first);
        request.split = pending.split;
        if let Some(second) = pending.marble2 {
            request = request.with_second(second);
        }
        Some(request)
    }

    fn check_accepting(&self, input: &'static str) -> Result<(), ProtocolViolation> {
        if self.accepting {
            Ok(())
        } else {
            Err(ProtocolViolation::InputNotAccepted { input }.raise(self.policy))
        }
    }
}
