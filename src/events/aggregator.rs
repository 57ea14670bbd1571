//! Per-step event buffering.
//!
//! The engine fires several notifications per step and closes the step
//! with `ExitedState`. [`TurnEventAggregator`] collects everything up to
//! and including that boundary into one [`EventBatch`].
//!
//! ## Batch invariants
//!
//! - Every batch ends with exactly one `ExitedState`, its last entry.
//! - A new boundary is refused while the previous batch is still in
//!   flight (its timeline has not reported completion). Batches are never
//!   merged.
//! - `CannotPlay` entries carry the seat's hand as it was when the event
//!   arrived.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Card, ProtocolViolation, SeatId, ViolationPolicy};

use super::event::{EngineState, GameEvent};

/// A seat's hand captured at the moment a `CannotPlay` arrived.
pub type HandSnapshot = SmallVec<[Card; 5]>;

/// One buffered event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub event: GameEvent,

    /// Set only for `CannotPlay`.
    pub hand_snapshot: Option<HandSnapshot>,
}

impl BatchEntry {
    fn plain(event: GameEvent) -> Self {
        Self {
            event,
            hand_snapshot: None,
        }
    }
}

/// The finalized events of one engine step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBatch {
    state: EngineState,
    entries: Vec<BatchEntry>,
}

impl EventBatch {
    /// The state whose exit closed this batch.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// All entries in arrival order, boundary last.
    #[must_use]
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Events in arrival order, boundary last.
    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.entries.iter().map(|entry| &entry.event)
    }

    /// Number of entries, boundary included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A batch always holds its boundary, so it is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The hand captured for `seat`'s first `CannotPlay` in this batch.
    #[must_use]
    pub fn hand_snapshot(&self, seat: SeatId) -> Option<&HandSnapshot> {
        self.entries.iter().find_map(|entry| match entry.event {
            GameEvent::CannotPlay { seat: s } if s == seat => entry.hand_snapshot.as_ref(),
            _ => None,
        })
    }
}

/// Buffers events between consecutive `ExitedState` boundaries.
#[derive(Clone, Debug, Default)]
pub struct TurnEventAggregator {
    buffer: Vec<BatchEntry>,

    /// State of the batch handed out and not yet released.
    in_flight: Option<EngineState>,

    policy: ViolationPolicy,
}

impl TurnEventAggregator {
    /// Create an aggregator with the given violation policy.
    #[must_use]
    pub fn new(policy: ViolationPolicy) -> Self {
        Self {
            buffer: Vec::new(),
            in_flight: None,
            policy,
        }
    }

    /// Number of events waiting for the next boundary.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// State of the batch currently in flight, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<EngineState> {
        self.in_flight
    }

    /// Receive one event.
    ///
    /// `snapshot_hand` is the side channel for `CannotPlay`: it is called
    /// immediately, before any later event can change the hand.
    ///
    /// Returns the finalized batch when `event` is a boundary. A boundary
    /// that arrives while another batch is in flight is a protocol
    /// violation; under `ViolationPolicy::Ignore` it is dropped and the
    /// buffer is kept for the next boundary.
    pub fn receive<F>(
        &mut self,
        event: GameEvent,
        snapshot_hand: F,
    ) -> Result<Option<EventBatch>, ProtocolViolation>
    where
        F: FnOnce(SeatId) -> HandSnapshot,
    {
        match event {
            GameEvent::ExitedState { state } => {
                if let Some(pending) = self.in_flight {
                    return Err(ProtocolViolation::OverlappingBatch {
                        pending,
                        incoming: state,
                    }
                    .raise(self.policy));
                }

                let mut entries = std::mem::take(&mut self.buffer);
                entries.push(BatchEntry::plain(event));
                self.in_flight = Some(state);

                tracing::debug!(%state, events = entries.len(), "finalized event batch");
                Ok(Some(EventBatch { state, entries }))
            }
            GameEvent::CannotPlay { seat } => {
                let hand = snapshot_hand(seat);
                tracing::debug!(%seat, cards = hand.len(), "captured hand for forced discard");
                self.buffer.push(BatchEntry {
                    event,
                    hand_snapshot: Some(hand),
                });
                Ok(None)
            }
            other => {
                self.buffer.push(BatchEntry::plain(other));
                Ok(None)
            }
        }
    }

    /// Mark the in-flight batch as fully consumed.
    ///
    /// Returns the released state, or `None` if nothing was in flight.
    pub fn release(&mut self) -> Option<EngineState> {
        self.in_flight.take()
    }
}
