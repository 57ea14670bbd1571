//! Error types.
//!
//! Two kinds of failure exist in this crate:
//!
//! - [`ProtocolViolation`]: a caller broke the ingestion or input contract
//!   (overlapping batches, clicks while input is closed, a second completion
//!   for the same timeline). Routed through [`ViolationPolicy`].
//! - [`InvalidMoveError`]: the rule engine rejected a constructed move. This
//!   is a normal outcome of human input and is recovered locally.

use serde::{Deserialize, Serialize};

use super::config::ViolationPolicy;
use crate::events::EngineState;

/// A broken ingestion or input contract.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolViolation {
    #[error("exited {incoming:?} while the {pending:?} batch is still in flight")]
    OverlappingBatch {
        pending: EngineState,
        incoming: EngineState,
    },

    #[error("{input} received while input is not accepted")]
    InputNotAccepted { input: &'static str },

    #[error("timeline completion reported with no timeline in flight")]
    NoTimelineInFlight,
}

impl ProtocolViolation {
    /// Apply the policy: panic, or log and carry on.
    ///
    /// Returns the violation so callers can surface it as an `Err`.
    pub fn raise(self, policy: ViolationPolicy) -> Self {
        match policy {
            ViolationPolicy::Panic => panic!("protocol violation: {}", self),
            ViolationPolicy::Ignore => {
                tracing::warn!(violation = %self, "ignoring protocol violation");
                self
            }
        }
    }
}

/// The rule engine refused a move request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("invalid move: {reason}")]
pub struct InvalidMoveError {
    pub reason: String,
}

impl InvalidMoveError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failure to parse a card from its short name (e.g. `"10H"`).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseCardError {
    #[error("empty card name")]
    Empty,

    #[error("unknown suit {0:?}")]
    UnknownSuit(char),

    #[error("unknown rank {0:?}")]
    UnknownRank(String),
}
