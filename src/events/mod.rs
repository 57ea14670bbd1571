//! Engine event model and per-step buffering.
//!
//! ## Key Components
//!
//! - [`GameEvent`]: tagged notification emitted by the rule engine
//! - [`EngineState`]: the state named by an `ExitedState` boundary
//! - [`TurnEventAggregator`]: buffers events until the boundary
//! - [`EventBatch`]: one finalized step, boundary last
//!
//! ## Example Usage
//!
//! ```
//! use marbles_screen::core::{Card, SeatId, ViolationPolicy};
//! use marbles_screen::events::{EngineState, GameEvent, HandSnapshot, TurnEventAggregator};
//!
//! let mut aggregator = TurnEventAggregator::new(ViolationPolicy::Panic);
//! let ace: Card = "AS".parse().unwrap();
//!
//! let no_hand = |_: SeatId| HandSnapshot::new();
//! aggregator.receive(GameEvent::dealt(ace, SeatId::new(0), SeatId::new(1)), no_hand).unwrap();
//! let batch = aggregator
//!     .receive(GameEvent::exited(EngineState::DealCards), no_hand)
//!     .unwrap()
//!     .expect("boundary closes the batch");
//!
//! assert_eq!(batch.len(), 2);
//! ```

mod event;
mod aggregator;

pub use event::{EngineState, GameEvent};
pub use aggregator::{BatchEntry, EventBatch, HandSnapshot, TurnEventAggregator};
