//! # marbles-screen
//!
//! Presentation synchronization for a turn-based marbles board game.
//!
//! The rule engine lives elsewhere. This crate sits between it and a
//! real-time rendering surface and keeps the two in lockstep.
//!
//! ## Design Principles
//!
//! 1. **Batch per Step**: Events emitted during one engine state transition
//!    are buffered and animated together. The engine is only advanced once
//!    the whole batch has played.
//!
//! 2. **Deterministic Timelines**: The same batch, geometry and jitter seed
//!    always produce the same timeline.
//!
//! 3. **Single Suspension Point**: The only place the loop waits on
//!    anything but playback is human move selection.
//!
//! ## Architecture
//!
//! - **Engine as Collaborator**: `RuleEngine::advance` returns the events of
//!   the step, so the engine never holds a handle back into the screen.
//!
//! - **Callbacks as Data**: Timelines carry `Callback` values that the
//!   playback surface and the coordinator interpret.
//!
//! - **Pure Selection FSM**: Move selection is a function from
//!   `(Selection, SelectionInput)` to the next selection, wrapped by a
//!   controller that handles input gating and submission.
//!
//! ## Modules
//!
//! - `core`: Seats, cards, geometry, jitter, configuration, errors
//! - `events`: Game events and the per-step aggregator
//! - `engine`: `BoardView` and `RuleEngine` traits
//! - `timeline`: Timeline model and builder
//! - `selection`: Human move selection
//! - `screen`: The lifecycle coordinator
//! - `playback`: Headless stage and timeline player

pub mod core;
pub mod events;
pub mod engine;
pub mod timeline;
pub mod selection;
pub mod screen;
pub mod playback;

// Re-export commonly used types
pub use crate::core::{
    BoardIndex, MarbleRef, SeatId,
    Card, Rank, Suit,
    Point, Rect, Size, SurfaceGeometry,
    JitterSource, SeededJitter, FixedJitter,
    ScreenConfig, TimelineConfig, SelectionMode, ViolationPolicy,
    InvalidMoveError, ProtocolViolation,
};

pub use crate::events::{EngineState, GameEvent, EventBatch, TurnEventAggregator};

pub use crate::engine::{BoardView, RuleEngine, EngineStep, DecisionRequest, MoveRequest, ValidatedMove};

pub use crate::timeline::{
    ActorId, AnimationStep, Callback, StepKind,
    Timeline, TimelineGroup, TimelineBuilder, TrailingAction,
};

pub use crate::selection::{MoveSelectionController, PendingMove, SelectionPhase, SelectionOutcome};

pub use crate::screen::{ScreenLifecycleCoordinator, ScreenPhase, ScreenStats};

pub use crate::playback::{Stage, TimelinePlayer, PlaybackStatus};
