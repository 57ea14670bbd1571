//! Core presentation types: seats, marbles, cards, geometry, jitter,
//! configuration and errors.
//!
//! Everything here is plain data shared by the event, timeline, selection
//! and screen modules. Nothing in `core` talks to the rule engine.

pub mod seat;
pub mod card;
pub mod geometry;
pub mod rng;
pub mod config;
pub mod error;

pub use seat::{BoardIndex, MarbleRef, SeatId};
pub use card::{Card, Rank, Suit, FULL_DECK_SIZE, SPLIT_TOTAL};
pub use geometry::{Point, Rect, Size, SurfaceGeometry, BOARD_FILL};
pub use rng::{FixedJitter, JitterSource, JitterState, SeededJitter};
pub use config::{ScreenConfig, SelectionMode, TimelineConfig, ViolationPolicy};
pub use error::{InvalidMoveError, ParseCardError, ProtocolViolation};
