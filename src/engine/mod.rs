//! Seams to the external rule engine.
//!
//! The engine owns the board, the deck and legality. The screen reads
//! geometry through `BoardView` and drives play through `RuleEngine`, but
//! never interprets game rules itself.

mod traits;

pub use traits::{BoardView, DecisionRequest, EngineStep, MoveRequest, RuleEngine, ValidatedMove};
