//! The game screen.
//!
//! [`ScreenLifecycleCoordinator`] owns the rule engine, the event
//! aggregator, the timeline builder and the move selection controller, and
//! is the single place where the engine is advanced.
//!
//! The render surface talks to it through three groups of calls:
//!
//! - ingestion: `feed_event`, `on_exited_state`
//! - playback: `current_timeline`, `on_timeline_complete`
//! - input: `on_card_clicked`, `on_split_value_clicked`, `on_marble_clicked`

mod coordinator;
mod stats;

pub use coordinator::{ScreenLifecycleCoordinator, ScreenPhase};
pub use stats::ScreenStats;
