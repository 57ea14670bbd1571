//! Animation timelines.
//!
//! A batch of engine events becomes one [`Timeline`]: ordered groups of
//! parallel [`AnimationStep`]s, ending with the callback that decides
//! whether the engine advances, waits for the human, or the game ends.
//!
//! ## Key Components
//!
//! - [`Timeline`], [`TimelineGroup`], [`AnimationStep`]: the data model
//! - [`StepKind`], [`Callback`]: what a step does
//! - [`TimelineBuilder`]: batch + board geometry to timeline
//!
//! ## Final-frame guarantee
//!
//! When a timeline has fully played, every actor it references sits where
//! the last event about that actor in the batch put it. Intermediate
//! frames for redundant events are not guaranteed.

mod step;
mod builder;

pub use step::{
    ActorId, AnimationStep, Callback, FinalPose, GroupId, StepKind, Timeline, TimelineGroup,
    TrailingAction,
};
pub use builder::{discard_pile_origin, BuildContext, TimelineBuilder};
