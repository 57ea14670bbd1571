//! Screen configuration types.
//!
//! - `TimelineConfig`: durations, jitter range and hand layout used when
//!   converting event batches into timelines
//! - `ScreenConfig`: which seat is human, how it chooses moves, how protocol
//!   violations are treated
//!
//! Durations are constants of the configuration, never computed from the
//! events themselves.

use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::seat::SeatId;

/// What to do when a caller breaks the ingestion or input contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationPolicy {
    /// Fail fast. The default in debug builds.
    Panic,
    /// Log a warning and drop the offending call. The default in release builds.
    Ignore,
}

impl Default for ViolationPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ViolationPolicy::Panic
        } else {
            ViolationPolicy::Ignore
        }
    }
}

/// How the human seat answers a decision request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Wait for card and marble clicks.
    #[default]
    Interactive,
    /// Take the first legal move immediately. Demo and soak-test mode.
    AutoSelectFirst,
}

/// Timeline construction parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Seconds for one card to travel from the dealer to a seat.
    pub deal_duration: f32,

    /// Seconds for a marble to travel to its new space.
    pub move_duration: f32,

    /// Seconds for a played card to travel to the discard pile.
    pub play_duration: f32,

    /// Maximum rotation jitter, in degrees, either way.
    pub jitter_degrees: f32,

    /// Where the first card of the exposed human hand is placed.
    pub hand_origin: Point,

    /// Horizontal distance between exposed hand cards.
    pub hand_spacing: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            deal_duration: 0.1,
            move_duration: 0.5,
            play_duration: 0.5,
            jitter_degrees: 8.0,
            hand_origin: Point::new(-200.0, 0.0),
            hand_spacing: 50.0,
        }
    }
}

impl TimelineConfig {
    #[must_use]
    pub fn with_deal_duration(mut self, seconds: f32) -> Self {
        self.deal_duration = seconds;
        self
    }

    #[must_use]
    pub fn with_move_duration(mut self, seconds: f32) -> Self {
        self.move_duration = seconds;
        self
    }

    #[must_use]
    pub fn with_play_duration(mut self, seconds: f32) -> Self {
        self.play_duration = seconds;
        self
    }

    #[must_use]
    pub fn with_jitter(mut self, degrees: f32) -> Self {
        self.jitter_degrees = degrees;
        self
    }

    /// Set the exposed hand layout.
    #[must_use]
    pub fn with_hand_layout(mut self, origin: Point, spacing: f32) -> Self {
        self.hand_origin = origin;
        self.hand_spacing = spacing;
        self
    }

    /// Position of the `slot`-th card of the exposed hand.
    #[must_use]
    pub fn hand_slot(&self, slot: usize) -> Point {
        Point::new(
            self.hand_origin.x + self.hand_spacing * slot as f32,
            self.hand_origin.y,
        )
    }
}

/// Complete screen configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// The seat driven by clicks.
    pub human_seat: SeatId,

    /// How that seat answers decision requests.
    pub selection_mode: SelectionMode,

    /// Treatment of protocol violations.
    pub violation_policy: ViolationPolicy,

    /// Seed for the rotation jitter stream.
    pub jitter_seed: u64,

    /// Timeline construction parameters.
    pub timeline: TimelineConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            human_seat: SeatId::new(0),
            selection_mode: SelectionMode::default(),
            violation_policy: ViolationPolicy::default(),
            jitter_seed: 42,
            timeline: TimelineConfig::default(),
        }
    }
}

impl ScreenConfig {
    #[must_use]
    pub fn with_human_seat(mut self, seat: SeatId) -> Self {
        self.human_seat = seat;
        self
    }

    #[must_use]
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    #[must_use]
    pub fn with_violation_policy(mut self, policy: ViolationPolicy) -> Self {
        self.violation_policy = policy;
        self
    }

    #[must_use]
    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = seed;
        self
    }

    #[must_use]
    pub fn with_timeline(mut self, timeline: TimelineConfig) -> Self {
        self.timeline = timeline;
        self
    }
}
