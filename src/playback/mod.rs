//! Headless playback surface.
//!
//! A [`Stage`] holds the pose of every card and marble actor; a
//! [`TimelinePlayer`] runs one timeline onto it at whatever tick rate the
//! host loop uses. Renderers can mirror the stage each frame, and the
//! integration tests use it to check where actors end up.
//!
//! ```
//! use marbles_screen::core::Size;
//! use marbles_screen::events::EngineState;
//! use marbles_screen::playback::{PlaybackStatus, Stage, TimelinePlayer};
//! use marbles_screen::timeline::Timeline;
//!
//! let mut stage = Stage::with_deck(Size::new(40.0, 60.0));
//! let mut player = TimelinePlayer::new(Timeline::new(EngineState::PlayerTurn));
//! assert_eq!(player.tick(1.0 / 60.0, &mut stage), PlaybackStatus::Finished(None));
//! ```

mod player;
mod stage;

pub use player::{PlaybackStatus, TimelinePlayer};
pub use stage::{ActorPose, Stage};
