//! Fixed-tick timeline playback.

use smallvec::SmallVec;

use crate::core::{Point, Size};
use crate::timeline::{AnimationStep, StepKind, Timeline, TimelineGroup, TrailingAction};

use super::stage::Stage;

/// Result of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    /// Every group has run. Carries the timeline's trailing action.
    Finished(Option<TrailingAction>),
}

/// Pose value a motion step started from.
#[derive(Clone, Copy, Debug)]
enum StartValue {
    Position(Point),
    Rotation(f32),
    Size(Size),
    /// Callbacks, or motion on an actor the stage does not know.
    None,
}

/// Plays one [`Timeline`] onto a [`Stage`].
///
/// Groups run in order. When a group starts its callbacks are applied and
/// the start value of each motion step is sampled from the stage; motion
/// then interpolates linearly over the step's duration. A tick may cross
/// several group boundaries.
#[derive(Clone, Debug)]
pub struct TimelinePlayer {
    timeline: Timeline,
    group: usize,
    elapsed: f32,
    starts: Option<SmallVec<[StartValue; 4]>>,
}

impl TimelinePlayer {
    #[must_use]
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            group: 0,
            elapsed: 0.0,
            starts: None,
        }
    }

    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.group >= self.timeline.group_count()
    }

    /// Advance playback by `dt` seconds.
    ///
    /// Keeps returning `Finished` once the last group has ended.
    pub fn tick(&mut self, dt: f32, stage: &mut Stage) -> PlaybackStatus {
        let mut remaining = dt.max(0.0);

        while let Some(group) = self.timeline.group(self.group).cloned() {
            let starts = match self.starts.take() {
                Some(starts) => starts,
                None => {
                    self.elapsed = 0.0;
                    start_group(&group, stage)
                }
            };

            let left = group.duration() - self.elapsed;
            if remaining < left {
                self.elapsed += remaining;
                apply_motion(&group, &starts, self.elapsed, stage);
                self.starts = Some(starts);
                return PlaybackStatus::Playing;
            }

            remaining -= left.max(0.0);
            apply_motion(&group, &starts, f32::INFINITY, stage);
            self.group += 1;
        }

        PlaybackStatus::Finished(self.timeline.trailing_action())
    }

    /// Tick at `dt` until finished. Returns the trailing action.
    pub fn run_to_end(&mut self, dt: f32, stage: &mut Stage) -> Option<TrailingAction> {
        let dt = if dt > 0.0 { dt } else { self.timeline.total_duration().max(1.0) };
        loop {
            if let PlaybackStatus::Finished(trailing) = self.tick(dt, stage) {
                return trailing;
            }
        }
    }
}

/// Fire the group's callbacks, then sample where each motion starts.
fn start_group(group: &TimelineGroup, stage: &mut Stage) -> SmallVec<[StartValue; 4]> {
    for (target, callback) in group.callbacks() {
        stage.apply_callback(target, callback);
    }

    group
        .steps
        .iter()
        .map(|step| {
            let Some(pose) = stage.pose(step.target) else {
                return StartValue::None;
            };
            match step.kind {
                StepKind::Move { .. } => StartValue::Position(pose.position),
                StepKind::Rotate { .. } => StartValue::Rotation(pose.rotation),
                StepKind::Resize { .. } => StartValue::Size(pose.size),
                StepKind::RunCallback(_) => StartValue::None,
            }
        })
        .collect()
}

fn apply_motion(group: &TimelineGroup, starts: &[StartValue], elapsed: f32, stage: &mut Stage) {
    for (step, start) in group.steps.iter().zip(starts) {
        if matches!(start, StartValue::None) {
            continue;
        }
        let t = progress(step, elapsed);
        let Some(pose) = stage.pose_mut(step.target) else {
            continue;
        };
        match (&step.kind, *start) {
            (StepKind::Move { to }, StartValue::Position(from)) => {
                pose.position = if t >= 1.0 { *to } else { from.lerp(*to, t) };
            }
            (StepKind::Rotate { degrees }, StartValue::Rotation(from)) => {
                pose.rotation = if t >= 1.0 {
                    *degrees
                } else {
                    from + (degrees - from) * t
                };
            }
            (StepKind::Resize { size }, StartValue::Size(from)) => {
                pose.size = if t >= 1.0 { *size } else { from.lerp(*size, t) };
            }
            _ => {}
        }
    }
}

fn progress(step: &AnimationStep, elapsed: f32) -> f32 {
    if step.duration <= 0.0 {
        1.0
    } else {
        (elapsed / step.duration).min(1.0)
    }
}
