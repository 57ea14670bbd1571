//! Timeline data types.
//!
//! A [`Timeline`] is an ordered list of [`TimelineGroup`]s. Steps inside a
//! group run in parallel; groups run one after another in the order they
//! were appended. `RunCallback` steps take no time and fire when their
//! group starts, before the group's motion steps begin.
//!
//! Callbacks are data, not closures: the playback surface interprets the
//! visual ones and the screen coordinator interprets the trailing one.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Card, MarbleRef, Point, SeatId, Size};
use crate::events::EngineState;

/// The visual actor a step animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorId {
    Card(Card),
    Marble(MarbleRef),
    /// The screen as a whole, for callbacks not tied to one actor.
    Stage,
}

/// Identifier of a group within its timeline. Groups are numbered from 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// A callback fired at the start of its group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Callback {
    /// Place the card at `from`, bring it to the front and show it.
    Reveal { from: Point, face_up: bool },

    /// Dealing done: hide every card not in `on_pile` and advance the engine.
    FinalizeDeal { on_pile: Vec<Card> },

    /// Advance the engine.
    Advance,

    /// Lay out `seat`'s hand at the given positions and make it clickable.
    /// The engine stays suspended until the human submits a move.
    ExposeHand { seat: SeatId, slots: Vec<(Card, Point)> },

    /// Leave for the game-over screen. The engine is not advanced again.
    ShowGameOver,
}

impl Callback {
    /// What the screen does once a timeline ending in this callback completes.
    ///
    /// Returns `None` for purely visual callbacks.
    #[must_use]
    pub fn trailing_action(&self) -> Option<TrailingAction> {
        match self {
            Callback::Reveal { .. } => None,
            Callback::FinalizeDeal { .. } | Callback::Advance => Some(TrailingAction::Advance),
            Callback::ExposeHand { .. } => Some(TrailingAction::AwaitInput),
            Callback::ShowGameOver => Some(TrailingAction::GameOver),
        }
    }
}

/// Completion behaviour of a timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailingAction {
    /// Call `advance()` on the engine.
    Advance,
    /// Suspend until the human submits a move.
    AwaitInput,
    /// Switch to the game-over screen.
    GameOver,
}

/// What a step does to its actor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StepKind {
    Move { to: Point },
    Rotate { degrees: f32 },
    Resize { size: Size },
    RunCallback(Callback),
}

impl StepKind {
    #[must_use]
    pub fn is_callback(&self) -> bool {
        matches!(self, StepKind::RunCallback(_))
    }
}

/// One animation step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    pub target: ActorId,
    pub kind: StepKind,
    /// Seconds. Always 0 for callbacks.
    pub duration: f32,
    pub group: GroupId,
}

/// Steps that run concurrently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineGroup {
    pub id: GroupId,
    pub steps: SmallVec<[AnimationStep; 3]>,
}

impl TimelineGroup {
    /// Time until every step of the group has finished.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.steps
            .iter()
            .map(|step| step.duration)
            .fold(0.0, f32::max)
    }

    /// Callbacks of the group, in order.
    pub fn callbacks(&self) -> impl Iterator<Item = (ActorId, &Callback)> {
        self.steps.iter().filter_map(|step| match &step.kind {
            StepKind::RunCallback(callback) => Some((step.target, callback)),
            _ => None,
        })
    }
}

/// Last known transform of an actor after a timeline has played.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FinalPose {
    pub position: Option<Point>,
    pub rotation: Option<f32>,
    pub size: Option<Size>,
}

/// Ordered groups of animation steps built from one event batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    state: EngineState,
    groups: im::Vector<TimelineGroup>,
    /// Cards that end on the discard pile, in landing order.
    discards: Vec<Card>,
}

impl Timeline {
    /// An empty timeline for a batch closed by `state`.
    #[must_use]
    pub fn new(state: EngineState) -> Self {
        Self {
            state,
            groups: im::Vector::new(),
            discards: Vec::new(),
        }
    }

    /// Append a group. Steps given as `(actor, kind, duration)`.
    ///
    /// Returns `None` and appends nothing when `steps` is empty.
    pub fn push_group<I>(&mut self, steps: I) -> Option<GroupId>
    where
        I: IntoIterator<Item = (ActorId, StepKind, f32)>,
    {
        let id = GroupId(self.groups.len() as u32);
        let steps: SmallVec<[AnimationStep; 3]> = steps
            .into_iter()
            .map(|(target, kind, duration)| AnimationStep {
                duration: if kind.is_callback() { 0.0 } else { duration },
                target,
                kind,
                group: id,
            })
            .collect();

        if steps.is_empty() {
            return None;
        }
        self.groups.push_back(TimelineGroup { id, steps });
        Some(id)
    }

    /// Record that `card` lands on the discard pile.
    pub fn push_discard(&mut self, card: Card) {
        if !self.discards.contains(&card) {
            self.discards.push(card);
        }
    }

    /// Forget the discards recorded so far. The deck was reshuffled.
    pub fn clear_discards(&mut self) {
        self.discards.clear();
    }

    /// The state whose exit produced this timeline.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn groups(&self) -> impl Iterator<Item = &TimelineGroup> {
        self.groups.iter()
    }

    #[must_use]
    pub fn group(&self, index: usize) -> Option<&TimelineGroup> {
        self.groups.get(index)
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// All steps in order.
    pub fn steps(&self) -> impl Iterator<Item = &AnimationStep> {
        self.groups.iter().flat_map(|group| group.steps.iter())
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.groups.iter().map(|group| group.steps.len()).sum()
    }

    /// Seconds to play the whole timeline.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.groups.iter().map(TimelineGroup::duration).sum()
    }

    #[must_use]
    pub fn discards(&self) -> &[Card] {
        &self.discards
    }

    /// The callback that decides what happens after playback.
    #[must_use]
    pub fn trailing_callback(&self) -> Option<&Callback> {
        self.groups
            .last()?
            .callbacks()
            .map(|(_, callback)| callback)
            .filter(|callback| callback.trailing_action().is_some())
            .last()
    }

    #[must_use]
    pub fn trailing_action(&self) -> Option<TrailingAction> {
        self.trailing_callback()
            .and_then(Callback::trailing_action)
    }

    /// Final transform of every actor the timeline touches.
    ///
    /// Later steps override earlier ones, so redundant intermediate steps
    /// for the same actor collapse to the last one.
    #[must_use]
    pub fn final_poses(&self) -> FxHashMap<ActorId, FinalPose> {
        let mut poses: FxHashMap<ActorId, FinalPose> = FxHashMap::default();
        for step in self.steps() {
            let pose = poses.entry(step.target);
            match &step.kind {
                StepKind::Move { to } => pose.or_default().position = Some(*to),
                StepKind::Rotate { degrees } => pose.or_default().rotation = Some(*degrees),
                StepKind::Resize { size } => pose.or_default().size = Some(*size),
                StepKind::RunCallback(Callback::Reveal { from, .. }) => {
                    pose.or_default().position = Some(*from);
                }
                StepKind::RunCallback(_) => {}
            }
        }
        poses
    }
}
