//! Actor poses on a headless stage.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::core::{Card, MarbleRef, Point, SeatId, Size};
use crate::timeline::{ActorId, Callback};

/// Transform and visibility of one actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorPose {
    pub position: Point,
    /// Degrees.
    pub rotation: f32,
    pub size: Size,
    pub visible: bool,
    pub face_up: bool,
    /// Draw order. Higher is in front.
    pub z: u32,
}

/// Every visual actor of the screen and its current pose.
#[derive(Clone, Debug, Default)]
pub struct Stage {
    actors: FxHashMap<ActorId, ActorPose>,
    next_z: u32,
    exposed: Option<(SeatId, Vec<Card>)>,
    game_over: bool,
}

impl Stage {
    /// A stage holding the full deck, hidden and face down.
    #[must_use]
    pub fn with_deck(card_size: Size) -> Self {
        let mut stage = Self::default();
        for card in Card::full_deck() {
            stage.actors.insert(
                ActorId::Card(card),
                ActorPose {
                    size: card_size,
                    ..ActorPose::default()
                },
            );
        }
        stage
    }

    /// Place a marble on the stage.
    pub fn add_marble(&mut self, marble: MarbleRef, position: Point, size: Size) {
        self.actors.insert(
            ActorId::Marble(marble),
            ActorPose {
                position,
                size,
                visible: true,
                ..ActorPose::default()
            },
        );
    }

    #[must_use]
    pub fn pose(&self, actor: ActorId) -> Option<&ActorPose> {
        self.actors.get(&actor)
    }

    pub fn pose_mut(&mut self, actor: ActorId) -> Option<&mut ActorPose> {
        let pose = self.actors.get_mut(&actor);
        if pose.is_none() {
            tracing::warn!(?actor, "no actor on stage");
        }
        pose
    }

    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// The hand currently laid out for clicking.
    #[must_use]
    pub fn exposed_hand(&self) -> Option<(SeatId, &[Card])> {
        self.exposed
            .as_ref()
            .map(|(seat, cards)| (*seat, cards.as_slice()))
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Cards currently visible, back to front.
    #[must_use]
    pub fn visible_cards(&self) -> Vec<Card> {
        let mut cards: Vec<(u32, Card)> = self
            .actors
            .iter()
            .filter_map(|(actor, pose)| match actor {
                ActorId::Card(card) if pose.visible => Some((pose.z, *card)),
                _ => None,
            })
            .collect();
        cards.sort();
        cards.into_iter().map(|(_, card)| card).collect()
    }

    /// Run the visual part of a callback.
    pub fn apply_callback(&mut self, target: ActorId, callback: &Callback) {
        match callback {
            Callback::Reveal { from, face_up } => {
                let z = self.bring_forward();
                if let Some(pose) = self.pose_mut(target) {
                    pose.position = *from;
                    pose.visible = true;
                    pose.face_up = *face_up;
                    pose.z = z;
                }
            }
            Callback::FinalizeDeal { on_pile } => {
                let keep: FxHashSet<Card> = on_pile.iter().copied().collect();
                for (actor, pose) in &mut self.actors {
                    if matches!(actor, ActorId::Card(card) if !keep.contains(card)) {
                        pose.visible = false;
                    }
                }
            }
            Callback::ExposeHand { seat, slots } => {
                for &(card, position) in slots {
                    let z = self.bring_forward();
                    if let Some(pose) = self.pose_mut(ActorId::Card(card)) {
                        pose.position = position;
                        pose.rotation = 0.0;
                        pose.visible = true;
                        pose.face_up = true;
                        pose.z = z;
                    }
                }
                self.exposed = Some((*seat, slots.iter().map(|(card, _)| *card).collect()));
            }
            Callback::Advance => self.exposed = None,
            Callback::ShowGameOver => {
                self.exposed = None;
                self.game_over = true;
            }
        }
    }

    fn bring_forward(&mut self) -> u32 {
        self.next_z += 1;
        self.next_z
    }
}
