//! The screen lifecycle coordinator.
//!
//! [`ScreenLifecycleCoordinator`] is the only caller of
//! [`RuleEngine::advance`]. Engine and presentation strictly alternate:
//!
//! ```text
//! advance() -> events -> batch -> timeline -> playback
//!     ^                                          |
//!     |            on_timeline_complete()        v
//!     +------ Advance ------------------- trailing action
//!     |                                          |
//!     +-- submitted move <-- clicks <-- AwaitInput
//! ```
//!
//! Suspension for human input is the only point where the loop waits on
//! something other than the playback surface.

use im::Vector;

use crate::core::{
    Card, JitterSource, MarbleRef, ProtocolViolation, ScreenConfig, SeatId, SeededJitter,
    SurfaceGeometry,
};
use crate::engine::{DecisionRequest, RuleEngine};
use crate::events::{EngineState, GameEvent, HandSnapshot, TurnEventAggregator};
use crate::selection::{MoveSelectionController, SelectionOutcome, SelectionPhase};
use crate::timeline::{BuildContext, Timeline, TimelineBuilder, TrailingAction};

use super::stats::ScreenStats;

/// Where the screen stands in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenPhase {
    /// `start` has not been called.
    NotStarted,
    /// The engine was advanced and no boundary has closed a batch yet.
    Running,
    /// A timeline built from the batch closed by this state is playing.
    Playing(EngineState),
    /// Suspended until the human submits a move.
    AwaitingInput,
    /// The game ended. Carries the final statistics.
    GameOver(ScreenStats),
}

/// Drives a [`RuleEngine`] and keeps the screen in step with it.
pub struct ScreenLifecycleCoordinator<E: RuleEngine, J: JitterSource = SeededJitter> {
    engine: E,
    config: ScreenConfig,
    aggregator: TurnEventAggregator,
    builder: TimelineBuilder<J>,
    controller: MoveSelectionController,
    geometry: SurfaceGeometry,
    current: Option<Timeline>,
    phase: ScreenPhase,
    discard_pile: Vector<Card>,
    stats: ScreenStats,
}

impl<E: RuleEngine> ScreenLifecycleCoordinator<E, SeededJitter> {
    /// Create a coordinator whose jitter is seeded from `config.jitter_seed`.
    pub fn new(engine: E, config: ScreenConfig) -> Self {
        let jitter = SeededJitter::new(config.jitter_seed);
        Self::with_jitter(engine, config, jitter)
    }
}

impl<E: RuleEngine, J: JitterSource> ScreenLifecycleCoordinator<E, J> {
    /// Create a coordinator with an explicit jitter source.
    pub fn with_jitter(engine: E, config: ScreenConfig, jitter: J) -> Self {
        let policy = config.violation_policy;
        Self {
            aggregator: TurnEventAggregator::new(policy),
            builder: TimelineBuilder::new(config.timeline.clone(), jitter),
            controller: MoveSelectionController::new(config.human_seat, config.selection_mode, policy),
            engine,
            config,
            geometry: SurfaceGeometry::default(),
            current: None,
            phase: ScreenPhase::NotStarted,
            discard_pile: Vector::new(),
            stats: ScreenStats::default(),
        }
    }

    /// Start the game with the first engine step.
    ///
    /// Calling it again after the game has started does nothing.
    pub fn start(&mut self) {
        if self.phase != ScreenPhase::NotStarted {
            tracing::warn!(phase = ?self.phase, "screen already started");
            return;
        }
        tracing::info!(human = %self.config.human_seat, "starting game");
        self.advance();
    }

    /// Ingest one event pushed by the engine.
    ///
    /// Returns the new timeline when `event` closed a batch.
    ///
    /// A `CannotPlay` snapshots the seat's hand from the engine right away.
    pub fn feed_event(&mut self, event: GameEvent) -> Result<Option<&Timeline>, ProtocolViolation> {
        self.ingest(event, None)
    }

    fn ingest(
        &mut self,
        event: GameEvent,
        recorded_hand: Option<HandSnapshot>,
    ) -> Result<Option<&Timeline>, ProtocolViolation> {
        if event == GameEvent::ShuffledDeck {
            tracing::debug!(cleared = self.discard_pile.len(), "deck shuffled");
            self.discard_pile.clear();
        }
        self.stats.record(&event);

        let engine = &self.engine;
        let snapshot = |seat| recorded_hand.unwrap_or_else(|| engine.hand(seat));
        let Some(batch) = self.aggregator.receive(event, snapshot)? else {
            return Ok(None);
        };

        let ctx = BuildContext {
            board: &self.engine,
            geometry: self.geometry,
            awaiting_input: self.controller.is_accepting().then_some(self.config.human_seat),
            discard_pile: self.discard_pile.clone(),
        };
        let timeline = self.builder.build(&batch, &ctx);

        self.discard_pile.extend(timeline.discards().iter().copied());
        self.stats.batches += 1;
        self.phase = ScreenPhase::Playing(timeline.state());
        Ok(Some(&*self.current.insert(timeline)))
    }

    /// Ingest an `ExitedState` boundary.
    pub fn on_exited_state(&mut self, state: EngineState) -> Result<Option<&Timeline>, ProtocolViolation> {
        self.feed_event(GameEvent::exited(state))
    }

    /// The timeline the playback surface should run.
    #[must_use]
    pub fn current_timeline(&self) -> Option<&Timeline> {
        self.current.as_ref()
    }

    /// Called by the playback surface exactly once per timeline.
    ///
    /// Acts on the timeline's trailing callback: advance the engine,
    /// suspend for input or end the game.
    pub fn on_timeline_complete(&mut self) -> Result<(), ProtocolViolation> {
        let Some(timeline) = self.current.take() else {
            return Err(ProtocolViolation::NoTimelineInFlight.raise(self.config.violation_policy));
        };
        self.aggregator.release();

        match timeline.trailing_action() {
            Some(TrailingAction::Advance) if self.controller.is_accepting() => {
                // The engine is blocked on a decision it already asked for
                tracing::warn!(state = %timeline.state(), "not advancing while a decision is pending");
                self.phase = ScreenPhase::AwaitingInput;
            }
            Some(TrailingAction::Advance) => self.advance(),
            Some(TrailingAction::AwaitInput) => {
                tracing::debug!("hand exposed, waiting for a move");
                self.phase = ScreenPhase::AwaitingInput;
            }
            Some(TrailingAction::GameOver) => {
                tracing::info!(stats = ?self.stats, "game over");
                self.controller.disable_input();
                self.phase = ScreenPhase::GameOver(self.stats);
            }
            None => {
                tracing::warn!(state = %timeline.state(), "timeline has no trailing action");
                self.phase = ScreenPhase::Running;
            }
        }
        Ok(())
    }

    /// A card of the human hand was clicked.
    ///
    /// Clicks count only once the timeline exposing the hand has completed.
    pub fn on_card_clicked(&mut self, card: Card) -> Result<SelectionOutcome, ProtocolViolation> {
        self.check_suspended("card click")?;
        self.controller.select_card(card)
    }

    /// A split value option was clicked.
    pub fn on_split_value_clicked(&mut self, value: u8) -> Result<SelectionOutcome, ProtocolViolation> {
        self.check_suspended("split value click")?;
        self.controller.select_split_value(value)
    }

    /// A marble was clicked. Advances the engine if this submits a move.
    pub fn on_marble_clicked(
        &mut self,
        seat: SeatId,
        index: u8,
    ) -> Result<SelectionOutcome, ProtocolViolation> {
        self.check_suspended("marble click")?;
        let outcome = self
            .controller
            .select_marble(MarbleRef::new(seat, index), &mut self.engine)?;

        match &outcome {
            SelectionOutcome::Submitted(_) => {
                self.stats.moves_accepted += 1;
                self.advance();
            }
            SelectionOutcome::Rejected(_) => self.stats.moves_rejected += 1,
            _ => {}
        }
        Ok(outcome)
    }

    /// The render surface changed size. Applies to timelines built later.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.geometry = SurfaceGeometry::fit(width, height);
        tracing::debug!(width = self.geometry.width, height = self.geometry.height, "board resized");
    }

    #[must_use]
    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    #[must_use]
    pub fn is_awaiting_input(&self) -> bool {
        self.controller.is_accepting()
    }

    #[must_use]
    pub fn selection_phase(&self) -> SelectionPhase {
        self.controller.phase()
    }

    /// Card to highlight in the human hand.
    #[must_use]
    pub fn selected_card(&self) -> Option<Card> {
        self.controller.selected_card()
    }

    #[must_use]
    pub fn controller(&self) -> &MoveSelectionController {
        &self.controller
    }

    /// Cards visually on the discard pile, oldest first.
    #[must_use]
    pub fn discard_pile(&self) -> Vector<Card> {
        self.discard_pile.clone()
    }

    #[must_use]
    pub fn stats(&self) -> ScreenStats {
        self.stats
    }

    #[must_use]
    pub fn phase(&self) -> ScreenPhase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn check_suspended(&self, input: &'static str) -> Result<(), ProtocolViolation> {
        if self.phase == ScreenPhase::AwaitingInput {
            return Ok(());
        }
        tracing::debug!(phase = ?self.phase, input, "click outside suspension");
        Err(ProtocolViolation::InputNotAccepted { input }.raise(self.config.violation_policy))
    }

    fn advance(&mut self) {
        let mut step = self.engine.advance();
        let events = std::mem::take(&mut step.events);
        let decision = step.decision.take();
        self.phase = ScreenPhase::Running;
        tracing::debug!(events = events.len(), decision = decision.is_some(), "engine advanced");

        // The decision is taken first so the batch closing this step knows
        // whether to expose the hand.
        if let Some(decision) = decision {
            self.on_decision(decision);
        }

        for event in events {
            let recorded = match event {
                GameEvent::CannotPlay { seat } => step.take_hand_snapshot(seat),
                _ => None,
            };
            if let Err(violation) = self.ingest(event, recorded) {
                tracing::debug!(%violation, "event dropped");
            }
        }
    }

    fn on_decision(&mut self, decision: DecisionRequest) {
        let DecisionRequest {
            seat,
            available_moves,
        } = decision;

        if seat != self.controller.seat() {
            // Only the human seat is wired to the screen
            tracing::warn!(%seat, "decision requested for a seat without input, playing first move");
            if let Some(chosen) = available_moves.into_iter().next() {
                self.engine.select_move(seat, chosen);
            }
            return;
        }

        if let Some(chosen) = self.controller.enable_input(available_moves) {
            self.engine.select_move(seat, chosen);
        }
    }
}
