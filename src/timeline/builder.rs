//! Conversion of event batches into timelines.
//!
//! Dispatch is on the batch's boundary state:
//!
//! - **DetermineDealer / DealCards**: one sequential group per dealt card
//!   (reveal at the dealer, then move and rotate together), then a
//!   `FinalizeDeal` group. If the human already owes a decision, the final
//!   group also exposes their hand.
//! - **PlayerTurn**: groups in arrival order. A forced discard becomes one
//!   parallel group flying the whole captured hand to the pile; each marble
//!   move and each remaining played card gets its own group. The trailing
//!   group either exposes the human hand or advances the engine.
//! - **GameOver**: a single `ShowGameOver` group.
//!
//! `ShuffledDeck` never produces steps. Cards played before it in the same
//! batch do not end on the pile.

use im::Vector;
use rustc_hash::FxHashSet;

use crate::core::{
    Card, JitterSource, Point, SeatId, SeededJitter, Size, SurfaceGeometry, TimelineConfig,
};
use crate::engine::BoardView;
use crate::events::{EngineState, EventBatch, GameEvent};

use super::step::{ActorId, Callback, StepKind, Timeline};

/// Inputs the builder reads besides the batch itself.
pub struct BuildContext<'a, B: BoardView + ?Sized> {
    /// Board geometry and hands.
    pub board: &'a B,

    /// Current size of the board on the render surface.
    pub geometry: SurfaceGeometry,

    /// The human seat, when the engine is blocked on its input.
    pub awaiting_input: Option<SeatId>,

    /// Cards on the discard pile when the batch closed.
    pub discard_pile: Vector<Card>,
}

/// Builds a [`Timeline`] from an [`EventBatch`].
#[derive(Clone, Debug)]
pub struct TimelineBuilder<J: JitterSource = SeededJitter> {
    config: TimelineConfig,
    jitter: J,
}

impl TimelineBuilder<SeededJitter> {
    /// Builder with a seeded jitter stream.
    #[must_use]
    pub fn seeded(config: TimelineConfig, seed: u64) -> Self {
        Self::new(config, SeededJitter::new(seed))
    }
}

impl<J: JitterSource> TimelineBuilder<J> {
    #[must_use]
    pub fn new(config: TimelineConfig, jitter: J) -> Self {
        Self { config, jitter }
    }

    #[must_use]
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Convert one batch into a timeline.
    pub fn build<B>(&mut self, batch: &EventBatch, ctx: &BuildContext<'_, B>) -> Timeline
    where
        B: BoardView + ?Sized,
    {
        let state = batch.state();
        let mut timeline = Timeline::new(state);

        match state {
            EngineState::DetermineDealer | EngineState::DealCards => {
                self.build_deal(batch, ctx, &mut timeline);
            }
            EngineState::PlayerTurn => self.build_turn(batch, ctx, &mut timeline),
            EngineState::GameOver => {
                let skipped = batch.len().saturating_sub(1);
                if skipped > 0 {
                    tracing::debug!(skipped, "game over batch carries events that are not animated");
                }
                timeline.push_group([(
                    ActorId::Stage,
                    StepKind::RunCallback(Callback::ShowGameOver),
                    0.0,
                )]);
            }
        }

        tracing::debug!(
            %state,
            groups = timeline.group_count(),
            steps = timeline.step_count(),
            "built timeline"
        );
        timeline
    }

    fn build_deal<B>(&mut self, batch: &EventBatch, ctx: &BuildContext<'_, B>, timeline: &mut Timeline)
    where
        B: BoardView + ?Sized,
    {
        let face_up = batch.state() == EngineState::DealCards;
        let card_size = self.card_size(ctx);

        for event in batch.events() {
            let GameEvent::DealtCard {
                card,
                dealer,
                recipient,
            } = *event
            else {
                continue;
            };

            let from = ctx
                .geometry
                .top_left(ctx.board.bounds_for_board_index(ctx.board.safe_board_index(dealer)));
            let home_slot = ctx.board.home_min_board_index(recipient).next();
            let to = ctx
                .geometry
                .centered(ctx.board.bounds_for_board_index(home_slot), card_size);
            let degrees = self.jitter.next_angle(self.config.jitter_degrees);
            let actor = ActorId::Card(card);
            let duration = self.config.deal_duration;

            timeline.push_group([
                (actor, StepKind::RunCallback(Callback::Reveal { from, face_up }), 0.0),
                (actor, StepKind::Move { to }, duration),
                (actor, StepKind::Rotate { degrees }, duration),
            ]);
        }

        let finalize = Callback::FinalizeDeal {
            on_pile: ctx.discard_pile.iter().copied().collect(),
        };
        let mut last = vec![(ActorId::Stage, StepKind::RunCallback(finalize), 0.0)];
        if let Some(seat) = ctx.awaiting_input {
            last.push((ActorId::Stage, StepKind::RunCallback(self.expose_hand(ctx, seat)), 0.0));
        }
        timeline.push_group(last);
    }

    fn build_turn<B>(&mut self, batch: &EventBatch, ctx: &BuildContext<'_, B>, timeline: &mut Timeline)
    where
        B: BoardView + ?Sized,
    {
        // Cards already flown by a forced discard are not animated again
        // when the engine also reports them as played.
        let forced: FxHashSet<Card> = batch
            .entries()
            .iter()
            .filter(|entry| matches!(entry.event, GameEvent::CannotPlay { .. }))
            .filter_map(|entry| entry.hand_snapshot.as_ref())
            .flat_map(|hand| hand.iter().copied())
            .collect();

        for entry in batch.entries() {
            match entry.event {
                GameEvent::CannotPlay { seat } => {
                    let hand = entry.hand_snapshot.as_deref().unwrap_or(&[]);
                    let steps: Vec<_> = hand
                        .iter()
                        .flat_map(|&card| self.discard_steps(ctx, seat, card))
                        .collect();
                    if timeline.push_group(steps).is_some() {
                        hand.iter().for_each(|&card| timeline.push_discard(card));
                    }
                }
                GameEvent::MovedMarble { marble, new_index } => {
                    let to = ctx.geometry.bottom_left(ctx.board.bounds_for_marble(new_index));
                    let degrees = ctx.board.orientation_for_board_index(new_index);
                    let actor = ActorId::Marble(marble);
                    let duration = self.config.move_duration;
                    timeline.push_group([
                        (actor, StepKind::Move { to }, duration),
                        (actor, StepKind::Rotate { degrees }, duration),
                    ]);
                }
                GameEvent::PlayedCard { card, seat } => {
                    if forced.contains(&card) {
                        tracing::debug!(%card, "played card already covered by forced discard");
                        continue;
                    }
                    let steps = self.discard_steps(ctx, seat, card);
                    timeline.push_group(steps);
                    timeline.push_discard(card);
                }
                GameEvent::ShuffledDeck => {
                    tracing::debug!(dropped = timeline.discards().len(), "pile reshuffled mid-batch");
                    timeline.clear_discards();
                }
                GameEvent::DealtCard { .. } | GameEvent::ExitedState { .. } => {}
            }
        }

        let trailing = match ctx.awaiting_input {
            Some(seat) => self.expose_hand(ctx, seat),
            None => Callback::Advance,
        };
        timeline.push_group([(ActorId::Stage, StepKind::RunCallback(trailing), 0.0)]);
    }

    /// Lay out `seat`'s current hand for input.
    fn expose_hand<B>(&self, ctx: &BuildContext<'_, B>, seat: SeatId) -> Callback
    where
        B: BoardView + ?Sized,
    {
        let slots = ctx
            .board
            .hand(seat)
            .into_iter()
            .enumerate()
            .map(|(slot, card)| (card, self.config.hand_slot(slot)))
            .collect();
        tracing::info!(%seat, "suspending for human input");
        Callback::ExposeHand { seat, slots }
    }

    /// Steps that fly `card` from `seat` onto the discard pile.
    fn discard_steps<B>(
        &mut self,
        ctx: &BuildContext<'_, B>,
        seat: SeatId,
        card: Card,
    ) -> [(ActorId, StepKind, f32); 4]
    where
        B: BoardView + ?Sized,
    {
        let pile = ctx.board.bounds_for_discard_pile();
        let from = ctx
            .geometry
            .top_left(ctx.board.bounds_for_board_index(ctx.board.safe_board_index(seat)));
        let to = ctx.geometry.bottom_left(pile);
        let size = ctx.geometry.scale(pile);
        let degrees = self.jitter.next_angle(self.config.jitter_degrees);
        let actor = ActorId::Card(card);
        let duration = self.config.play_duration;

        [
            (
                actor,
                StepKind::RunCallback(Callback::Reveal {
                    from,
                    face_up: true,
                }),
                0.0,
            ),
            (actor, StepKind::Move { to }, duration),
            (actor, StepKind::Resize { size }, duration),
            (actor, StepKind::Rotate { degrees }, duration),
        ]
    }

    fn card_size<B>(&self, ctx: &BuildContext<'_, B>) -> Size
    where
        B: BoardView + ?Sized,
    {
        ctx.geometry.scale(ctx.board.bounds_for_discard_pile())
    }
}

/// Position of the discard pile on the surface.
#[must_use]
pub fn discard_pile_origin<B: BoardView + ?Sized>(board: &B, geometry: SurfaceGeometry) -> Point {
    geometry.bottom_left(board.bounds_for_discard_pile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoardIndex, FixedJitter, MarbleRef, Rank, Rect, Suit, ViolationPolicy};
    use crate::events::{HandSnapshot, TurnEventAggregator};
    use crate::timeline::TrailingAction;
    use smallvec::smallvec;

    /// Four seats, 100 spaces laid out on a 10x10 grid.
    struct GridBoard {
        hands: Vec<HandSnapshot>,
    }

    impl GridBoard {
        fn new() -> Self {
            Self {
                hands: vec![HandSnapshot::new(); 4],
            }
        }
    }

    impl BoardView for GridBoard {
        fn hand(&self, seat: SeatId) -> HandSnapshot {
            self.hands[seat.index()].clone()
        }

        fn safe_board_index(&self, seat: SeatId) -> BoardIndex {
            BoardIndex::new(seat.0 as u16 * 18)
        }

        fn home_min_board_index(&self, seat: SeatId) -> BoardIndex {
            BoardIndex::new(72 + seat.0 as u16 * 4)
        }

        fn bounds_for_board_index(&self, index: BoardIndex) -> Rect {
            let (col, row) = (index.0 % 10, index.0 / 10);
            Rect::new(col as f32 * 0.1, row as f32 * 0.1, 0.1, 0.1)
        }

        fn bounds_for_marble(&self, index: BoardIndex) -> Rect {
            self.bounds_for_board_index(index)
        }

        fn bounds_for_discard_pile(&self) -> Rect {
            Rect::new(0.45, 0.45, 0.1, 0.1)
        }

        fn orientation_for_board_index(&self, index: BoardIndex) -> f32 {
            f32::from(index.0 % 4) * 90.0
        }
    }

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn batch_of(board: &GridBoard, events: Vec<GameEvent>) -> EventBatch {
        let mut aggregator = TurnEventAggregator::new(ViolationPolicy::Panic);
        let mut batch = None;
        for event in events {
            batch = aggregator.receive(event, |seat| board.hand(seat)).unwrap();
        }
        batch.expect("events end with a boundary")
    }

    fn builder() -> TimelineBuilder<FixedJitter> {
        TimelineBuilder::new(TimelineConfig::default(), FixedJitter(3.0))
    }

    fn ctx(board: &GridBoard, awaiting_input: Option<SeatId>) -> BuildContext<'_, GridBoard> {
        BuildContext {
            board,
            geometry: SurfaceGeometry::new(100.0, 100.0),
            awaiting_input,
            discard_pile: Vector::new(),
        }
    }

    #[test]
    fn test_deal_groups_are_sequential() {
        let board = GridBoard::new();
        let batch = batch_of(
            &board,
            vec![
                GameEvent::dealt(card("AS"), SeatId::new(0), SeatId::new(1)),
                GameEvent::dealt(card("2H"), SeatId::new(0), SeatId::new(2)),
                GameEvent::exited(EngineState::DealCards),
            ],
        );

        let timeline = builder().build(&batch, &ctx(&board, None));

        assert_eq!(timeline.group_count(), 3);
        for (index, expected) in [card("AS"), card("2H")].into_iter().enumerate() {
            let group = timeline.group(index).unwrap();
            assert_eq!(group.steps.len(), 3);
            assert!(group.steps.iter().all(|s| s.target == ActorId::Card(expected)));
            assert_eq!(group.duration(), 0.1);
            assert!(matches!(
                group.steps[0].kind,
                StepKind::RunCallback(Callback::Reveal { face_up: true, .. })
            ));
            assert_eq!(group.steps[2].kind, StepKind::Rotate { degrees: 3.0 });
        }
        assert_eq!(timeline.trailing_action(), Some(TrailingAction::Advance));
        assert_eq!(
            timeline.trailing_callback(),
            Some(&Callback::FinalizeDeal { on_pile: vec![] })
        );
    }

    #[test]
    fn test_deal_destination_is_first_home_slot() {
        let board = GridBoard::new();
        let batch = batch_of(
            &board,
            vec![
                GameEvent::dealt(card("KC"), SeatId::new(0), SeatId::new(1)),
                GameEvent::exited(EngineState::DealCards),
            ],
        );
        let timeline = builder().build(&batch, &ctx(&board, None));

        // Seat 1 home starts at 76, first slot 77: column 7, row 7
        let geometry = SurfaceGeometry::new(100.0, 100.0);
        let expected = geometry.centered(
            board.bounds_for_board_index(BoardIndex::new(77)),
            geometry.scale(board.bounds_for_discard_pile()),
        );
        let poses = timeline.final_poses();
        assert_eq!(poses[&ActorId::Card(card("KC"))].position, Some(expected));
    }

    #[test]
    fn test_determine_dealer_deals_face_down() {
        let board = GridBoard::new();
        let batch = batch_of(
            &board,
            vec![
                GameEvent::dealt(card("JH"), SeatId::new(3), SeatId::new(0)),
                GameEvent::exited(EngineState::DetermineDealer),
            ],
        );
        let timeline = builder().build(&batch, &ctx(&board, None));
        assert!(matches!(
            timeline.group(0).unwrap().steps[0].kind,
            StepKind::RunCallback(Callback::Reveal { face_up: false, .. })
        ));
    }

    #[test]
    fn test_marble_move_then_advance() {
        let board = GridBoard::new();
        let marble = MarbleRef::new(SeatId::new(1), 0);
        let batch = batch_of(
            &board,
            vec![
                GameEvent::moved(marble, BoardIndex::new(5)),
                GameEvent::exited(EngineState::PlayerTurn),
            ],
        );
        let timeline = builder().build(&batch, &ctx(&board, None));

        assert_eq!(timeline.group_count(), 2);
        let group = timeline.group(0).unwrap();
        assert_eq!(group.steps.len(), 2);
        assert_eq!(group.duration(), 0.5);
        assert_eq!(group.steps[1].kind, StepKind::Rotate { degrees: 90.0 });
        assert_eq!(timeline.trailing_action(), Some(TrailingAction::Advance));
    }

    #[test]
    fn test_cannot_play_uses_snapshot_and_skips_played() {
        let mut board = GridBoard::new();
        board.hands[2] = smallvec![card("3C"), card("4D"), card("9S")];

        let mut aggregator = TurnEventAggregator::new(ViolationPolicy::Panic);
        aggregator
            .receive(GameEvent::cannot_play(SeatId::new(2)), |seat| board.hand(seat))
            .unwrap();
        // The engine empties the hand before the batch is processed
        board.hands[2].clear();
        for c in ["3C", "4D", "9S"] {
            aggregator
                .receive(GameEvent::played(card(c), SeatId::new(2)), |seat| board.hand(seat))
                .unwrap();
        }
        let batch = aggregator
            .receive(GameEvent::exited(EngineState::PlayerTurn), |seat| board.hand(seat))
            .unwrap()
            .unwrap();

        let timeline = builder().build(&batch, &ctx(&board, None));

        // One parallel discard group plus the trailing advance
        assert_eq!(timeline.group_count(), 2);
        let group = timeline.group(0).unwrap();
        assert_eq!(group.steps.len(), 12);
        let targets: FxHashSet<_> = group.steps.iter().map(|s| s.target).collect();
        assert_eq!(targets.len(), 3);
        assert_eq!(timeline.discards(), &[card("3C"), card("4D"), card("9S")]);
    }

    #[test]
    fn test_played_card_lands_on_pile() {
        let board = GridBoard::new();
        let batch = batch_of(
            &board,
            vec![
                GameEvent::played(card("5H"), SeatId::new(1)),
                GameEvent::moved(MarbleRef::new(SeatId::new(1), 2), BoardIndex::new(23)),
                GameEvent::exited(EngineState::PlayerTurn),
            ],
        );
        let timeline = builder().build(&batch, &ctx(&board, None));

        // Arrival order: card first, marble second
        assert_eq!(timeline.group_count(), 3);
        assert_eq!(
            timeline.group(0).unwrap().steps[0].target,
            ActorId::Card(card("5H"))
        );

        let geometry = SurfaceGeometry::new(100.0, 100.0);
        let pose = timeline.final_poses()[&ActorId::Card(card("5H"))];
        assert_eq!(pose.position, Some(discard_pile_origin(&board, geometry)));
        assert_eq!(pose.size, Some(geometry.scale(board.bounds_for_discard_pile())));
        assert_eq!(timeline.discards(), &[card("5H")]);
    }

    #[test]
    fn test_awaiting_input_exposes_hand() {
        let mut board = GridBoard::new();
        board.hands[0] = smallvec![card("JH"), card("7C")];
        let batch = batch_of(&board, vec![GameEvent::exited(EngineState::PlayerTurn)]);

        let timeline = builder().build(&batch, &ctx(&board, Some(SeatId::new(0))));

        assert_eq!(timeline.group_count(), 1);
        assert_eq!(timeline.trailing_action(), Some(TrailingAction::AwaitInput));
        assert_eq!(
            timeline.trailing_callback(),
            Some(&Callback::ExposeHand {
                seat: SeatId::new(0),
                slots: vec![
                    (card("JH"), Point::new(-200.0, 0.0)),
                    (card("7C"), Point::new(-150.0, 0.0)),
                ],
            })
        );
    }

    #[test]
    fn test_game_over_is_single_group() {
        let board = GridBoard::new();
        let batch = batch_of(
            &board,
            vec![
                GameEvent::played(card("AH"), SeatId::new(0)),
                GameEvent::exited(EngineState::GameOver),
            ],
        );
        let timeline = builder().build(&batch, &ctx(&board, None));

        assert_eq!(timeline.group_count(), 1);
        assert_eq!(timeline.step_count(), 1);
        assert_eq!(timeline.trailing_action(), Some(TrailingAction::GameOver));
    }

    #[test]
    fn test_shuffle_contributes_nothing() {
        let board = GridBoard::new();
        let batch = batch_of(
            &board,
            vec![GameEvent::ShuffledDeck, GameEvent::exited(EngineState::PlayerTurn)],
        );
        let timeline = builder().build(&batch, &ctx(&board, None));
        assert_eq!(timeline.group_count(), 1);
    }

    #[test]
    fn test_shuffle_drops_earlier_discards() {
        let board = GridBoard::new();
        let batch = batch_of(
            &board,
            vec![
                GameEvent::played(card("4S"), SeatId::new(2)),
                GameEvent::ShuffledDeck,
                GameEvent::played(card("9C"), SeatId::new(3)),
                GameEvent::exited(EngineState::PlayerTurn),
            ],
        );
        let timeline = builder().build(&batch, &ctx(&board, None));

        // Both cards still fly, only the later one stays on the pile
        assert_eq!(timeline.group_count(), 3);
        assert_eq!(timeline.discards(), &[card("9C")]);
    }

    #[test]
    fn test_finalize_deal_keeps_pile_cards() {
        let board = GridBoard::new();
        let batch = batch_of(
            &board,
            vec![
                GameEvent::dealt(card("QD"), SeatId::new(0), SeatId::new(1)),
                GameEvent::exited(EngineState::DealCards),
            ],
        );
        let mut context = ctx(&board, None);
        context.discard_pile = Vector::from(vec![card("3H"), card("5S")]);

        let timeline = builder().build(&batch, &context);
        assert_eq!(
            timeline.trailing_callback(),
            Some(&Callback::FinalizeDeal {
                on_pile: vec![card("3H"), card("5S")]
            })
        );
    }

    #[test]
    fn test_deal_while_awaiting_input_exposes_hand() {
        let mut board = GridBoard::new();
        board.hands[0] = smallvec![card("8S")];
        let batch = batch_of(
            &board,
            vec![
                GameEvent::dealt(card("8S"), SeatId::new(3), SeatId::new(0)),
                GameEvent::exited(EngineState::DealCards),
            ],
        );
        let timeline = builder().build(&batch, &ctx(&board, Some(SeatId::new(0))));

        assert_eq!(timeline.group_count(), 2);
        let callbacks: Vec<_> = timeline.group(1).unwrap().callbacks().map(|(_, c)| c.clone()).collect();
        assert!(matches!(callbacks[0], Callback::FinalizeDeal { .. }));
        assert_eq!(
            callbacks[1],
            Callback::ExposeHand {
                seat: SeatId::new(0),
                slots: vec![(card("8S"), Point::new(-200.0, 0.0))],
            }
        );
        assert_eq!(timeline.trailing_action(), Some(TrailingAction::AwaitInput));
    }

    #[test]
    fn test_seeded_builds_are_reproducible() {
        let board = GridBoard::new();
        let batch = batch_of(
            &board,
            vec![
                GameEvent::dealt(card("AS"), SeatId::new(0), SeatId::new(1)),
                GameEvent::dealt(card("2H"), SeatId::new(0), SeatId::new(2)),
                GameEvent::exited(EngineState::DealCards),
            ],
        );

        let a = TimelineBuilder::seeded(TimelineConfig::default(), 11).build(&batch, &ctx(&board, None));
        let b = TimelineBuilder::seeded(TimelineConfig::default(), 11).build(&batch, &ctx(&board, None));
        assert_eq!(a, b);
    }
}
