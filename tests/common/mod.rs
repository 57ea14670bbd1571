//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use marbles_screen::core::{BoardIndex, Card, InvalidMoveError, MarbleRef, Rect, SeatId};
use marbles_screen::engine::{BoardView, DecisionRequest, EngineStep, MoveRequest, RuleEngine, ValidatedMove};
use marbles_screen::events::HandSnapshot;
use marbles_screen::playback::{Stage, TimelinePlayer};
use marbles_screen::timeline::TrailingAction;
use marbles_screen::{JitterSource, ScreenLifecycleCoordinator, Size};

pub const SEATS: u8 = 4;

/// Parse a card like `"AS"` or `"10D"`.
pub fn card(s: &str) -> Card {
    s.parse().unwrap()
}

pub fn marble(seat: u8, index: u8) -> MarbleRef {
    MarbleRef::new(SeatId(seat), index)
}

/// A rule engine that replays scripted steps.
///
/// The board is a 10x10 grid of spaces in normalized coordinates. Every
/// call the screen makes is counted so tests can assert on them.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    pub script: VecDeque<EngineStep>,
    pub hands: Vec<HandSnapshot>,
    /// Cards whose moves `validate` rejects.
    pub illegal: Vec<Card>,
    pub advance_calls: usize,
    pub validate_calls: std::cell::Cell<usize>,
    pub selected: Vec<(SeatId, ValidatedMove)>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            hands: vec![HandSnapshot::new(); usize::from(SEATS)],
            ..Self::default()
        }
    }

    /// Queue a step (builder pattern).
    pub fn then(mut self, step: EngineStep) -> Self {
        self.script.push_back(step);
        self
    }

    pub fn with_hand(mut self, seat: u8, cards: &[&str]) -> Self {
        self.hands[usize::from(seat)] = cards.iter().map(|s| card(s)).collect();
        self
    }

    pub fn rejecting(mut self, card: Card) -> Self {
        self.illegal.push(card);
        self
    }
}

impl BoardView for ScriptedEngine {
    fn hand(&self, seat: SeatId) -> HandSnapshot {
        self.hands.get(seat.index()).cloned().unwrap_or_default()
    }

    fn safe_board_index(&self, seat: SeatId) -> BoardIndex {
        BoardIndex::new(u16::from(seat.0) * 18)
    }

    fn home_min_board_index(&self, seat: SeatId) -> BoardIndex {
        BoardIndex::new(72 + u16::from(seat.0) * 4)
    }

    fn bounds_for_board_index(&self, index: BoardIndex) -> Rect {
        let (col, row) = (index.0 % 10, index.0 / 10);
        Rect::new(f32::from(col) * 0.1, f32::from(row) * 0.1, 0.1, 0.1)
    }

    fn bounds_for_marble(&self, index: BoardIndex) -> Rect {
        let space = self.bounds_for_board_index(index);
        Rect::new(space.x + 0.025, space.y + 0.025, 0.05, 0.05)
    }

    fn bounds_for_discard_pile(&self) -> Rect {
        Rect::new(0.45, 0.45, 0.1, 0.1)
    }

    fn orientation_for_board_index(&self, index: BoardIndex) -> f32 {
        f32::from(index.0 % 4) * 90.0
    }
}

impl RuleEngine for ScriptedEngine {
    fn advance(&mut self) -> EngineStep {
        self.advance_calls += 1;
        self.script.pop_front().unwrap_or_default()
    }

    fn validate(&self, request: &MoveRequest) -> Result<ValidatedMove, InvalidMoveError> {
        self.validate_calls.set(self.validate_calls.get() + 1);
        if self.illegal.contains(&request.card) {
            Err(InvalidMoveError::new(format!("{} cannot move", request.card)))
        } else {
            Ok(ValidatedMove::new(request.clone()))
        }
    }

    fn select_move(&mut self, seat: SeatId, chosen: ValidatedMove) {
        self.selected.push((seat, chosen));
    }
}

/// A decision for the human seat offering single-marble moves for `cards`.
pub fn decision_for(cards: &[&str]) -> DecisionRequest {
    DecisionRequest {
        seat: SeatId(0),
        available_moves: cards
            .iter()
            .map(|s| ValidatedMove::new(MoveRequest::single(SeatId(0), card(s), marble(0, 0))))
            .collect(),
    }
}

/// A stage with the full deck and every marble at its seat's safe space.
pub fn stage_for(engine: &ScriptedEngine) -> Stage {
    let mut stage = Stage::with_deck(Size::new(40.0, 40.0));
    for seat in SeatId::all(usize::from(SEATS)) {
        for index in 0..4 {
            let bounds = engine.bounds_for_marble(engine.safe_board_index(seat));
            stage.add_marble(
                MarbleRef::new(seat, index),
                marbles_screen::Point::new(bounds.x * 450.0, bounds.y * 450.0),
                Size::new(20.0, 20.0),
            );
        }
    }
    stage
}

/// Play the current timeline to its end and report completion.
pub fn play_current<J: JitterSource>(
    screen: &mut ScreenLifecycleCoordinator<ScriptedEngine, J>,
    stage: &mut Stage,
) -> Option<TrailingAction> {
    let timeline = screen
        .current_timeline()
        .cloned()
        .expect("a timeline is in flight");
    let trailing = TimelinePlayer::new(timeline).run_to_end(1.0 / 60.0, stage);
    screen.on_timeline_complete().unwrap();
    trailing
}
