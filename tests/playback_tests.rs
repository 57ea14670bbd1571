//! Playing timelines onto a headless stage.

mod common;

use common::{card, marble, stage_for, ScriptedEngine};
use marbles_screen::core::{BoardIndex, ScreenConfig, SeatId, ViolationPolicy};
use marbles_screen::engine::EngineStep;
use marbles_screen::events::{EngineState, GameEvent, HandSnapshot};
use marbles_screen::playback::{PlaybackStatus, Stage, TimelinePlayer};
use marbles_screen::screen::ScreenLifecycleCoordinator;
use marbles_screen::timeline::{ActorId, Timeline, TrailingAction};

fn assert_final_frame(timeline: &Timeline, stage: &Stage) {
    for (actor, expected) in timeline.final_poses() {
        let pose = stage
            .pose(actor)
            .unwrap_or_else(|| panic!("{actor:?} missing from stage"));
        if let Some(position) = expected.position {
            assert_eq!(pose.position, position, "{actor:?} position");
        }
        if let Some(rotation) = expected.rotation {
            assert_eq!(pose.rotation, rotation, "{actor:?} rotation");
        }
        if let Some(size) = expected.size {
            assert_eq!(pose.size, size, "{actor:?} size");
        }
    }
}

#[test]
fn test_final_frame_matches_last_event_per_actor() {
    // The same marble moves twice in one batch; only the last move counts.
    let engine = ScriptedEngine::new().then(
        EngineStep::new(vec![
            GameEvent::cannot_play(SeatId(3)),
            GameEvent::played(card("6D"), SeatId(1)),
            GameEvent::moved(marble(1, 2), BoardIndex(20)),
            GameEvent::moved(marble(1, 2), BoardIndex(27)),
            GameEvent::exited(EngineState::PlayerTurn),
        ])
        .with_hand_snapshot(SeatId(3), HandSnapshot::from_slice(&[card("JS"), card("QS")])),
    );
    let mut stage = stage_for(&engine);
    let config = ScreenConfig::default().with_violation_policy(ViolationPolicy::Panic);
    let mut screen = ScreenLifecycleCoordinator::new(engine, config);
    screen.start();

    let timeline = screen.current_timeline().cloned().unwrap();
    let trailing = TimelinePlayer::new(timeline.clone()).run_to_end(1.0 / 30.0, &mut stage);

    assert_eq!(trailing, Some(TrailingAction::Advance));
    assert_final_frame(&timeline, &stage);
    assert_eq!(
        stage.visible_cards(),
        vec![card("JS"), card("QS"), card("6D")]
    );
    assert!(stage.pose(ActorId::Card(card("6D"))).unwrap().face_up);
}

#[test]
fn test_deal_reveals_face_down_for_dealer_draw() {
    let engine = ScriptedEngine::new().then(EngineStep::new(vec![
        GameEvent::dealt(card("4H"), SeatId(2), SeatId(0)),
        GameEvent::exited(EngineState::DetermineDealer),
    ]));
    let mut stage = stage_for(&engine);
    let config = ScreenConfig::default().with_violation_policy(ViolationPolicy::Panic);
    let mut screen = ScreenLifecycleCoordinator::new(engine, config);
    screen.start();

    let timeline = screen.current_timeline().cloned().unwrap();
    let mut player = TimelinePlayer::new(timeline);

    // Mid-deal the card is visible but face down
    assert_eq!(player.tick(0.05, &mut stage), PlaybackStatus::Playing);
    let pose = stage.pose(ActorId::Card(card("4H"))).unwrap();
    assert!(pose.visible);
    assert!(!pose.face_up);

    assert_eq!(
        player.tick(1.0, &mut stage),
        PlaybackStatus::Finished(Some(TrailingAction::Advance))
    );
    assert!(!stage.pose(ActorId::Card(card("4H"))).unwrap().visible);
}

#[test]
fn test_one_large_tick_equals_many_small_ones() {
    let step = || {
        EngineStep::new(vec![
            GameEvent::dealt(card("AC"), SeatId(0), SeatId(1)),
            GameEvent::dealt(card("AD"), SeatId(0), SeatId(2)),
            GameEvent::dealt(card("AH"), SeatId(0), SeatId(3)),
            GameEvent::exited(EngineState::DealCards),
        ])
    };
    let timeline = {
        let config = ScreenConfig::default().with_violation_policy(ViolationPolicy::Panic);
        let mut screen = ScreenLifecycleCoordinator::new(ScriptedEngine::new().then(step()), config);
        screen.start();
        screen.current_timeline().cloned().unwrap()
    };

    let engine = ScriptedEngine::new();
    let mut coarse = stage_for(&engine);
    let mut fine = stage_for(&engine);
    TimelinePlayer::new(timeline.clone()).tick(10.0, &mut coarse);
    TimelinePlayer::new(timeline.clone()).run_to_end(0.01, &mut fine);

    for name in ["AC", "AD", "AH"] {
        let actor = ActorId::Card(card(name));
        assert_eq!(coarse.pose(actor).unwrap().position, fine.pose(actor).unwrap().position);
        assert_eq!(coarse.pose(actor).unwrap().rotation, fine.pose(actor).unwrap().rotation);
    }
    assert_final_frame(&timeline, &fine);
}
