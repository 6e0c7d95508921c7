//! Property tests for match-wide invariants

use std::collections::BTreeSet;

use glam::Vec3;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::*;
use crate::consts::*;
use crate::heading_to_direction;
use crate::settings::Settings;

fn sequencer() -> TurnSequencer {
    TurnSequencer::new(vec![Player::new(0, "A"), Player::new(1, "B")])
}

fn assert_groups_consistent(turns: &TurnSequencer) {
    let a = turns.player(0).group;
    let b = turns.player(1).group;
    if a.is_assigned() || b.is_assigned() {
        assert_eq!(a.complement(), b, "groups must be complementary");
    }
}

/// One scripted turn: first contact plus the balls that drop
fn turn_strategy() -> impl Strategy<Value = (Option<BallId>, Vec<BallId>)> {
    (
        prop::option::of(1u8..16),
        prop::collection::vec(0u8..16, 0..4),
    )
}

proptest! {
    #[test]
    fn prop_scripted_matches_keep_invariants(
        script in prop::collection::vec(turn_strategy(), 1..40)
    ) {
        let mut balls = MatchBallState::new(0..16);
        let mut turns = sequencer();
        let mut gone: BTreeSet<BallId> = BTreeSet::new();

        for (first_touch, pots) in script {
            if let Some(id) = first_touch.filter(|id| !gone.contains(id)) {
                balls.set_first_touched(id);
            }
            for id in pots {
                // Object balls drop once; the cue ball can scratch every turn
                if id != CUE_BALL_ID && !gone.insert(id) {
                    continue;
                }
                balls.record_pot(id);
            }

            let remaining_before = balls.remaining().clone();
            let outcome = resolve_turn(&mut balls, &mut turns);

            prop_assert!(!balls.remaining().contains(&CUE_BALL_ID));
            prop_assert_eq!(balls.remaining(), &remaining_before);
            assert_groups_consistent(&turns);

            // A second assignment attempt changes nothing
            let groups = (turns.player(0).group, turns.player(1).group);
            if groups.0.is_assigned() {
                prop_assert!(!turns.assign_groups(groups.0.complement()));
                prop_assert_eq!((turns.player(0).group, turns.player(1).group), groups);
            }

            if outcome.scratch {
                prop_assert!(!outcome.retained);
            }
            if gone.contains(&EIGHT_BALL_ID) {
                prop_assert!(outcome.winner.is_some());
                prop_assert!(!outcome.retained);
                break;
            }
            prop_assert!(outcome.winner.is_none());
        }
    }

    #[test]
    fn prop_unassigned_contact_always_valid(first in 0u8..16) {
        let mut balls = MatchBallState::new(0..16);
        balls.set_first_touched(first);
        let player = Player::new(0, "A");
        prop_assert!(balls.is_ball_contact_valid(&player));
        prop_assert!(!balls.turn().cue_potted);
    }

    #[test]
    fn prop_pair_resolution_deterministic_and_energy_preserving(
        ax in -50.0f32..50.0, az in -50.0f32..50.0,
        offset in 0.0f32..std::f32::consts::TAU,
        heading_a in -3.1f32..3.1, heading_b in -3.1f32..3.1,
        speed_a in 0.0f32..MAX_SHOT_SPEED, speed_b in 0.0f32..MAX_SHOT_SPEED,
    ) {
        let mut a = Ball::new(1, Vec3::new(ax, BALL_RADIUS, az), BALL_RADIUS);
        a.strike(heading_to_direction(heading_a), speed_a);
        let pos_b = a.pos + heading_to_direction(offset) * (1.5 * BALL_RADIUS);
        let mut b = Ball::new(9, pos_b, BALL_RADIUS);
        b.strike(heading_to_direction(heading_b), speed_b);

        let first = resolve_pair(&a, &b);
        prop_assert_eq!(resolve_pair(&a, &b), first);

        let before = speed_a * speed_a + speed_b * speed_b;
        let after = first.0.speed * first.0.speed + first.1.speed * first.1.speed;
        prop_assert!((before - after).abs() <= 1e-3 * (1.0 + before));
        prop_assert!(first.0.speed >= 0.0 && first.1.speed >= 0.0);
    }

    #[test]
    fn prop_cushion_reflection_keeps_speed(
        heading in -3.1f32..3.1,
        speed in 0.1f32..MAX_SHOT_SPEED,
    ) {
        let table = Table::default();
        let start = Vec3::new(TABLE_LENGTH / 2.0 - 1.0, BALL_RADIUS, 0.0);
        let mut balls = vec![Ball::new(4, start, BALL_RADIUS)];
        balls[0].strike(heading_to_direction(heading), speed);

        collision::resolve_cushions(&mut balls, &table, &Narrowphase);
        prop_assert_eq!(balls[0].speed, speed);
        prop_assert!((balls[0].direction.length() - 1.0).abs() < 1e-4);
        // Never left heading into the foot cushion
        prop_assert!(balls[0].direction.x <= 1e-6);
    }
}

/// Play seeded headless matches shot by shot and check the table after
/// every turn
#[test]
fn test_headless_matches_hold_invariants() {
    const MAX_SHOTS: usize = 120;

    for seed in [3u64, 17, 2024] {
        let settings = Settings {
            seed,
            ..Default::default()
        };
        let mut state = MatchState::new(&settings);
        let mut log = EventLog::default();
        let mut sinks: [&mut dyn EventSink; 1] = [&mut log];
        dispatch(&state.start(), &mut sinks);
        let mut rng = Pcg32::seed_from_u64(seed ^ 0xA5A5);

        let mut shots = 0;
        while state.phase != MatchPhase::Ended && shots < MAX_SHOTS {
            let shot = pick_shot(&state, &mut rng).expect("idle table has a shot");
            dispatch(
                &tick(&mut state, &TickInput { strike: Some(shot) }, SIM_DT),
                &mut sinks,
            );
            shots += 1;

            let mut guard = 0;
            while state.phase == MatchPhase::InMotion {
                dispatch(&tick(&mut state, &TickInput::default(), SIM_DT), &mut sinks);
                guard += 1;
                assert!(guard < 50_000, "seed {seed}: shot {shots} never settled");
            }

            assert!(!state.ball_state.remaining().contains(&CUE_BALL_ID));
            assert!(!state.any_moving());
            assert_groups_consistent(&state.turns);
            if state.phase != MatchPhase::Ended {
                let cue = state.ball(CUE_BALL_ID).expect("cue ball");
                assert!(cue.is_on_table(), "seed {seed}: cue ball left off the table");
            }
            for ball in &state.balls {
                if ball.status == BallStatus::Potted && ball.id != CUE_BALL_ID {
                    assert!(!state.ball_state.remaining().contains(&ball.id));
                }
            }
        }

        let ended = log.count(|e| matches!(e, MatchEvent::MatchEnded { .. }));
        let started = log.count(|e| matches!(e, MatchEvent::MatchStarted { .. }));
        assert_eq!(started, 1);
        if state.phase == MatchPhase::Ended {
            assert_eq!(ended, 1);
            let result = state.result().expect("ended match has a result");
            assert!(result.winner < 2);
            assert_eq!(result.players.len(), 2);
        } else {
            assert_eq!(ended, 0);
            assert!(state.winner.is_none());
        }
        let potted: BTreeSet<BallId> = log.potted().filter(|&id| id != CUE_BALL_ID).collect();
        assert_eq!(
            potted.len() + state.ball_state.remaining().len(),
            BALL_COUNT - 1,
            "seed {seed}: every object ball is either potted or remaining"
        );
    }
}
