//! Fixed timestep match tick
//!
//! The match controller: advances moving balls, resolves contacts, and once
//! the table is still, resolves the turn and waits for the next strike.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::CUE_BALL_ID;
use super::collision::{CollisionReport, resolve_tick};
use super::events::MatchEvent;
use super::geometry::{Narrowphase, OverlapTest};
use super::motion::advance;
use super::rules::resolve_turn;
use super::state::{MatchPhase, MatchState};

/// A cue strike: aim on the table plane and a force in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueStrike {
    pub direction: Vec3,
    pub force: f32,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Strike the cue ball (only honored while Idle)
    pub strike: Option<CueStrike>,
}

/// Advance the match by one tick using the built-in overlap tests
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) -> Vec<MatchEvent> {
    tick_with(state, input, dt, &Narrowphase)
}

/// Advance the match by one tick with a caller-supplied overlap predicate
pub fn tick_with<O: OverlapTest>(
    state: &mut MatchState,
    input: &TickInput,
    dt: f32,
    overlap: &O,
) -> Vec<MatchEvent> {
    assert!(dt >= 0.0, "negative timestep {dt}");
    let mut events = Vec::new();

    match state.phase {
        MatchPhase::Stopped | MatchPhase::Ended => {
            if input.strike.is_some() {
                log::warn!("cue strike ignored: match is {:?}", state.phase);
            }
            return events;
        }

        MatchPhase::Idle => {
            if let Some(strike) = input.strike {
                if apply_strike(state, &strike) {
                    state.phase = MatchPhase::InMotion;
                    events.push(MatchEvent::MotionStarted);
                }
            }
        }

        MatchPhase::InMotion => {
            if input.strike.is_some() {
                log::warn!("cue strike ignored: balls still moving");
            }

            for ball in &mut state.balls {
                advance(ball, &state.table, &state.tuning, dt);
            }
            let report = resolve_tick(&mut state.balls, &state.table, overlap);
            record_report(state, &report, &mut events);

            if !state.any_moving() {
                end_turn(state, &mut events);
            }
        }
    }

    state.time_ticks += 1;

    // Ensure deterministic ordering
    state.normalize_order();
    events
}

/// Set the cue ball rolling. Returns false if the strike was unusable.
fn apply_strike(state: &mut MatchState, strike: &CueStrike) -> bool {
    let direction = Vec3::new(strike.direction.x, 0.0, strike.direction.z).normalize_or_zero();
    let force = strike.force.clamp(0.0, 1.0);
    if direction == Vec3::ZERO || force == 0.0 {
        log::warn!("cue strike ignored: no direction or force ({strike:?})");
        return false;
    }

    let speed = force * state.tuning.max_shot_speed;
    let Some(cue) = state.ball_mut(CUE_BALL_ID) else {
        return false;
    };
    if !cue.is_on_table() {
        log::warn!("cue strike ignored: cue ball is not on the table");
        return false;
    }
    cue.strike(direction, speed);
    log::debug!("cue strike: direction {direction}, speed {speed:.3}");
    true
}

/// Fold one tick's collision results into the turn record
fn record_report(state: &mut MatchState, report: &CollisionReport, events: &mut Vec<MatchEvent>) {
    if let Some(id) = report.first_touch {
        state.ball_state.set_first_touched(id);
    }
    for &id in &report.potted {
        state.ball_state.record_pot(id);
        if let Some(ball) = state.ball(id) {
            events.push(MatchEvent::BallPotted {
                ball: id,
                kind: ball.kind,
            });
        }
    }
}

/// Everything has stopped: resolve the turn and either end the match or
/// go back to waiting for a strike
fn end_turn(state: &mut MatchState, events: &mut Vec<MatchEvent>) {
    events.push(MatchEvent::MotionStopped {
        first_touched: state.ball_state.turn().first_touched,
    });

    let outcome = resolve_turn(&mut state.ball_state, &mut state.turns);
    state.respot_cue_ball();

    if let Some(winner) = outcome.winner {
        state.winner = Some(winner);
        state.phase = MatchPhase::Ended;
        log::info!(
            "Match over after {} turns: {} wins",
            outcome.turn + 1,
            state.turns.player(winner).name
        );
        events.push(MatchEvent::MatchEnded {
            winner,
            players: state.turns.players().to_vec(),
        });
    } else {
        state.phase = MatchPhase::Idle;
    }
    state.last_outcome = Some(outcome);
}
