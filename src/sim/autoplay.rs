//! Demo mode shot picker
//!
//! Drives a headless match: aims the cue ball at the nearest legal target
//! with a little seeded jitter so repeated runs with one seed are identical.

use std::f32::consts::TAU;

use rand::Rng;

use super::ball::{Ball, BallKind, CUE_BALL_ID};
use super::state::{MatchPhase, MatchState};
use super::tick::CueStrike;
use crate::{heading_angle, heading_to_direction};

/// Maximum aim error in radians
const AIM_JITTER: f32 = 0.06;

/// Pick a strike for the active player, or None if the table is not idle
pub fn pick_shot<R: Rng>(state: &MatchState, rng: &mut R) -> Option<CueStrike> {
    if state.phase != MatchPhase::Idle {
        return None;
    }
    let cue = state.ball(CUE_BALL_ID).filter(|b| b.is_on_table())?;
    let player = state.turns.active_player();

    let legal = |ball: &&Ball| -> bool {
        match ball.kind {
            BallKind::Cue => false,
            BallKind::Eight => player.has_cleared_group(),
            BallKind::Regular { group } => !player.group.is_assigned() || group == player.group,
        }
    };

    let on_table = || {
        state
            .balls
            .iter()
            .filter(|b| b.is_on_table() && b.id != CUE_BALL_ID)
    };
    let by_distance = |a: &&Ball, b: &&Ball| {
        a.pos
            .distance_squared(cue.pos)
            .partial_cmp(&b.pos.distance_squared(cue.pos))
            .unwrap_or(std::cmp::Ordering::Equal)
    };

    // Fall back to any ball when nothing legal is left to aim at
    let target = on_table()
        .filter(legal)
        .min_by(by_distance)
        .or_else(|| on_table().min_by(by_distance));

    let heading = match target {
        Some(target) => {
            heading_angle(target.pos - cue.pos) + rng.random_range(-AIM_JITTER..AIM_JITTER)
        }
        None => rng.random_range(0.0..TAU),
    };

    Some(CueStrike {
        direction: heading_to_direction(heading),
        force: rng.random_range(0.35..=1.0),
    })
}
