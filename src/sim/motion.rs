//! Per-ball integration: drag, rest snapping and the table bound

use super::ball::Ball;
use super::table::Table;
use crate::settings::PhysicsTuning;

/// Advance one ball by one tick.
///
/// Speed decays linearly with drag and snaps to zero below the minimum.
/// The ball then moves `direction × speed`. If that would carry it past the
/// table bound the move is undone and the ball stays put; cushions are the
/// collision pass's job, this is only a backstop.
pub fn advance(ball: &mut Ball, table: &Table, tuning: &PhysicsTuning, dt: f32) {
    assert!(dt >= 0.0, "negative timestep {dt}");
    if !ball.is_on_table() {
        return;
    }

    ball.speed = (ball.speed - dt * tuning.drag).max(0.0);
    if ball.speed < tuning.min_speed {
        ball.speed = 0.0;
    }

    let moved = ball.pos + ball.direction * ball.speed;
    if table.contains(moved) {
        ball.pos = moved;
    }
}

/// A ball is moving while it has any speed left
#[inline]
pub fn is_moving(ball: &Ball) -> bool {
    ball.speed != 0.0
}
