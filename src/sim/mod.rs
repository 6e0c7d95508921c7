//! Deterministic simulation module
//!
//! All match logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` passed to `tick`
//! - Seeded RNG only, drawn once at match start
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod ball;
pub mod ball_state;
pub mod collision;
pub mod events;
pub mod geometry;
pub mod motion;
pub mod rules;
pub mod state;
pub mod table;
pub mod tick;
pub mod turn;

pub use autoplay::pick_shot;
pub use ball::{
    BALL_COUNT, BALLS_PER_GROUP, Ball, BallId, BallKind, BallStatus, CUE_BALL_ID, EIGHT_BALL_ID,
    Group, rack,
};
pub use ball_state::{MatchBallState, TurnRecord};
pub use collision::{CollisionReport, resolve_pair, resolve_tick};
pub use events::{EventLog, EventSink, MatchEvent, dispatch};
pub use geometry::{Narrowphase, OverlapTest, Volume};
pub use motion::{advance, is_moving};
pub use rules::{TurnOutcome, resolve_turn};
pub use state::{BallView, MatchPhase, MatchResult, MatchState};
pub use table::{Cushion, Pocket, Rail, Table};
pub use tick::{CueStrike, TickInput, tick, tick_with};
pub use turn::{Player, PlayerId, TurnSequencer};

#[cfg(test)]
mod proptests;
