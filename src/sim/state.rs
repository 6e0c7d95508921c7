//! Match state and core simulation types
//!
//! Everything the controller mutates during a tick lives in `MatchState`.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallId, BallKind, BallStatus, CUE_BALL_ID, rack};
use super::ball_state::MatchBallState;
use super::events::MatchEvent;
use super::geometry::{Narrowphase, OverlapTest, Volume};
use super::motion::is_moving;
use super::rules::TurnOutcome;
use super::table::Table;
use super::turn::{Player, PlayerId, TurnSequencer};
use crate::settings::{PhysicsTuning, Settings};

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Set up but not started
    Stopped,
    /// Balls at rest, waiting for a cue strike
    Idle,
    /// At least one ball rolling
    InMotion,
    /// A winner has been decided
    Ended,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// What a renderer needs to draw one ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub id: BallId,
    pub kind: BallKind,
    pub pos: Vec3,
    /// Per-tick velocity
    pub velocity: Vec3,
    pub status: BallStatus,
}

/// Final standings handed off when the match ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: PlayerId,
    pub winner_name: String,
    pub players: Vec<Player>,
    pub turns_played: u32,
    pub time_ticks: u64,
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub phase: MatchPhase,
    pub table: Table,
    pub tuning: PhysicsTuning,
    /// All 16 balls, sorted by id for deterministic iteration
    pub balls: Vec<Ball>,
    pub ball_state: MatchBallState,
    pub turns: TurnSequencer,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub winner: Option<PlayerId>,
    /// Outcome of the most recently resolved turn
    pub last_outcome: Option<TurnOutcome>,
}

impl MatchState {
    /// Rack the balls and seat the players. The match stays Stopped until `start`.
    pub fn new(settings: &Settings) -> Self {
        let tuning = settings.tuning.clone();
        let table = Table::new(
            crate::consts::TABLE_LENGTH,
            crate::consts::TABLE_WIDTH,
            tuning.ball_radius,
            tuning.pocket_radius,
        );
        let balls = rack(tuning.ball_radius);
        let ball_state = MatchBallState::new(balls.iter().map(|b| b.id));
        let players = settings
            .player_names
            .iter()
            .enumerate()
            .map(|(id, name)| Player::new(id, name.clone()))
            .collect();

        Self {
            seed: settings.seed,
            rng_state: RngState::new(settings.seed),
            phase: MatchPhase::Stopped,
            table,
            tuning,
            balls,
            ball_state,
            turns: TurnSequencer::new(players),
            time_ticks: 0,
            winner: None,
            last_outcome: None,
        }
    }

    /// Draw the breaking player and open the table for the first shot
    pub fn start(&mut self) -> Vec<MatchEvent> {
        assert_eq!(self.phase, MatchPhase::Stopped, "match already started");
        let mut rng = self.rng_state.to_rng();
        let starting_player = self.turns.initialize_starting_player(&mut rng);
        self.phase = MatchPhase::Idle;
        log::info!(
            "Match started (seed {}), {} breaks",
            self.seed,
            self.turns.active_player().name
        );
        vec![MatchEvent::MatchStarted { starting_player }]
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn any_moving(&self) -> bool {
        self.balls.iter().any(|b| b.is_on_table() && is_moving(b))
    }

    /// Positions and velocities for rendering
    ///
    /// # Panics
    /// If called before the match has started.
    pub fn ball_views(&self) -> Vec<BallView> {
        assert_ne!(
            self.phase,
            MatchPhase::Stopped,
            "ball state queried before match start"
        );
        self.balls
            .iter()
            .map(|b| BallView {
                id: b.id,
                kind: b.kind,
                pos: b.pos,
                velocity: b.velocity(),
                status: b.status,
            })
            .collect()
    }

    /// Bring a scratched cue ball back to the head spot. If the spot is
    /// taken, the cue ball goes to the nearest free spot found by sliding
    /// toward the head rail, then toward the foot, on the center line first
    /// and then on rows either side of it. Returns true if the cue ball was
    /// respotted.
    pub fn respot_cue_ball(&mut self) -> bool {
        match self.ball(CUE_BALL_ID) {
            Some(cue) if cue.status == BallStatus::Potted => {}
            _ => return false,
        }

        let head_spot = self.table.head_spot(self.tuning.ball_radius);
        let spot = self.free_spot_near(head_spot).unwrap_or_else(|| {
            log::warn!("no free spot for the cue ball, placing it on the head spot");
            head_spot
        });

        if let Some(cue) = self.ball_mut(CUE_BALL_ID) {
            cue.respot(spot);
        }
        log::debug!("cue ball respotted at {spot}");
        true
    }

    /// First spot on a grid of ball diameters around `start` that overlaps
    /// neither an object ball nor a pocket
    fn free_spot_near(&self, start: Vec3) -> Option<Vec3> {
        let radius = self.tuning.ball_radius;
        let step = 2.0 * radius;
        let max_x = self.table.length / 2.0 - radius;
        let max_z = self.table.width / 2.0 - radius;
        let cols = (2.0 * max_x / step) as i32;
        let rows = (max_z / step) as i32;

        let is_free = |spot: Vec3| {
            let volume = Volume::Sphere {
                center: spot,
                radius,
            };
            let hits_ball = self.balls.iter().any(|b| {
                b.id != CUE_BALL_ID && b.is_on_table() && Narrowphase.overlaps(&volume, &b.volume())
            });
            let hits_pocket = self
                .table
                .pockets
                .iter()
                .any(|p| Narrowphase.overlaps(&volume, &p.volume));
            !hits_ball && !hits_pocket
        };

        let row_offsets = std::iter::once(0).chain((1..=rows).flat_map(|k| [k, -k]));
        for row in row_offsets {
            let z = start.z + row as f32 * step;
            let toward_head = (0..=cols).map(|k| start.x - k as f32 * step);
            let toward_foot = (1..=cols).map(|k| start.x + k as f32 * step);
            let found = toward_head
                .take_while(|&x| x >= -max_x)
                .chain(toward_foot.take_while(|&x| x <= max_x))
                .map(|x| Vec3::new(x, start.y, z))
                .find(|&spot| is_free(spot));
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Final standings, once the match has ended
    pub fn result(&self) -> Option<MatchResult> {
        let winner = self.winner?;
        Some(MatchResult {
            winner,
            winner_name: self.turns.player(winner).name.clone(),
            players: self.turns.players().to_vec(),
            turns_played: self.turns.turn_counter() + 1,
            time_ticks: self.time_ticks,
        })
    }

    /// Ensure balls are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALL_RADIUS;
    use crate::sim::ball::{BALL_COUNT, Group};

    #[test]
    fn test_new_match_is_stopped() {
        let state = MatchState::new(&Settings::default());
        assert_eq!(state.phase, MatchPhase::Stopped);
        assert_eq!(state.balls.len(), BALL_COUNT);
        assert_eq!(state.ball_state.remaining().len(), BALL_COUNT - 1);
        assert!(state.turns.players().iter().all(|p| p.group == Group::Unassigned));
        assert!(state.result().is_none());
    }

    #[test]
    fn test_start_emits_event_and_idles() {
        let mut state = MatchState::new(&Settings::default());
        let events = state.start();
        assert_eq!(state.phase, MatchPhase::Idle);
        assert_eq!(
            events,
            vec![MatchEvent::MatchStarted {
                starting_player: state.turns.active_index()
            }]
        );
    }

    #[test]
    fn test_start_is_deterministic_per_seed() {
        let settings = Settings {
            seed: 1234,
            ..Default::default()
        };
        let mut a = MatchState::new(&settings);
        let mut b = MatchState::new(&settings);
        assert_eq!(a.start(), b.start());
    }

    #[test]
    #[should_panic(expected = "before match start")]
    fn test_ball_views_before_start_panics() {
        MatchState::new(&Settings::default()).ball_views();
    }

    #[test]
    #[should_panic(expected = "already started")]
    fn test_double_start_panics() {
        let mut state = MatchState::new(&Settings::default());
        state.start();
        state.start();
    }

    #[test]
    fn test_respot_cue_ball() {
        let mut state = MatchState::new(&Settings::default());
        assert!(!state.respot_cue_ball());

        let spot = state.table.head_spot(BALL_RADIUS);
        state.ball_mut(CUE_BALL_ID).expect("cue ball").pot();
        assert!(state.respot_cue_ball());
        let cue = state.ball(CUE_BALL_ID).expect("cue ball");
        assert!(cue.is_on_table());
        assert_eq!(cue.pos, spot);
    }

    #[test]
    fn test_respot_avoids_occupied_spot() {
        let mut state = MatchState::new(&Settings::default());
        let spot = state.table.head_spot(BALL_RADIUS);
        state.ball_mut(CUE_BALL_ID).expect("cue ball").pot();
        state.ball_mut(4).expect("ball 4").pos = spot;

        assert!(state.respot_cue_ball());
        let cue = state.ball(CUE_BALL_ID).expect("cue ball");
        assert!(cue.pos.distance(spot) >= 2.0 * BALL_RADIUS - 1e-4);
    }

    #[test]
    fn test_respot_with_head_string_full() {
        let mut state = MatchState::new(&Settings::default());
        let spot = state.table.head_spot(BALL_RADIUS);
        let min_x = -state.table.length / 2.0 + BALL_RADIUS;
        state.ball_mut(CUE_BALL_ID).expect("cue ball").pot();

        // Park object balls on every step from the head spot back to the rail
        let mut parked = 0;
        for (k, id) in (1..=15u8).enumerate() {
            let x = spot.x - k as f32 * 2.0 * BALL_RADIUS;
            if x < min_x {
                break;
            }
            state.ball_mut(id).expect("object ball").pos = Vec3::new(x, BALL_RADIUS, spot.z);
            parked += 1;
        }
        assert!(parked > 1);

        assert!(state.respot_cue_ball());
        let cue = state.ball(CUE_BALL_ID).expect("cue ball").clone();
        assert!(cue.is_on_table());
        assert!(state.table.contains(cue.pos));
        for ball in state.balls.iter().filter(|b| b.id != CUE_BALL_ID) {
            let gap = ball.pos.distance(cue.pos);
            assert!(gap >= 2.0 * BALL_RADIUS - 1e-3, "cue overlaps ball {}", ball.id);
        }
        for pocket in &state.table.pockets {
            assert!(!Narrowphase.overlaps(&cue.volume(), &pocket.volume));
        }
    }
}
