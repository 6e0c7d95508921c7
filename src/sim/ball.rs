//! Ball entities and the standard eight-ball rack
//!
//! Ball identity follows the usual numbering: the cue ball is 0, the eight
//! ball is 8, solids are 1-7 and stripes are 9-15.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::Volume;
use crate::consts::*;

/// Stable ball identifier for the lifetime of a match
pub type BallId = u8;

pub const CUE_BALL_ID: BallId = 0;
pub const EIGHT_BALL_ID: BallId = 8;
/// Number of balls in each of the solid and striped groups
pub const BALLS_PER_GROUP: usize = 7;
/// Total balls on the table at setup
pub const BALL_COUNT: usize = 16;

/// Ball category a player is trying to pot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Group {
    #[default]
    Unassigned,
    Solid,
    Striped,
}

impl Group {
    /// Opposing group (Solid <-> Striped). Unassigned has no complement.
    pub fn complement(self) -> Group {
        match self {
            Group::Solid => Group::Striped,
            Group::Striped => Group::Solid,
            Group::Unassigned => Group::Unassigned,
        }
    }

    pub fn is_assigned(self) -> bool {
        self != Group::Unassigned
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Unassigned => "Unassigned",
            Group::Solid => "Solid",
            Group::Striped => "Striped",
        }
    }
}

/// What a ball is, independent of where it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallKind {
    Cue,
    Eight,
    Regular { group: Group },
}

impl BallKind {
    /// Kind for a ball id under the standard numbering
    pub fn from_id(id: BallId) -> Self {
        match id {
            CUE_BALL_ID => BallKind::Cue,
            EIGHT_BALL_ID => BallKind::Eight,
            1..=7 => BallKind::Regular { group: Group::Solid },
            _ => BallKind::Regular {
                group: Group::Striped,
            },
        }
    }

    /// Group of a regular ball; the cue and eight balls belong to no group
    pub fn group(self) -> Group {
        match self {
            BallKind::Regular { group } => group,
            BallKind::Cue | BallKind::Eight => Group::Unassigned,
        }
    }

    pub fn is_cue(self) -> bool {
        matches!(self, BallKind::Cue)
    }
}

/// Whether a ball is still in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallStatus {
    Active,
    Potted,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub kind: BallKind,
    pub pos: Vec3,
    /// Unit heading on the table plane (zero while at rest)
    pub direction: Vec3,
    /// Distance travelled per tick, never negative
    pub speed: f32,
    pub radius: f32,
    pub status: BallStatus,
}

impl Ball {
    pub fn new(id: BallId, pos: Vec3, radius: f32) -> Self {
        Self {
            id,
            kind: BallKind::from_id(id),
            pos,
            direction: Vec3::ZERO,
            speed: 0.0,
            radius,
            status: BallStatus::Active,
        }
    }

    /// Collision sphere at the ball's current position
    pub fn volume(&self) -> Volume {
        Volume::Sphere {
            center: self.pos,
            radius: self.radius,
        }
    }

    /// Per-tick velocity (direction × speed)
    pub fn velocity(&self) -> Vec3 {
        self.direction * self.speed
    }

    pub fn group(&self) -> Group {
        self.kind.group()
    }

    pub fn is_active(&self) -> bool {
        self.status == BallStatus::Active
    }

    /// Active and still above the cloth. A ball relocated below the table
    /// plane is out of play even if its status has not caught up yet.
    pub fn is_on_table(&self) -> bool {
        self.is_active() && self.pos.y > 0.0
    }

    /// Start the ball rolling along `direction` at `speed`
    pub fn strike(&mut self, direction: Vec3, speed: f32) {
        self.direction = direction;
        self.speed = speed.max(0.0);
    }

    /// Remove the ball from play: stop it and drop it below the cloth
    pub fn pot(&mut self) {
        self.speed = 0.0;
        self.direction = Vec3::ZERO;
        self.pos.y = POTTED_DEPTH;
        self.status = BallStatus::Potted;
    }

    /// Put the ball back on the cloth at rest
    pub fn respot(&mut self, pos: Vec3) {
        self.pos = pos;
        self.speed = 0.0;
        self.direction = Vec3::ZERO;
        self.status = BallStatus::Active;
    }
}

/// Rack order, apex first, row by row. The eight sits in the middle of the
/// third row and the back corners hold one solid and one stripe.
const RACK_ORDER: [BallId; 15] = [1, 9, 2, 10, 8, 3, 11, 4, 12, 5, 6, 13, 7, 14, 15];

/// Gap factor between racked balls so nothing overlaps at setup
const RACK_SPACING: f32 = 1.02;

/// Build all 16 balls: cue ball on the head spot, the rest racked at the foot spot
pub fn rack(radius: f32) -> Vec<Ball> {
    let mut balls = Vec::with_capacity(BALL_COUNT);
    balls.push(Ball::new(CUE_BALL_ID, Vec3::new(HEAD_SPOT_X, radius, 0.0), radius));

    let diameter = 2.0 * radius * RACK_SPACING;
    let row_step = diameter * 30f32.to_radians().cos();
    let mut order = RACK_ORDER.iter();
    for row in 0..5u8 {
        for slot in 0..=row {
            let Some(&id) = order.next() else { break };
            let x = FOOT_SPOT_X + row as f32 * row_step;
            let z = (slot as f32 - row as f32 / 2.0) * diameter;
            balls.push(Ball::new(id, Vec3::new(x, radius, z), radius));
        }
    }

    balls.sort_by_key(|b| b.id);
    balls
}
