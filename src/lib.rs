//! Eight Ball - a two-player billiards match simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball motion, collisions, match rules)
//! - `settings`: Data-driven match configuration
//!
//! Coordinates are 3D with `y` up. The cloth is the `y = 0` plane and
//! resting balls sit with their centers at `y = BALL_RADIUS`. The long axis
//! of the table is `x`, the short axis is `z`.

pub mod settings;
pub mod sim;

pub use settings::{PhysicsTuning, Settings, SettingsError};

use glam::Vec3;

/// Match configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playing surface dimensions (cushion nose to cushion nose)
    pub const TABLE_LENGTH: f32 = 254.0;
    pub const TABLE_WIDTH: f32 = 127.0;

    /// Cushion boxes sit just outside the playing surface
    pub const CUSHION_THICKNESS: f32 = 5.0;
    pub const CUSHION_HEIGHT: f32 = 4.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 2.85;
    /// Speed lost per second of rolling (speed is in units per tick)
    pub const DRAG: f32 = 1.2;
    /// Below this speed a ball is snapped to rest
    pub const MIN_SPEED: f32 = 0.01;
    /// Speed imparted by a full-force cue strike (units per tick)
    pub const MAX_SHOT_SPEED: f32 = 5.0;

    /// Pocket capture sphere radius
    pub const POCKET_RADIUS: f32 = 6.0;
    /// Height potted balls are parked at, well below the cloth
    pub const POTTED_DEPTH: f32 = -20.0;

    /// Cue ball starting spot (and respot after a scratch)
    pub const HEAD_SPOT_X: f32 = -TABLE_LENGTH / 4.0;
    /// Apex of the rack
    pub const FOOT_SPOT_X: f32 = TABLE_LENGTH / 4.0;
}

/// Heading of a direction on the table plane, in radians within [-π, π]
///
/// Derived from `acos` of the unit x-component, with the sign taken from the
/// z-component since `acos` only covers [0, π]. A zero vector yields π/2.
#[inline]
pub fn heading_angle(dir: Vec3) -> f32 {
    let flat = Vec3::new(dir.x, 0.0, dir.z).normalize_or_zero();
    let theta = flat.x.clamp(-1.0, 1.0).acos();
    if flat.z < 0.0 { -theta } else { theta }
}

/// Unit direction on the table plane for a heading angle
#[inline]
pub fn heading_to_direction(theta: f32) -> Vec3 {
    Vec3::new(theta.cos(), 0.0, theta.sin())
}
