//! Static table geometry: cushions, pockets and the play-area bound

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::Volume;
use crate::consts::*;

/// Which rail a cushion runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rail {
    /// Short rail behind the head spot (-x)
    Head,
    /// Short rail behind the rack (+x)
    Foot,
    /// Long rail at -z
    Near,
    /// Long rail at +z
    Far,
}

/// A cushion volume with its outward normal (pointing away from the cloth)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cushion {
    pub rail: Rail,
    pub volume: Volume,
    pub normal: Vec3,
}

/// A pocket capture volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pocket {
    pub id: u8,
    pub volume: Volume,
}

/// Table geometry, fixed for the whole match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub length: f32,
    pub width: f32,
    pub cushions: Vec<Cushion>,
    pub pockets: Vec<Pocket>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(TABLE_LENGTH, TABLE_WIDTH, BALL_RADIUS, POCKET_RADIUS)
    }
}

impl Table {
    /// Build a table with four cushions and six pockets.
    ///
    /// Pockets are spheres centered at ball height so that a ball rolling
    /// into a corner or along a rail past a side pocket overlaps them.
    pub fn new(length: f32, width: f32, ball_radius: f32, pocket_radius: f32) -> Self {
        let half_l = length / 2.0;
        let half_w = width / 2.0;
        let t = CUSHION_THICKNESS;
        let cushion_y = CUSHION_HEIGHT / 2.0;

        let cushion = |rail: Rail, offset: Vec3, half_extents: Vec3, normal: Vec3| Cushion {
            rail,
            volume: Volume::Box {
                center: offset + Vec3::new(0.0, cushion_y, 0.0),
                half_extents,
            },
            normal,
        };

        let cushions = vec![
            cushion(
                Rail::Head,
                Vec3::new(-(half_l + t / 2.0), 0.0, 0.0),
                Vec3::new(t / 2.0, cushion_y, half_w + t),
                Vec3::NEG_X,
            ),
            cushion(
                Rail::Foot,
                Vec3::new(half_l + t / 2.0, 0.0, 0.0),
                Vec3::new(t / 2.0, cushion_y, half_w + t),
                Vec3::X,
            ),
            cushion(
                Rail::Near,
                Vec3::new(0.0, 0.0, -(half_w + t / 2.0)),
                Vec3::new(half_l + t, cushion_y, t / 2.0),
                Vec3::NEG_Z,
            ),
            cushion(
                Rail::Far,
                Vec3::new(0.0, 0.0, half_w + t / 2.0),
                Vec3::new(half_l + t, cushion_y, t / 2.0),
                Vec3::Z,
            ),
        ];

        // Side pockets sit slightly behind the long-rail nose
        let side_z = half_w + 1.0;
        let pocket_centers = [
            Vec3::new(-half_l, ball_radius, -half_w),
            Vec3::new(0.0, ball_radius, -side_z),
            Vec3::new(half_l, ball_radius, -half_w),
            Vec3::new(-half_l, ball_radius, half_w),
            Vec3::new(0.0, ball_radius, side_z),
            Vec3::new(half_l, ball_radius, half_w),
        ];
        let pockets = pocket_centers
            .iter()
            .enumerate()
            .map(|(i, &center)| Pocket {
                id: i as u8,
                volume: Volume::Sphere {
                    center,
                    radius: pocket_radius,
                },
            })
            .collect();

        Self {
            length,
            width,
            cushions,
            pockets,
        }
    }

    /// Whether a ball center lies within the outer edge of the cushions
    pub fn contains(&self, pos: Vec3) -> bool {
        let max_x = self.length / 2.0 + CUSHION_THICKNESS;
        let max_z = self.width / 2.0 + CUSHION_THICKNESS;
        pos.x.abs() <= max_x && pos.z.abs() <= max_z
    }

    /// Where the cue ball starts and is respotted
    pub fn head_spot(&self, ball_radius: f32) -> Vec3 {
        Vec3::new(-self.length / 4.0, ball_radius, 0.0)
    }
}
