//! Collision volumes and the narrow-phase overlap predicate
//!
//! The simulation only ever asks one question of the shape layer: do these
//! two positioned volumes overlap? `OverlapTest` is that seam. `Narrowphase`
//! answers it for spheres and axis-aligned boxes, and any closure with the
//! same signature can stand in for it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A positioned collision volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Volume {
    Sphere { center: Vec3, radius: f32 },
    /// Axis-aligned box
    Box { center: Vec3, half_extents: Vec3 },
}

impl Volume {
    pub fn center(&self) -> Vec3 {
        match *self {
            Volume::Sphere { center, .. } | Volume::Box { center, .. } => center,
        }
    }
}

/// Binary overlap predicate between two volumes
pub trait OverlapTest {
    fn overlaps(&self, a: &Volume, b: &Volume) -> bool;
}

impl<F> OverlapTest for F
where
    F: Fn(&Volume, &Volume) -> bool,
{
    fn overlaps(&self, a: &Volume, b: &Volume) -> bool {
        self(a, b)
    }
}

/// Default sphere/box intersection tests
#[derive(Debug, Clone, Copy, Default)]
pub struct Narrowphase;

impl OverlapTest for Narrowphase {
    fn overlaps(&self, a: &Volume, b: &Volume) -> bool {
        match (*a, *b) {
            (
                Volume::Sphere {
                    center: ca,
                    radius: ra,
                },
                Volume::Sphere {
                    center: cb,
                    radius: rb,
                },
            ) => {
                let reach = ra + rb;
                ca.distance_squared(cb) < reach * reach
            }
            (Volume::Sphere { center, radius }, Volume::Box { center: bc, half_extents })
            | (Volume::Box { center: bc, half_extents }, Volume::Sphere { center, radius }) => {
                sphere_box_overlap(center, radius, bc, half_extents)
            }
            (
                Volume::Box {
                    center: ca,
                    half_extents: ha,
                },
                Volume::Box {
                    center: cb,
                    half_extents: hb,
                },
            ) => {
                let gap = (ca - cb).abs() - (ha + hb);
                gap.max_element() < 0.0
            }
        }
    }
}

/// Sphere against axis-aligned box via the closest point on the box
fn sphere_box_overlap(center: Vec3, radius: f32, box_center: Vec3, half_extents: Vec3) -> bool {
    let min = box_center - half_extents;
    let max = box_center + half_extents;
    let closest = center.clamp(min, max);
    center.distance_squared(closest) < radius * radius
}
