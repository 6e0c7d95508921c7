//! Collision detection and response for one tick
//!
//! Contacts are resolved in a fixed order so a tick is reproducible: every
//! ball-ball pair (ascending ids), then ball-cushion, then ball-pocket.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::ball::{Ball, BallId};
use super::geometry::OverlapTest;
use super::motion::is_moving;
use super::table::Table;
use crate::heading_angle;

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Balls that dropped into a pocket this tick, in potting order
    pub potted: Vec<BallId>,
    /// Whether the cue ball was among them
    pub cue_potted: bool,
    /// First object ball the cue ball touched this tick, if any
    pub first_touch: Option<BallId>,
}

/// Post-collision heading and speed for one ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallMotion {
    pub direction: Vec3,
    pub speed: f32,
}

/// Resolve a contact between a moving `striker` and the `struck` ball.
///
/// Speeds come from the 2D exchange decomposition: each ball keeps the part
/// of its own velocity across the line of centers and takes the other's
/// part along it. The struck ball heads off along the contact vector; the
/// striker's new heading is its old one minus the contact vector.
pub fn resolve_pair(striker: &Ball, struck: &Ball) -> (BallMotion, BallMotion) {
    let contact = flatten(struck.pos - striker.pos).normalize_or_zero();
    let phi = heading_angle(contact);
    let theta_a = heading_angle(striker.direction);
    let theta_b = heading_angle(struck.direction);

    let speed_a = exchange_speed(striker.speed, theta_a, struck.speed, theta_b, phi);
    let speed_b = exchange_speed(struck.speed, theta_b, striker.speed, theta_a, phi);

    let mut dir_a = flatten(striker.direction - contact).normalize_or_zero();
    if dir_a == Vec3::ZERO && speed_a > 0.0 {
        // Head-on with the old heading equal to the contact vector
        dir_a = -contact;
    }

    (
        BallMotion {
            direction: dir_a,
            speed: speed_a,
        },
        BallMotion {
            direction: contact,
            speed: speed_b,
        },
    )
}

/// Speed of one ball after an exchange along the line of centers at `phi`
fn exchange_speed(v_self: f32, theta_self: f32, v_other: f32, theta_other: f32, phi: f32) -> f32 {
    let along = v_other * (theta_other - phi).cos();
    let across = v_self * (theta_self - phi).sin();
    let vx = along * phi.cos() + across * (phi + FRAC_PI_2).cos();
    let vz = along * phi.sin() + across * (phi + FRAC_PI_2).sin();
    (vx * vx + vz * vz).sqrt()
}

/// Mirror a direction off a surface: d' = d - 2(d·n)n
#[inline]
pub fn reflect_direction(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

#[inline]
fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Resolve every overlapping pair of balls on the table.
///
/// Balls must be sorted by id. Returns the first object ball the cue ball
/// overlapped, scanning pairs in order.
pub fn resolve_ball_pairs<O: OverlapTest>(balls: &mut [Ball], overlap: &O) -> Option<BallId> {
    let mut first_touch = None;

    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if !a.is_on_table() || !b.is_on_table() {
                continue;
            }
            if !overlap.overlaps(&a.volume(), &b.volume()) {
                continue;
            }

            if first_touch.is_none() {
                if a.kind.is_cue() {
                    first_touch = Some(b.id);
                } else if b.kind.is_cue() {
                    first_touch = Some(a.id);
                }
            }

            if !is_moving(a) && !is_moving(b) {
                continue;
            }

            // The faster ball is the striker; ties go to the lower id
            if b.speed > a.speed {
                apply_pair(b, a);
            } else {
                apply_pair(a, b);
            }
            separate(a, b);
        }
    }

    first_touch
}

fn apply_pair(striker: &mut Ball, struck: &mut Ball) {
    let (a, b) = resolve_pair(striker, struck);
    log::trace!(
        "ball {} strikes ball {}: speeds {:.3} -> {:.3}, {:.3}",
        striker.id,
        struck.id,
        striker.speed,
        a.speed,
        b.speed
    );
    striker.direction = a.direction;
    striker.speed = a.speed;
    struck.direction = b.direction;
    struck.speed = b.speed;
}

/// Push two overlapping balls apart along the line of centers
fn separate(a: &mut Ball, b: &mut Ball) {
    let delta = flatten(b.pos - a.pos);
    let dist = delta.length();
    let penetration = a.radius + b.radius - dist;
    if penetration <= 0.0 || dist < 1e-6 {
        return;
    }
    let push = delta / dist * (penetration * 0.5);
    a.pos -= push;
    b.pos += push;
}

/// Reflect balls that are pressing into a cushion. Speed is unchanged.
pub fn resolve_cushions<O: OverlapTest>(balls: &mut [Ball], table: &Table, overlap: &O) {
    for ball in balls.iter_mut().filter(|b| b.is_on_table()) {
        for cushion in &table.cushions {
            // Only reflect while heading into the cushion, so a ball still
            // overlapping on the way out is not flipped back
            if ball.direction.dot(cushion.normal) <= 0.0 {
                continue;
            }
            if overlap.overlaps(&ball.volume(), &cushion.volume) {
                ball.direction =
                    reflect_direction(ball.direction, cushion.normal).normalize_or_zero();
            }
        }
    }
}

/// Pot every ball overlapping a pocket, in id order
pub fn resolve_pockets<O: OverlapTest>(
    balls: &mut [Ball],
    table: &Table,
    overlap: &O,
    report: &mut CollisionReport,
) {
    for ball in balls.iter_mut().filter(|b| b.is_on_table()) {
        let volume = ball.volume();
        if let Some(pocket) = table
            .pockets
            .iter()
            .find(|p| overlap.overlaps(&volume, &p.volume))
        {
            log::debug!("ball {} dropped in pocket {}", ball.id, pocket.id);
            ball.pot();
            report.potted.push(ball.id);
            if ball.kind.is_cue() {
                report.cue_potted = true;
            }
        }
    }
}

/// Run one full resolution pass: pairs, then cushions, then pockets
pub fn resolve_tick<O: OverlapTest>(
    balls: &mut [Ball],
    table: &Table,
    overlap: &O,
) -> CollisionReport {
    let mut report = CollisionReport {
        first_touch: resolve_ball_pairs(balls, overlap),
        ..Default::default()
    };
    resolve_cushions(balls, table, overlap);
    resolve_pockets(balls, table, overlap, &mut report);
    report
}
