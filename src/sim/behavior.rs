//! Enemy movement patterns
//!
//! Every pattern re-targets the player each frame. There are no obstacles,
//! so nothing paths around anything; patterns only bend the chase line.
//! Per-enemy randomized parameters are drawn once at spawn and carried in
//! the [`Behavior`] variant, so each tag owns exactly the scratch state it uses.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Enemy;
use crate::tuning::Balance;
use crate::{clamp_to_field, direction, distance, polar_to_cartesian};

/// Zigzag lateral step is `amp / ZIGZAG_AMP_DIVISOR` per frame at the sine peak
const ZIGZAG_AMP_DIVISOR: f32 = 60.0;

/// Spiral approaches at this fraction of base speed
const SPIRAL_APPROACH: f32 = 0.7;
const SPIRAL_BASE_RADIUS: f32 = 60.0;
const SPIRAL_RADIUS_SWING: f32 = 30.0;
const SPIRAL_RADIUS_FREQ: f32 = 0.03;

/// Delayed enemies rush at this multiple of base speed once released
const DELAYED_RUSH: f32 = 1.7;

/// Flank bend fades out over this distance to the player
const FLANK_DECAY_DISTANCE: f32 = 400.0;

const SURROUND_BASE_RADIUS: f32 = 120.0;
const SURROUND_RADIUS_SWING: f32 = 40.0;
const SURROUND_RADIUS_FREQ: f32 = 0.01;

/// Fixed, closed set of movement-pattern classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorTag {
    Straight,
    Zigzag,
    Spiral,
    Delayed,
    FlankLeft,
    FlankRight,
    Surround,
}

impl BehaviorTag {
    pub const ALL: [BehaviorTag; 7] = [
        BehaviorTag::Straight,
        BehaviorTag::Zigzag,
        BehaviorTag::Spiral,
        BehaviorTag::Delayed,
        BehaviorTag::FlankLeft,
        BehaviorTag::FlankRight,
        BehaviorTag::Surround,
    ];

    /// Relative spawn weight (plain chasers are twice as common)
    pub fn weight(self) -> u32 {
        match self {
            BehaviorTag::Straight | BehaviorTag::Zigzag => 2,
            _ => 1,
        }
    }

    /// Draw a tag using the spawn weights
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let total: u32 = Self::ALL.iter().map(|t| t.weight()).sum();
        let mut roll = rng.random_range(0..total);
        for tag in Self::ALL {
            let w = tag.weight();
            if roll < w {
                return tag;
            }
            roll -= w;
        }
        BehaviorTag::Straight
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorTag::Straight => "straight",
            BehaviorTag::Zigzag => "zigzag",
            BehaviorTag::Spiral => "spiral",
            BehaviorTag::Delayed => "delayed",
            BehaviorTag::FlankLeft => "flankLeft",
            BehaviorTag::FlankRight => "flankRight",
            BehaviorTag::Surround => "surround",
        }
    }
}

/// Which way a flanker bends its approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlankSide {
    Left,
    Right,
}

/// Movement pattern with its per-enemy state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Straight,
    /// Lateral sine wobble; phase comes from frames since spawn
    Zigzag { freq: f32, amp: f32 },
    /// Slow approach plus a rotating offset; `angle` advances by `rate` each frame
    Spiral { angle: f32, rate: f32 },
    /// Holds still for `delay` frames after spawn, then rushes
    Delayed { delay: u32 },
    /// Chase line rotated by `angle`, fading with `progress` as the gap closes
    Flank {
        side: FlankSide,
        angle: f32,
        progress: f32,
    },
    /// Chases a point orbiting the player; `angle` advances by `rate` each frame
    Surround { angle: f32, rate: f32 },
}

impl Behavior {
    /// Build the scratch state for `tag`, drawing its randomized parameters
    pub fn spawn<R: Rng + ?Sized>(tag: BehaviorTag, rng: &mut R) -> Self {
        match tag {
            BehaviorTag::Straight => Behavior::Straight,
            BehaviorTag::Zigzag => Behavior::Zigzag {
                freq: 0.08 + 0.02 * rng.random::<f32>(),
                amp: 32.0 + 16.0 * rng.random::<f32>(),
            },
            BehaviorTag::Spiral => Behavior::Spiral {
                angle: rng.random::<f32>() * TAU,
                rate: 0.13 + 0.05 * rng.random::<f32>(),
            },
            BehaviorTag::Delayed => Behavior::Delayed {
                delay: 40 + rng.random_range(0..30),
            },
            BehaviorTag::FlankLeft => Behavior::Flank {
                side: FlankSide::Left,
                angle: PI / 6.0 + rng.random::<f32>() * PI / 18.0,
                progress: 0.0,
            },
            BehaviorTag::FlankRight => Behavior::Flank {
                side: FlankSide::Right,
                angle: -(PI / 6.0) - rng.random::<f32>() * PI / 18.0,
                progress: 0.0,
            },
            BehaviorTag::Surround => Behavior::Surround {
                angle: rng.random::<f32>() * TAU,
                rate: 0.025 + 0.01 * rng.random::<f32>(),
            },
        }
    }

    pub fn tag(&self) -> BehaviorTag {
        match self {
            Behavior::Straight => BehaviorTag::Straight,
            Behavior::Zigzag { .. } => BehaviorTag::Zigzag,
            Behavior::Spiral { .. } => BehaviorTag::Spiral,
            Behavior::Delayed { .. } => BehaviorTag::Delayed,
            Behavior::Flank {
                side: FlankSide::Left,
                ..
            } => BehaviorTag::FlankLeft,
            Behavior::Flank {
                side: FlankSide::Right,
                ..
            } => BehaviorTag::FlankRight,
            Behavior::Surround { .. } => BehaviorTag::Surround,
        }
    }
}

/// Advance one enemy by one frame toward `player_pos`, then clamp to the field
pub fn advance(enemy: &mut Enemy, player_pos: Vec2, frame: u64, balance: &Balance) {
    let elapsed = frame.saturating_sub(enemy.spawn_frame) as f32;
    let dir = direction(enemy.pos, player_pos);
    let speed = enemy.speed;

    let step = match &mut enemy.behavior {
        Behavior::Straight => dir * speed,

        Behavior::Zigzag { freq, amp } => {
            let perp = Vec2::new(-dir.y, dir.x);
            let wobble = (elapsed * *freq).sin() * (*amp / ZIGZAG_AMP_DIVISOR);
            dir * speed + perp * wobble
        }

        Behavior::Spiral { angle, rate } => {
            *angle += *rate;
            let radius = SPIRAL_BASE_RADIUS
                + SPIRAL_RADIUS_SWING * (elapsed * SPIRAL_RADIUS_FREQ).sin();
            dir * (speed * SPIRAL_APPROACH) + polar_to_cartesian(radius / 60.0, *angle)
        }

        Behavior::Delayed { delay } => {
            if elapsed < *delay as f32 {
                Vec2::ZERO
            } else {
                dir * (speed * DELAYED_RUSH)
            }
        }

        Behavior::Flank {
            angle, progress, ..
        } => {
            let gap = distance(enemy.pos, player_pos);
            *progress = 1.0 - (gap / FLANK_DECAY_DISTANCE).min(1.0);
            if dir == Vec2::ZERO {
                Vec2::ZERO
            } else {
                let heading = dir.y.atan2(dir.x) + *angle * (1.0 - *progress);
                polar_to_cartesian(speed, heading)
            }
        }

        Behavior::Surround { angle, rate } => {
            let orbit_radius = SURROUND_BASE_RADIUS
                + SURROUND_RADIUS_SWING * (elapsed * SURROUND_RADIUS_FREQ).sin();
            *angle += *rate;
            let target = player_pos + polar_to_cartesian(orbit_radius, *angle);
            direction(enemy.pos, target) * speed
        }
    };

    enemy.pos = clamp_to_field(
        enemy.pos + step,
        balance.enemy_radius,
        balance.width,
        balance.height,
    );
}
