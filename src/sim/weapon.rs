//! Weapon firing
//!
//! Weapons fire automatically. Each kind turns the player's situation into
//! projectile velocities; the session owns cadence bookkeeping and builds
//! the projectile records.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Enemy;
use crate::tuning::WeaponTuning;
use crate::{direction, distance, polar_to_cartesian};

/// Heading used when a weapon has nothing better (screen-up, away from spawn edge)
pub const DEFAULT_HEADING: Vec2 = Vec2::new(0.0, -1.0);

/// Selectable weapon behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    /// One shot along the last movement direction
    Directional,
    /// A ring of shots in every direction
    Radial,
    /// One shot at the nearest enemy
    AutoAim,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [
        WeaponKind::Directional,
        WeaponKind::Radial,
        WeaponKind::AutoAim,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Directional => "Directional",
            WeaponKind::Radial => "Radial",
            WeaponKind::AutoAim => "AutoAim",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "directional" => Some(WeaponKind::Directional),
            "radial" => Some(WeaponKind::Radial),
            "autoaim" | "auto-aim" | "auto_aim" => Some(WeaponKind::AutoAim),
            _ => None,
        }
    }
}

/// True once more than `cadence` frames have passed since the last shot
#[inline]
pub fn ready(frame: u64, last_fire_frame: u64, cadence: u32) -> bool {
    frame.saturating_sub(last_fire_frame) > cadence as u64
}

/// Nearest live enemy by Euclidean distance
///
/// Exact ties resolve to whichever enemy comes first in the collection;
/// callers must not rely on a particular tie-break.
pub fn nearest_enemy(from: Vec2, enemies: &[Enemy]) -> Option<&Enemy> {
    enemies.iter().filter(|e| e.is_alive()).min_by(|a, b| {
        distance(from, a.pos)
            .partial_cmp(&distance(from, b.pos))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Velocities of the projectiles one trigger pull emits
pub fn volley(
    kind: WeaponKind,
    tuning: &WeaponTuning,
    player_pos: Vec2,
    last_move_dir: Option<Vec2>,
    enemies: &[Enemy],
) -> Vec<Vec2> {
    let speed = tuning.bullet_speed;
    match kind {
        WeaponKind::Directional => {
            let heading = last_move_dir
                .filter(|d| d.length() > 0.01)
                .map(|d| d.normalize())
                .unwrap_or(DEFAULT_HEADING);
            vec![heading * speed]
        }
        WeaponKind::Radial => {
            let n = tuning.projectiles.max(1);
            (0..n)
                .map(|i| polar_to_cartesian(speed, TAU * i as f32 / n as f32))
                .collect()
        }
        WeaponKind::AutoAim => {
            let heading = nearest_enemy(player_pos, enemies)
                .map(|e| direction(player_pos, e.pos))
                .filter(|d| *d != Vec2::ZERO)
                .unwrap_or(DEFAULT_HEADING);
            vec![heading * speed]
        }
    }
}
