//! Vibenator - synthwave wave-survival shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, behaviors, weapons, collisions, waves)
//! - `tuning`: Data-driven game balance
//! - `autopilot`: Snapshot-driven movement intent for headless play
//! - `error`: Host-facing contract errors

pub mod autopilot;
pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{SimError, SimResult};
pub use tuning::Balance;

use glam::Vec2;

/// Game configuration constants (defaults for [`Balance`])
pub mod consts {
    /// Nominal frame rate the cadences are tuned for
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 1200.0;
    pub const PLAYFIELD_HEIGHT: f32 = 900.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 5.0; // pixels per frame
    pub const PLAYER_RADIUS: f32 = 18.0;
    pub const PLAYER_HP: u32 = 3;
    /// Player spawn distance above the bottom edge
    pub const PLAYER_SPAWN_INSET: f32 = 60.0;

    /// Directional weapon
    pub const DIRECTIONAL_CADENCE: u32 = 8;
    pub const DIRECTIONAL_BULLET_SPEED: f32 = 8.0;
    pub const DIRECTIONAL_BULLET_RADIUS: f32 = 7.0;

    /// Radial weapon (slow, all directions)
    pub const RADIAL_CADENCE: u32 = 80;
    pub const RADIAL_BULLET_SPEED: f32 = 3.0;
    pub const RADIAL_BULLET_RADIUS: f32 = 6.0;
    pub const RADIAL_PROJECTILES: u32 = 8;

    /// Auto-aim weapon
    pub const AUTO_AIM_CADENCE: u32 = 20;
    pub const AUTO_AIM_BULLET_SPEED: f32 = 4.0;
    pub const AUTO_AIM_BULLET_RADIUS: f32 = 3.0;

    /// Upgrades
    pub const RAPID_FIRE_STEP: u32 = 4;
    pub const CADENCE_FLOOR: u32 = 4;
    pub const SPEED_UP_BONUS: f32 = 2.0;
    pub const EXTRA_LIFE_BONUS: u32 = 1;

    /// Enemies
    pub const ENEMY_RADIUS: f32 = 18.0;
    pub const ENEMY_BASE_HP: u32 = 1;
    pub const ENEMY_HP_PER_TWO_WAVES: u32 = 1;
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    pub const ENEMY_SPEED_PER_WAVE: f32 = 0.2;
    /// Upper bound (exclusive) of the random speed jitter added at spawn
    pub const ENEMY_SPEED_JITTER: f32 = 1.0;
    pub const ENEMY_BASE_COUNT: u32 = 4;
    pub const ENEMY_COUNT_PER_WAVE: u32 = 2;
    /// Frames an enemy renders as damaged after a hit
    pub const ENEMY_FLASH_FRAMES: u32 = 8;

    /// Spawn band (upper playfield)
    pub const SPAWN_MARGIN_X: f32 = 60.0;
    pub const SPAWN_TOP: f32 = 60.0;
    pub const SPAWN_BAND_HEIGHT: f32 = 200.0;

    /// Scoring
    pub const SCORE_PER_FRAME: u64 = 1;
    pub const WAVE_CLEAR_BONUS: u64 = 100; // multiplied by wave number

    /// Projectiles survive this far past the playfield edge
    pub const PROJECTILE_CULL_MARGIN: f32 = 20.0;

    /// Wave-clear pause before the host is notified (800 ms at 60 fps)
    pub const WAVE_CLEAR_DELAY_FRAMES: u32 = 48;
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
///
/// A zero result means "no preferred heading"; callers pick their own fallback.
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let len = delta.length();
    if len <= f32::EPSILON {
        return Vec2::ZERO;
    }
    delta / len
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Clamp a scalar into `[min, max]`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Clamp a circle center so the whole circle stays inside a `width` x `height` field
#[inline]
pub fn clamp_to_field(pos: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        clamp(pos.x, radius, width - radius),
        clamp(pos.y, radius, height - radius),
    )
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_direction_unit_length() {
        let dir = direction(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
        assert!((dir.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_direction_coincident_points() {
        let p = Vec2::new(10.0, 10.0);
        assert_eq!(direction(p, p), Vec2::ZERO);
    }

    #[test]
    fn test_clamp_to_field() {
        let pos = clamp_to_field(Vec2::new(-5.0, 950.0), 18.0, 1200.0, 900.0);
        assert_eq!(pos, Vec2::new(18.0, 882.0));
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0)), 5.0);
    }

    proptest! {
        #[test]
        fn direction_is_unit_or_zero(
            ax in -2000.0f32..2000.0, ay in -2000.0f32..2000.0,
            bx in -2000.0f32..2000.0, by in -2000.0f32..2000.0,
        ) {
            let dir = direction(Vec2::new(ax, ay), Vec2::new(bx, by));
            prop_assert!(dir.is_finite());
            let len = dir.length();
            prop_assert!(len == 0.0 || (len - 1.0).abs() < 1e-4);
        }
    }
}
