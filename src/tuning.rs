//! Data-driven game balance
//!
//! [`Balance`] mirrors every constant in [`crate::consts`]. A host can load a
//! partial JSON override with [`Balance::from_json`]; missing keys fall back
//! to the compile-time defaults. The session takes one `Balance` at
//! construction and never reads global state, so independent sessions (tests,
//! replays) cannot interfere with each other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_to_field;
use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::sim::WeaponKind;

/// Firing parameters for one weapon kind
///
/// Nested weapon tables in a balance file must be given in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponTuning {
    /// Frames between shots/volleys (higher = slower)
    pub cadence: u32,
    /// Projectile speed in pixels per frame
    pub bullet_speed: f32,
    /// Projectile collision radius
    pub bullet_radius: f32,
    /// Projectiles per volley (only the radial weapon uses more than one)
    pub projectiles: u32,
}

/// Complete, immutable game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    // -- Playfield --
    pub width: f32,
    pub height: f32,

    // -- Player --
    pub player_speed: f32,
    pub player_radius: f32,
    pub player_hp: u32,
    pub player_spawn_inset: f32,

    // -- Weapons --
    pub directional: WeaponTuning,
    pub radial: WeaponTuning,
    pub auto_aim: WeaponTuning,

    // -- Upgrades --
    pub rapid_fire_step: u32,
    pub cadence_floor: u32,
    pub speed_up_bonus: f32,
    pub extra_life_bonus: u32,

    // -- Enemies --
    pub enemy_radius: f32,
    pub enemy_base_hp: u32,
    pub enemy_hp_per_two_waves: u32,
    pub enemy_base_speed: f32,
    pub enemy_speed_per_wave: f32,
    pub enemy_speed_jitter: f32,
    pub enemy_base_count: u32,
    pub enemy_count_per_wave: u32,
    pub enemy_flash_frames: u32,

    // -- Spawn band --
    pub spawn_margin_x: f32,
    pub spawn_top: f32,
    pub spawn_band_height: f32,

    // -- Scoring --
    pub score_per_frame: u64,
    pub wave_clear_bonus: u64,

    // -- Lifecycle --
    pub projectile_cull_margin: f32,
    pub wave_clear_delay_frames: u32,
}

impl Default for Balance {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,

            player_speed: PLAYER_SPEED,
            player_radius: PLAYER_RADIUS,
            player_hp: PLAYER_HP,
            player_spawn_inset: PLAYER_SPAWN_INSET,

            directional: WeaponTuning {
                cadence: DIRECTIONAL_CADENCE,
                bullet_speed: DIRECTIONAL_BULLET_SPEED,
                bullet_radius: DIRECTIONAL_BULLET_RADIUS,
                projectiles: 1,
            },
            radial: WeaponTuning {
                cadence: RADIAL_CADENCE,
                bullet_speed: RADIAL_BULLET_SPEED,
                bullet_radius: RADIAL_BULLET_RADIUS,
                projectiles: RADIAL_PROJECTILES,
            },
            auto_aim: WeaponTuning {
                cadence: AUTO_AIM_CADENCE,
                bullet_speed: AUTO_AIM_BULLET_SPEED,
                bullet_radius: AUTO_AIM_BULLET_RADIUS,
                projectiles: 1,
            },

            rapid_fire_step: RAPID_FIRE_STEP,
            cadence_floor: CADENCE_FLOOR,
            speed_up_bonus: SPEED_UP_BONUS,
            extra_life_bonus: EXTRA_LIFE_BONUS,

            enemy_radius: ENEMY_RADIUS,
            enemy_base_hp: ENEMY_BASE_HP,
            enemy_hp_per_two_waves: ENEMY_HP_PER_TWO_WAVES,
            enemy_base_speed: ENEMY_BASE_SPEED,
            enemy_speed_per_wave: ENEMY_SPEED_PER_WAVE,
            enemy_speed_jitter: ENEMY_SPEED_JITTER,
            enemy_base_count: ENEMY_BASE_COUNT,
            enemy_count_per_wave: ENEMY_COUNT_PER_WAVE,
            enemy_flash_frames: ENEMY_FLASH_FRAMES,

            spawn_margin_x: SPAWN_MARGIN_X,
            spawn_top: SPAWN_TOP,
            spawn_band_height: SPAWN_BAND_HEIGHT,

            score_per_frame: SCORE_PER_FRAME,
            wave_clear_bonus: WAVE_CLEAR_BONUS,

            projectile_cull_margin: PROJECTILE_CULL_MARGIN,
            wave_clear_delay_frames: WAVE_CLEAR_DELAY_FRAMES,
        }
    }
}

impl Balance {
    /// Parse a (possibly partial) JSON balance override and validate it
    pub fn from_json(json: &str) -> SimResult<Self> {
        let balance: Balance = serde_json::from_str(json)?;
        balance.validate()?;
        Ok(balance)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> SimResult<()> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("player_radius", self.player_radius)?;
        positive("enemy_radius", self.enemy_radius)?;
        non_negative("player_speed", self.player_speed)?;
        non_negative("enemy_base_speed", self.enemy_base_speed)?;
        non_negative("enemy_speed_jitter", self.enemy_speed_jitter)?;

        if self.player_hp == 0 {
            return Err(invalid("player_hp", 0.0, "[1, ∞)"));
        }
        if self.enemy_base_hp == 0 {
            return Err(invalid("enemy_base_hp", 0.0, "[1, ∞)"));
        }

        // Both the player and an enemy must fit on the field
        let min_dim = self.width.min(self.height);
        if self.player_radius * 2.0 > min_dim {
            return Err(invalid("player_radius", self.player_radius, "[0, min(width, height) / 2]"));
        }
        if self.enemy_radius * 2.0 > min_dim {
            return Err(invalid("enemy_radius", self.enemy_radius, "[0, min(width, height) / 2]"));
        }

        for (name, weapon) in [
            ("directional", &self.directional),
            ("radial", &self.radial),
            ("auto_aim", &self.auto_aim),
        ] {
            positive(name, weapon.bullet_speed)?;
            positive(name, weapon.bullet_radius)?;
            if weapon.projectiles == 0 {
                return Err(invalid(name, 0.0, "projectiles >= 1"));
            }
        }

        Ok(())
    }

    /// Tuning table for a weapon kind
    pub fn weapon(&self, kind: WeaponKind) -> &WeaponTuning {
        match kind {
            WeaponKind::Directional => &self.directional,
            WeaponKind::Radial => &self.radial,
            WeaponKind::AutoAim => &self.auto_aim,
        }
    }

    /// Where the player (re)appears at the start of a wave, kept inside the field
    pub fn player_spawn(&self) -> Vec2 {
        clamp_to_field(
            Vec2::new(self.width / 2.0, self.height - self.player_spawn_inset),
            self.player_radius,
            self.width,
            self.height,
        )
    }
}

fn invalid(name: &'static str, value: f32, expected: &'static str) -> SimError {
    SimError::InvalidBalance {
        name,
        value,
        expected,
    }
}

fn positive(name: &'static str, value: f32) -> SimResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, value, "(0, ∞)"))
    }
}

fn non_negative(name: &'static str, value: f32) -> SimResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, value, "[0, ∞)"))
    }
}

/// Enemy parameters derived for one wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSpec {
    pub wave: u32,
    /// Enemies spawned: `base + per_wave * wave`
    pub enemy_count: u32,
    /// Hit points per enemy: `base + floor(wave / 2) * per_two_waves`
    pub enemy_hp: u32,
    /// Speed before per-enemy jitter
    pub enemy_speed: f32,
}

impl WaveSpec {
    pub fn for_wave(balance: &Balance, wave: u32) -> Self {
        Self {
            wave,
            enemy_count: balance
                .enemy_base_count
                .saturating_add(balance.enemy_count_per_wave.saturating_mul(wave)),
            enemy_hp: balance
                .enemy_base_hp
                .saturating_add((wave / 2).saturating_mul(balance.enemy_hp_per_two_waves)),
            enemy_speed: balance.enemy_base_speed + wave as f32 * balance.enemy_speed_per_wave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Balance::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let balance = Balance::from_json(r#"{ "width": 800.0, "player_hp": 5 }"#).unwrap();
        assert_eq!(balance.width, 800.0);
        assert_eq!(balance.player_hp, 5);
        // Untouched keys keep their defaults
        assert_eq!(balance.height, PLAYFIELD_HEIGHT);
        assert_eq!(balance.radial.projectiles, RADIAL_PROJECTILES);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Balance::from_json(r#"{ "enemy_radius": -3.0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidBalance { name: "enemy_radius", .. }));

        let err = Balance::from_json(r#"{ "player_hp": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidBalance { name: "player_hp", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Balance::from_json("{ width: ").unwrap_err();
        assert!(matches!(err, SimError::BalanceParse(_)));
    }

    #[test]
    fn test_wave_spec_scaling() {
        let balance = Balance::default();

        let w1 = WaveSpec::for_wave(&balance, 1);
        assert_eq!(w1.enemy_count, 6);
        assert_eq!(w1.enemy_hp, 1);
        assert!((w1.enemy_speed - 1.2).abs() < 1e-6);

        let w4 = WaveSpec::for_wave(&balance, 4);
        assert_eq!(w4.enemy_count, 12);
        assert_eq!(w4.enemy_hp, 3);
    }

    #[test]
    fn test_player_spawn() {
        let balance = Balance::default();
        assert_eq!(balance.player_spawn(), Vec2::new(600.0, 840.0));
    }

    #[test]
    fn test_player_spawn_stays_in_field() {
        let balance = Balance::from_json(r#"{ "player_spawn_inset": 0.0 }"#).unwrap();
        let spawn = balance.player_spawn();
        assert_eq!(spawn.y, balance.height - balance.player_radius);

        let balance = Balance::from_json(r#"{ "player_spawn_inset": 5000.0 }"#).unwrap();
        assert_eq!(balance.player_spawn().y, balance.player_radius);
    }

    #[test]
    fn test_wave_spec_huge_wave_saturates() {
        let spec = WaveSpec::for_wave(&Balance::default(), u32::MAX);
        assert_eq!(spec.enemy_count, u32::MAX);
        assert_eq!(spec.enemy_hp, u32::MAX);
    }
}
