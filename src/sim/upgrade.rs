//! Upgrades chosen between waves
//!
//! Two classes of effect are kept apart on purpose:
//! - recomputed effects (cadence, speed) are re-derived from the whole
//!   history at the start of every wave, starting from the defaults;
//! - one-shot effects (bonus HP, score doubling) are applied once, at the
//!   moment the upgrade is chosen, and are never replayed.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::state::Player;
use super::weapon::WeaponKind;
use crate::tuning::Balance;

/// Fixed, closed set of upgrades the selection menu offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    RapidFire,
    SpeedUp,
    ExtraLife,
    DoubleScore,
}

/// Stat re-derived from the history each wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatModifier {
    /// Lower weapon cadence by one step, down to the floor
    Cadence,
    /// Add the speed bonus to player movement speed
    Speed,
}

/// Effect applied once, at selection time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShot {
    /// Permanent hit point bonus
    BonusHp,
    /// Double the current score
    DoubleScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeEffect {
    Recomputed(StatModifier),
    OneShot(OneShot),
}

impl Upgrade {
    pub const ALL: [Upgrade; 4] = [
        Upgrade::RapidFire,
        Upgrade::SpeedUp,
        Upgrade::ExtraLife,
        Upgrade::DoubleScore,
    ];

    /// Menu label
    pub fn as_str(&self) -> &'static str {
        match self {
            Upgrade::RapidFire => "Rapid Fire",
            Upgrade::SpeedUp => "Speed Up",
            Upgrade::ExtraLife => "Extra Life",
            Upgrade::DoubleScore => "Double Score",
        }
    }

    /// Parse a menu label; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.as_str() == name.trim())
    }

    pub fn effect(&self) -> UpgradeEffect {
        match self {
            Upgrade::RapidFire => UpgradeEffect::Recomputed(StatModifier::Cadence),
            Upgrade::SpeedUp => UpgradeEffect::Recomputed(StatModifier::Speed),
            Upgrade::ExtraLife => UpgradeEffect::OneShot(OneShot::BonusHp),
            Upgrade::DoubleScore => UpgradeEffect::OneShot(OneShot::DoubleScore),
        }
    }
}

/// Stats recomputed at the start of each wave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Frames between shots for the run's weapon
    pub cadence: u32,
    /// Player movement speed in pixels per frame
    pub player_speed: f32,
}

impl DerivedStats {
    /// Defaults with no upgrades
    pub fn base(balance: &Balance, weapon: WeaponKind) -> Self {
        Self {
            cadence: balance.weapon(weapon).cadence,
            player_speed: balance.player_speed,
        }
    }

    /// Reset to the defaults, then replay every recomputed effect in order
    ///
    /// Rapid Fire shortens the cadence of whichever weapon the run uses,
    /// radial and auto-aim included.
    pub fn from_history(balance: &Balance, weapon: WeaponKind, history: &[Upgrade]) -> Self {
        let mut stats = Self::base(balance, weapon);
        for upgrade in history {
            if let UpgradeEffect::Recomputed(modifier) = upgrade.effect() {
                stats.apply(modifier, balance);
            }
        }
        stats
    }

    fn apply(&mut self, modifier: StatModifier, balance: &Balance) {
        match modifier {
            StatModifier::Cadence => {
                // The floor never raises a cadence that already starts below it
                let floor = balance.cadence_floor.min(self.cadence);
                self.cadence = self.cadence.saturating_sub(balance.rapid_fire_step).max(floor);
            }
            StatModifier::Speed => self.player_speed += balance.speed_up_bonus,
        }
    }
}

/// Apply a one-shot effect to the live player and score
pub fn apply_one_shot(effect: OneShot, player: &mut Player, score: &mut u64, balance: &Balance) {
    match effect {
        OneShot::BonusHp => player.hp += balance.extra_life_bonus,
        OneShot::DoubleScore => *score = score.saturating_mul(2),
    }
}

/// Draw `count` distinct upgrades for the selection menu
pub fn offer<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Upgrade> {
    let mut pool = Upgrade::ALL.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
