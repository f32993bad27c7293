//! Entity records and session-level state
//!
//! Everything the host may observe is exposed through snapshots
//! ([`super::snapshot`]); the records here are owned by the session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior::Behavior;
use crate::tuning::Balance;

/// Current phase of the wave lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No wave has been started yet
    Idle,
    /// Active gameplay
    Active,
    /// Wave cleared; counting down before the host is told
    WaveClearing { frames_left: u32 },
    /// Wave cleared and reported; waiting for the next `start_wave`
    AwaitingNextWave,
    /// Run ended
    GameOver,
}

/// Terminal events surfaced to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveCleared { score: u64 },
    GameOver { score: u64 },
}

/// The player-controlled agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: u32,
    /// Last nonzero movement direction (None until the player first moves)
    pub last_move_dir: Option<Vec2>,
}

impl Player {
    pub fn new(balance: &Balance) -> Self {
        Self {
            pos: balance.player_spawn(),
            radius: balance.player_radius,
            hp: balance.player_hp,
            last_move_dir: None,
        }
    }

    /// Move by a normalized intent at `speed`, clamped to the field
    pub fn apply_movement(&mut self, intent: Vec2, speed: f32, balance: &Balance) {
        let len = intent.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return;
        }
        let dir = intent / len;
        self.pos = crate::clamp_to_field(
            self.pos + dir * speed,
            self.radius,
            balance.width,
            balance.height,
        );
        self.last_move_dir = Some(dir);
    }
}

/// An autonomous enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub hp: u32,
    pub speed: f32,
    /// Frames remaining to render as damaged
    pub flash_frames: u32,
    /// Frame counter value at spawn
    pub spawn_frame: u64,
    /// Movement pattern plus its per-enemy scratch state
    pub behavior: Behavior,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOrigin {
    Player,
    /// Reserved; nothing emits enemy projectiles yet
    Enemy,
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub origin: ProjectileOrigin,
}

impl Projectile {
    /// Advance one frame along the velocity
    pub fn step(&mut self) {
        self.pos += self.vel;
    }

    /// Still inside the field extended by `margin` on every side
    pub fn in_bounds(&self, balance: &Balance) -> bool {
        let m = balance.projectile_cull_margin;
        self.pos.x > -m
            && self.pos.x < balance.width + m
            && self.pos.y > -m
            && self.pos.y < balance.height + m
    }
}

/// Per-wave bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveState {
    /// Current wave number (>= 1 once a wave has started)
    pub wave: u32,
    /// Frames elapsed in this wave
    pub frame: u64,
    /// Frame of the last shot/volley
    pub last_fire_frame: u64,
    /// Guards the wave-clear transition so it fires once
    pub cleared: bool,
}

impl WaveState {
    pub fn new(wave: u32) -> Self {
        Self {
            wave,
            frame: 0,
            last_fire_frame: 0,
            cleared: false,
        }
    }
}
