//! Read-only per-frame snapshots handed to the host
//!
//! Renderers draw from these; nothing here refers back into session state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior::BehaviorTag;
use super::state::{Enemy, GameEvent, GamePhase, Player, Projectile, ProjectileOrigin};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: u32,
    pub behavior: BehaviorTag,
    /// Render as damaged this frame
    pub flashing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub origin: ProjectileOrigin,
}

/// Result of one `advance_frame` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub phase: GamePhase,
    pub wave: u32,
    pub score: u64,
    pub player_hp: u32,
    pub live_enemy_count: usize,
    pub player: PlayerSnapshot,
    pub enemies: Vec<EnemySnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Set on the frame a terminal transition is reported
    pub event: Option<GameEvent>,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            pos: p.pos,
            radius: p.radius,
            hp: p.hp,
        }
    }
}

impl EnemySnapshot {
    pub fn new(e: &Enemy, radius: f32) -> Self {
        Self {
            id: e.id,
            pos: e.pos,
            radius,
            hp: e.hp,
            behavior: e.behavior.tag(),
            flashing: e.flash_frames > 0,
        }
    }
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            pos: p.pos,
            radius: p.radius,
            origin: p.origin,
        }
    }
}

impl FrameResult {
    /// Snapshot as JSON, for hosts that ship frames across a process boundary
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
