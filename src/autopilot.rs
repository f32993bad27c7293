//! Idle/demo autopilot
//!
//! Turns a frame snapshot into a movement intent, the same way a keyboard
//! collaborator would. It reads only snapshots, never session state.

use glam::Vec2;

use crate::sim::{FrameInput, FrameResult};
use crate::tuning::Balance;

/// Enemies farther than this are ignored
const THREAT_RADIUS: f32 = 260.0;
/// Start steering off a wall this close to it
const WALL_BUFFER: f32 = 90.0;
/// Below this the player just drifts home
const MIN_THREAT: f32 = 1e-3;

/// Movement intent that backs away from nearby enemies
pub fn steer(frame: &FrameResult, balance: &Balance) -> FrameInput {
    let pos = frame.player.pos;

    // Inverse-square push away from every close enemy
    let mut push = Vec2::ZERO;
    for e in &frame.enemies {
        let away = pos - e.pos;
        let dist = away.length();
        if dist > 0.0 && dist < THREAT_RADIUS {
            push += away / (dist * dist);
        }
    }

    if push.length() < MIN_THREAT / THREAT_RADIUS {
        // Nothing close: drift toward the lower middle of the field
        let home = Vec2::new(balance.width / 2.0, balance.height * 0.75);
        let to_home = home - pos;
        if to_home.length() < 8.0 {
            return FrameInput::default();
        }
        return FrameInput {
            movement: to_home.normalize_or_zero(),
        };
    }

    let mut dir = push.normalize_or_zero();

    // Corners are traps: bend away from walls we are about to hit
    let mut wall = Vec2::ZERO;
    if pos.x < WALL_BUFFER {
        wall.x += 1.0;
    } else if pos.x > balance.width - WALL_BUFFER {
        wall.x -= 1.0;
    }
    if pos.y < WALL_BUFFER {
        wall.y += 1.0;
    } else if pos.y > balance.height - WALL_BUFFER {
        wall.y -= 1.0;
    }
    if wall != Vec2::ZERO {
        dir = (dir + wall.normalize() * 0.8).normalize_or_zero();
    }

    FrameInput { movement: dir }
}
