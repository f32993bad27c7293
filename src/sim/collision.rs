//! Collision detection and response
//!
//! All bodies are circles, so every test is a center-distance check. The
//! passes run once per frame, after movement, in a fixed order:
//! enemy separation, projectile hits, dead-enemy removal, player contact.

use glam::Vec2;

use super::state::{Enemy, Player, Projectile, ProjectileOrigin};
use crate::clamp_to_field;
use crate::tuning::Balance;

/// What the collision passes did this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Projectile hits landed on enemies
    pub hits: u32,
    /// Enemies removed because their hit points ran out
    pub kills: u32,
    /// Enemies consumed by touching the player (each costs one hit point)
    pub contacts: u32,
}

/// Whether two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    (a - b).length() < ra + rb
}

/// Run every collision pass in order
pub fn resolve(
    player: &mut Player,
    enemies: &mut Vec<Enemy>,
    projectiles: &mut Vec<Projectile>,
    balance: &Balance,
) -> CollisionReport {
    separate_enemies(enemies, balance);
    let hits = projectile_hits(projectiles, enemies, balance);
    let kills = remove_dead(enemies);
    let contacts = player_contacts(player, enemies, balance);
    CollisionReport {
        hits,
        kills,
        contacts,
    }
}

/// Push overlapping enemy pairs apart by half the overlap each
///
/// A single pass over all pairs. Dense clusters can stay slightly overlapped;
/// the next frame's pass keeps working on them.
pub fn separate_enemies(enemies: &mut [Enemy], balance: &Balance) {
    let r = balance.enemy_radius;
    let min_dist = r * 2.0;

    for i in 0..enemies.len() {
        let (head, tail) = enemies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            let delta = b.pos - a.pos;
            let dist = delta.length();
            // Exactly coincident centers have no normal to push along
            if dist > 0.0 && dist < min_dist {
                let overlap = (min_dist - dist) / 2.0;
                let normal = delta / dist;
                a.pos = clamp_to_field(a.pos - normal * overlap, r, balance.width, balance.height);
                b.pos = clamp_to_field(b.pos + normal * overlap, r, balance.width, balance.height);
            }
        }
    }
}

/// Apply player projectile hits; returns the number of hits
///
/// A projectile is spent on its first hit, so it never damages two enemies.
/// Enemies already at zero hit points do not absorb shots.
pub fn projectile_hits(
    projectiles: &mut Vec<Projectile>,
    enemies: &mut [Enemy],
    balance: &Balance,
) -> u32 {
    let mut hits = 0;

    projectiles.retain(|p| {
        if p.origin != ProjectileOrigin::Player {
            return true;
        }
        let target = enemies
            .iter_mut()
            .find(|e| e.is_alive() && circles_overlap(p.pos, p.radius, e.pos, balance.enemy_radius));
        match target {
            Some(enemy) => {
                enemy.hp -= 1;
                enemy.flash_frames = balance.enemy_flash_frames;
                hits += 1;
                false
            }
            None => true,
        }
    });

    hits
}

/// Drop enemies with no hit points left; returns how many were removed
pub fn remove_dead(enemies: &mut Vec<Enemy>) -> u32 {
    let before = enemies.len();
    enemies.retain(|e| e.is_alive());
    (before - enemies.len()) as u32
}

/// Enemies touching the player cost one hit point each and are consumed
pub fn player_contacts(player: &mut Player, enemies: &mut Vec<Enemy>, balance: &Balance) -> u32 {
    let mut contacts = 0;
    enemies.retain(|e| {
        if circles_overlap(e.pos, balance.enemy_radius, player.pos, player.radius) {
            player.hp = player.hp.saturating_sub(1);
            contacts += 1;
            false
        } else {
            true
        }
    });
    contacts
}
