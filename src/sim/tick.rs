//! Fixed-step frame update
//!
//! One `advance_frame` call per display refresh. Order within an active frame:
//! input, weapon, projectiles, enemy behaviors, collisions, lifecycle, score.

use glam::Vec2;

use super::behavior;
use super::collision;
use super::session::Session;
use super::snapshot::FrameResult;
use super::state::{GameEvent, GamePhase, Projectile, ProjectileOrigin};
use super::weapon;

/// Input for a single frame (already debounced and normalized by the host)
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Movement intent: unit length or zero
    pub movement: Vec2,
}

impl FrameInput {
    pub fn moving(dx: f32, dy: f32) -> Self {
        Self {
            movement: Vec2::new(dx, dy),
        }
    }
}

impl Session {
    /// Advance the session by one frame and report what the host should draw
    pub fn advance_frame(&mut self, input: &FrameInput) -> FrameResult {
        let event = match self.phase {
            GamePhase::Active => self.step_active(input),
            GamePhase::WaveClearing { frames_left } => self.step_clearing(frames_left),
            GamePhase::Idle | GamePhase::AwaitingNextWave | GamePhase::GameOver => None,
        };
        self.frame_result(event)
    }

    /// Count down the wave-clear pause; nothing moves meanwhile
    fn step_clearing(&mut self, frames_left: u32) -> Option<GameEvent> {
        if frames_left <= 1 {
            self.phase = GamePhase::AwaitingNextWave;
            log::info!("Wave {} complete, score {}", self.wave.wave, self.score);
            Some(GameEvent::WaveCleared { score: self.score })
        } else {
            self.phase = GamePhase::WaveClearing {
                frames_left: frames_left - 1,
            };
            None
        }
    }

    fn step_active(&mut self, input: &FrameInput) -> Option<GameEvent> {
        let frame = self.wave.frame;

        // Player movement
        self.player
            .apply_movement(input.movement, self.stats.player_speed, &self.balance);

        // Weapon
        if weapon::ready(frame, self.wave.last_fire_frame, self.stats.cadence) {
            self.fire();
            self.wave.last_fire_frame = frame;
        }

        // Projectiles
        for p in &mut self.projectiles {
            p.step();
        }
        let balance = &self.balance;
        self.projectiles.retain(|p| p.in_bounds(balance));

        // Enemies
        let player_pos = self.player.pos;
        for enemy in &mut self.enemies {
            enemy.flash_frames = enemy.flash_frames.saturating_sub(1);
            behavior::advance(enemy, player_pos, frame, &self.balance);
        }

        let report = collision::resolve(
            &mut self.player,
            &mut self.enemies,
            &mut self.projectiles,
            &self.balance,
        );
        if report.contacts > 0 {
            log::debug!(
                "Player hit {} time(s), hp {}",
                report.contacts,
                self.player.hp
            );
        }

        // Lifecycle
        if self.player.hp == 0 {
            self.phase = GamePhase::GameOver;
            log::info!(
                "Game over on wave {} with score {}",
                self.wave.wave,
                self.score
            );
            return Some(GameEvent::GameOver { score: self.score });
        }

        if self.enemies.is_empty() && !self.wave.cleared {
            self.wave.cleared = true;
            let bonus = self.balance.wave_clear_bonus * self.wave.wave as u64;
            self.score += bonus;
            log::info!(
                "Wave {} cleared (+{} bonus), score {}",
                self.wave.wave,
                bonus,
                self.score
            );
            let delay = self.balance.wave_clear_delay_frames;
            if delay == 0 {
                self.phase = GamePhase::AwaitingNextWave;
                return Some(GameEvent::WaveCleared { score: self.score });
            }
            self.phase = GamePhase::WaveClearing { frames_left: delay };
            return None;
        }

        self.score += self.balance.score_per_frame;
        self.wave.frame += 1;
        None
    }

    fn fire(&mut self) {
        let tuning = self.balance.weapon(self.weapon).clone();
        let velocities = weapon::volley(
            self.weapon,
            &tuning,
            self.player.pos,
            self.player.last_move_dir,
            &self.enemies,
        );
        for vel in velocities {
            let id = self.next_entity_id();
            self.projectiles.push(Projectile {
                id,
                pos: self.player.pos,
                vel,
                radius: tuning.bullet_radius,
                origin: ProjectileOrigin::Player,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::behavior::Behavior;
    use crate::sim::upgrade::Upgrade;
    use crate::sim::weapon::{DEFAULT_HEADING, WeaponKind};
    use crate::tuning::Balance;
    use proptest::prelude::*;
    use std::f32::consts::TAU;

    fn session(weapon: WeaponKind, seed: u64) -> Session {
        let mut s = Session::new(Balance::default(), seed);
        s.start_run(weapon);
        s
    }

    /// Line enemies up as slow straight chasers far from the player
    fn line_up_enemies(s: &mut Session) {
        for (i, e) in s.enemies.iter_mut().enumerate() {
            e.pos = Vec2::new(100.0 + i as f32 * 100.0, 150.0);
            e.behavior = Behavior::Straight;
            e.speed = 1.0;
        }
    }

    /// Drop one motionless projectile onto every enemy
    fn shoot_every_enemy(s: &mut Session) {
        let targets: Vec<Vec2> = s.enemies.iter().map(|e| e.pos).collect();
        for (i, pos) in targets.into_iter().enumerate() {
            s.projectiles.push(Projectile {
                id: 10_000 + i as u32,
                pos,
                vel: Vec2::ZERO,
                radius: 7.0,
                origin: ProjectileOrigin::Player,
            });
        }
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    #[test]
    fn test_trickle_score() {
        let mut s = session(WeaponKind::Directional, 1);
        line_up_enemies(&mut s);
        for _ in 0..5 {
            s.advance_frame(&idle());
        }
        assert_eq!(s.score(), 5);
        assert_eq!(s.wave.frame, 5);
    }

    #[test]
    fn test_wave_one_clear_scenario() {
        let mut s = session(WeaponKind::Directional, 21);
        assert_eq!(s.enemies.len(), 6);
        assert!(s.enemies.iter().all(|e| e.hp == 1));
        line_up_enemies(&mut s);

        for _ in 0..5 {
            let r = s.advance_frame(&idle());
            assert!(r.event.is_none());
        }
        let before = s.score();
        assert_eq!(before, 5);

        shoot_every_enemy(&mut s);
        let r = s.advance_frame(&idle());
        assert_eq!(r.live_enemy_count, 0);
        assert_eq!(r.score, before + 100);
        assert!(matches!(r.phase, GamePhase::WaveClearing { .. }));
        assert!(r.event.is_none());

        // Event arrives after the fixed delay, bonus is not paid again
        let delay = s.balance.wave_clear_delay_frames;
        let mut events = Vec::new();
        for _ in 0..delay {
            let r = s.advance_frame(&idle());
            assert_eq!(r.score, before + 100);
            if let Some(e) = r.event {
                events.push(e);
            }
        }
        assert_eq!(events, vec![GameEvent::WaveCleared { score: before + 100 }]);
        assert_eq!(s.phase(), GamePhase::AwaitingNextWave);

        // Nothing more happens until the host starts the next wave
        for _ in 0..10 {
            let r = s.advance_frame(&idle());
            assert!(r.event.is_none());
            assert_eq!(r.score, before + 100);
        }
    }

    #[test]
    fn test_no_entity_updates_while_clearing() {
        let mut s = session(WeaponKind::Directional, 4);
        line_up_enemies(&mut s);
        s.advance_frame(&idle());
        shoot_every_enemy(&mut s);
        // A stray projectile that would otherwise keep flying
        s.projectiles.push(Projectile {
            id: 99_999,
            pos: Vec2::new(600.0, 500.0),
            vel: Vec2::new(0.0, -3.0),
            radius: 3.0,
            origin: ProjectileOrigin::Player,
        });
        s.advance_frame(&idle());
        assert!(matches!(s.phase(), GamePhase::WaveClearing { .. }));

        let player_pos = s.player.pos;
        let stray = s.projectiles.iter().find(|p| p.id == 99_999).unwrap().pos;
        s.advance_frame(&FrameInput::moving(1.0, 0.0));
        assert_eq!(s.player.pos, player_pos);
        assert_eq!(s.projectiles.iter().find(|p| p.id == 99_999).unwrap().pos, stray);
    }

    #[test]
    fn test_directional_first_shot_points_up() {
        let mut s = session(WeaponKind::Directional, 2);
        line_up_enemies(&mut s);
        let cadence = s.stats().cadence as u64;
        // Frames 0..=cadence stay quiet; the first shot needs a gap greater than cadence
        for _ in 0..=cadence {
            s.advance_frame(&idle());
            assert!(s.projectiles.is_empty());
        }
        s.advance_frame(&idle());
        assert_eq!(s.projectiles.len(), 1);
        assert_eq!(s.projectiles[0].vel, Vec2::new(0.0, -s.balance.directional.bullet_speed));
    }

    #[test]
    fn test_directional_fires_along_movement() {
        let mut s = session(WeaponKind::Directional, 2);
        line_up_enemies(&mut s);
        let left = FrameInput::moving(-1.0, 0.0);
        while s.projectiles.is_empty() {
            s.advance_frame(&left);
        }
        assert_eq!(s.projectiles[0].vel, Vec2::new(-8.0, 0.0));
    }

    #[test]
    fn test_radial_volley() {
        let mut s = session(WeaponKind::Radial, 8);
        line_up_enemies(&mut s);
        while s.projectiles.is_empty() {
            s.advance_frame(&idle());
        }
        assert_eq!(s.projectiles.len(), 8);
        for (i, p) in s.projectiles.iter().enumerate() {
            let expected = TAU * i as f32 / 8.0;
            let got = p.vel.y.atan2(p.vel.x).rem_euclid(TAU);
            let diff = (got - expected).abs();
            assert!(diff < 1e-4 || (TAU - diff) < 1e-4);
            assert!((p.vel.length() - s.balance.radial.bullet_speed).abs() < 1e-4);
        }
    }

    #[test]
    fn test_auto_aim_with_no_enemies() {
        let mut s = session(WeaponKind::AutoAim, 8);
        s.enemies.clear();
        s.wave.frame = s.stats().cadence as u64 + 1;
        let r = s.advance_frame(&idle());

        assert_eq!(s.projectiles.len(), 1);
        assert_eq!(
            s.projectiles[0].vel,
            DEFAULT_HEADING * s.balance.auto_aim.bullet_speed
        );
        // Empty field also clears the wave on the same frame
        assert!(matches!(r.phase, GamePhase::WaveClearing { .. }));
    }

    #[test]
    fn test_hit_flash_counts_down() {
        let mut s = session(WeaponKind::Directional, 6);
        line_up_enemies(&mut s);
        s.enemies[0].hp = 3;
        let pos = s.enemies[0].pos;
        s.projectiles.push(Projectile {
            id: 50_000,
            pos,
            vel: Vec2::ZERO,
            radius: 7.0,
            origin: ProjectileOrigin::Player,
        });
        let r = s.advance_frame(&idle());
        assert_eq!(s.enemies[0].hp, 2);
        assert!(r.enemies[0].flashing);

        for _ in 0..s.balance.enemy_flash_frames {
            s.advance_frame(&idle());
        }
        assert_eq!(s.enemies[0].flash_frames, 0);
        assert!(!s.snapshot().enemies[0].flashing);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut s = session(WeaponKind::Directional, 13);
        line_up_enemies(&mut s);
        s.player.hp = 1;
        s.enemies[0].pos = s.player.pos;

        let r = s.advance_frame(&idle());
        let score = r.score;
        assert_eq!(r.event, Some(GameEvent::GameOver { score }));
        assert_eq!(r.player_hp, 0);
        assert_eq!(s.phase(), GamePhase::GameOver);

        for _ in 0..20 {
            let r = s.advance_frame(&FrameInput::moving(0.0, -1.0));
            assert!(r.event.is_none());
            assert_eq!(r.score, score);
            assert_eq!(r.player_hp, 0);
        }

        assert!(s.start_wave(2, &[]).is_err());
        assert_eq!(s.choose_upgrade("Double Score"), None);
        assert_eq!(s.score(), score);
    }

    #[test]
    fn test_game_over_checked_before_clear() {
        // Last enemy rams the player on the last hit point: defeat wins
        let mut s = session(WeaponKind::Directional, 13);
        s.enemies.truncate(1);
        s.player.hp = 1;
        s.enemies[0].pos = s.player.pos;
        let r = s.advance_frame(&idle());
        assert!(matches!(r.event, Some(GameEvent::GameOver { .. })));
        assert!(!s.wave.cleared);
    }

    #[test]
    fn test_full_cycle_into_next_wave() {
        let mut s = session(WeaponKind::Directional, 17);
        line_up_enemies(&mut s);
        shoot_every_enemy(&mut s);
        s.advance_frame(&idle());
        while s.phase() != GamePhase::AwaitingNextWave {
            s.advance_frame(&idle());
        }
        let offer = s.offer_upgrades(2);
        assert_eq!(offer.len(), 2);
        s.choose_upgrade(offer[0].as_str());
        s.start_next_wave().unwrap();

        assert_eq!(s.wave(), 2);
        assert_eq!(s.phase(), GamePhase::Active);
        assert_eq!(s.enemies.len(), 8);
        assert!(s.projectiles.is_empty());
        assert_eq!(s.wave.frame, 0);
        assert!(!s.wave.cleared);
        assert_eq!(s.history(), &offer[..1]);
    }

    #[test]
    fn test_extra_life_idempotent_across_waves() {
        let mut s = session(WeaponKind::Directional, 17);
        s.choose_upgrade("Extra Life");
        let hp = s.player.hp;
        for _ in 0..3 {
            s.start_next_wave().unwrap();
            assert_eq!(s.player.hp, hp);
        }
        assert_eq!(s.history(), &[Upgrade::ExtraLife]);
    }

    #[test]
    fn test_still_player_in_bounds_with_edge_spawn() {
        let balance = Balance::from_json(r#"{ "player_spawn_inset": 0.0 }"#).unwrap();
        let mut s = Session::new(balance.clone(), 4);
        s.start_run(WeaponKind::Directional);
        let frame = s.advance_frame(&FrameInput::default());
        assert!(frame.player.pos.y <= balance.height - balance.player_radius);
        assert!(frame.player.pos.y >= balance.player_radius);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed produce identical frames
        let mut a = session(WeaponKind::AutoAim, 99_999);
        let mut b = session(WeaponKind::AutoAim, 99_999);
        let inputs = [
            FrameInput::moving(1.0, 0.0),
            FrameInput::moving(0.0, -1.0),
            FrameInput::default(),
            FrameInput::moving(-0.6, 0.8),
        ];
        for i in 0..400 {
            let input = &inputs[i % inputs.len()];
            assert_eq!(a.advance_frame(input), b.advance_frame(input));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn entities_stay_in_bounds(
            seed in any::<u64>(),
            moves in prop::collection::vec((-1i8..=1, -1i8..=1), 1..300),
        ) {
            let mut s = session(WeaponKind::Radial, seed);
            let b = s.balance.clone();
            for (dx, dy) in moves {
                let input = FrameInput {
                    movement: Vec2::new(dx as f32, dy as f32).normalize_or_zero(),
                };
                let r = s.advance_frame(&input);
                let pr = r.player.radius;
                prop_assert!(r.player.pos.x >= pr && r.player.pos.x <= b.width - pr);
                prop_assert!(r.player.pos.y >= pr && r.player.pos.y <= b.height - pr);
                for e in &r.enemies {
                    prop_assert!(e.pos.x >= e.radius && e.pos.x <= b.width - e.radius);
                    prop_assert!(e.pos.y >= e.radius && e.pos.y <= b.height - e.radius);
                    prop_assert!(e.hp > 0);
                }
            }
        }

        #[test]
        fn score_never_decreases(seed in any::<u64>()) {
            let mut s = session(WeaponKind::AutoAim, seed);
            let mut last = 0;
            for _ in 0..600 {
                let r = s.advance_frame(&FrameInput::default());
                prop_assert!(r.score >= last);
                last = r.score;
            }
        }
    }
}
