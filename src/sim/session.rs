//! Wave/session controller state
//!
//! The session owns every entity. Hosts drive it through `start_run`,
//! `start_wave`, `choose_upgrade` and `advance_frame` (see [`super::tick`])
//! and only ever see snapshots back.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::behavior::{Behavior, BehaviorTag};
use super::snapshot::{EnemySnapshot, FrameResult, PlayerSnapshot, ProjectileSnapshot};
use super::state::{Enemy, GameEvent, GamePhase, Player, Projectile, WaveState};
use super::upgrade::{self, DerivedStats, Upgrade, UpgradeEffect};
use super::weapon::WeaponKind;
use crate::clamp_to_field;
use crate::error::{SimError, SimResult};
use crate::tuning::{Balance, WaveSpec};

/// One run of the game: a player, a weapon, and successive waves
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) balance: Balance,
    pub(super) seed: u64,
    pub(super) rng: Pcg32,
    pub(super) weapon: WeaponKind,
    pub(super) phase: GamePhase,
    pub(super) wave: WaveState,
    pub(super) score: u64,
    pub(super) player: Player,
    pub(super) enemies: Vec<Enemy>,
    pub(super) projectiles: Vec<Projectile>,
    /// Every upgrade chosen so far, in order
    pub(super) history: Vec<Upgrade>,
    /// Stats re-derived from `history` at wave start
    pub(super) stats: DerivedStats,
    next_id: u32,
}

impl Session {
    /// Create an idle session; call [`Session::start_run`] to begin
    pub fn new(balance: Balance, seed: u64) -> Self {
        let weapon = WeaponKind::Directional;
        Self {
            player: Player::new(&balance),
            stats: DerivedStats::base(&balance, weapon),
            balance,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            weapon,
            phase: GamePhase::Idle,
            wave: WaveState::new(0),
            score: 0,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            history: Vec::new(),
            next_id: 1,
        }
    }

    /// Begin a fresh run with `weapon`: wave 1, no upgrades, full reset
    pub fn start_run(&mut self, weapon: WeaponKind) {
        log::info!("Starting run with {} weapon (seed {})", weapon.as_str(), self.seed);
        self.weapon = weapon;
        self.history.clear();
        self.phase = GamePhase::Idle;
        self.begin_wave(1, &[]);
    }

    /// Spawn wave `wave`, replaying `upgrades` to recompute derived stats
    ///
    /// Wave 1 with an empty upgrade list is a fresh run: the player and score
    /// are reset. Any other wave only moves the player back to the spawn
    /// point; hit points carry over.
    ///
    /// When `upgrades` extends the recorded history, one-shot effects of the
    /// new entries apply here, once. Entries already recorded (for example
    /// through [`Session::choose_upgrade`]) are never applied again.
    pub fn start_wave(&mut self, wave: u32, upgrades: &[Upgrade]) -> SimResult<()> {
        if wave == 0 {
            log::warn!("Rejected request for wave 0");
            return Err(SimError::InvalidWave { wave });
        }
        if self.phase == GamePhase::GameOver {
            log::warn!("Rejected wave {} on a finished session", wave);
            return Err(SimError::SessionOver { score: self.score });
        }
        self.begin_wave(wave, upgrades);
        Ok(())
    }

    fn begin_wave(&mut self, wave: u32, upgrades: &[Upgrade]) {
        let fresh_run = wave == 1 && upgrades.is_empty();
        if fresh_run {
            self.player = Player::new(&self.balance);
            self.score = 0;
            self.history.clear();
        } else {
            self.player.pos = self.balance.player_spawn();
        }

        match upgrades.strip_prefix(self.history.as_slice()) {
            Some(new) => {
                for choice in new {
                    if let UpgradeEffect::OneShot(effect) = choice.effect() {
                        upgrade::apply_one_shot(
                            effect,
                            &mut self.player,
                            &mut self.score,
                            &self.balance,
                        );
                        log::debug!("Applied {} at wave {} start", choice.as_str(), wave);
                    }
                }
            }
            None => log::warn!(
                "Upgrade list for wave {} does not extend the recorded history; one-shot effects skipped",
                wave
            ),
        }

        self.history = upgrades.to_vec();
        self.stats = DerivedStats::from_history(&self.balance, self.weapon, &self.history);
        log::debug!(
            "Wave {} stats: cadence={} speed={} upgrades={}",
            wave,
            self.stats.cadence,
            self.stats.player_speed,
            self.history.len()
        );

        self.wave = WaveState::new(wave);
        self.projectiles.clear();
        self.spawn_enemies(wave);
        self.phase = GamePhase::Active;

        log::info!(
            "Wave {} spawned: {} enemies, player hp {}, score {}",
            wave,
            self.enemies.len(),
            self.player.hp,
            self.score
        );
    }

    /// Start the wave after the current one with the accumulated history
    pub fn start_next_wave(&mut self) -> SimResult<()> {
        let history = self.history.clone();
        self.start_wave(self.wave.wave + 1, &history)
    }

    /// Record the upgrade picked from the menu
    ///
    /// One-shot effects (extra life, double score) apply right here and never
    /// again; recomputed effects take hold at the next `start_wave`. Unknown
    /// names are ignored.
    pub fn choose_upgrade(&mut self, name: &str) -> Option<Upgrade> {
        if self.phase == GamePhase::GameOver {
            log::warn!("Ignoring upgrade '{}' on a finished session", name);
            return None;
        }
        let Some(choice) = Upgrade::parse(name) else {
            log::warn!("Ignoring unknown upgrade '{}'", name);
            return None;
        };

        if let UpgradeEffect::OneShot(effect) = choice.effect() {
            upgrade::apply_one_shot(effect, &mut self.player, &mut self.score, &self.balance);
        }
        self.history.push(choice);
        log::debug!(
            "Chose {} (hp {}, score {})",
            choice.as_str(),
            self.player.hp,
            self.score
        );
        Some(choice)
    }

    /// Distinct upgrades for the selection menu
    pub fn offer_upgrades(&mut self, count: usize) -> Vec<Upgrade> {
        upgrade::offer(&mut self.rng, count)
    }

    fn spawn_enemies(&mut self, wave: u32) {
        let spec = WaveSpec::for_wave(&self.balance, wave);
        let (margin_x, top, band) = (
            self.balance.spawn_margin_x,
            self.balance.spawn_top,
            self.balance.spawn_band_height,
        );
        let x_span = (self.balance.width - 2.0 * margin_x).max(0.0);
        let jitter = self.balance.enemy_speed_jitter;

        self.enemies.clear();
        for _ in 0..spec.enemy_count {
            let tag = BehaviorTag::pick(&mut self.rng);
            let pos = Vec2::new(
                margin_x + self.rng.random::<f32>() * x_span,
                top + self.rng.random::<f32>() * band,
            );
            let pos = clamp_to_field(
                pos,
                self.balance.enemy_radius,
                self.balance.width,
                self.balance.height,
            );
            let speed = spec.enemy_speed + self.rng.random::<f32>() * jitter;
            let behavior = Behavior::spawn(tag, &mut self.rng);
            let id = self.next_entity_id();
            self.enemies.push(Enemy {
                id,
                pos,
                hp: spec.enemy_hp,
                speed,
                flash_frames: 0,
                spawn_frame: self.wave.frame,
                behavior,
            });
        }
    }

    /// Allocate a new entity ID
    pub(super) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Read-only view of the current state
    pub fn snapshot(&self) -> FrameResult {
        self.frame_result(None)
    }

    pub(super) fn frame_result(&self, event: Option<GameEvent>) -> FrameResult {
        let radius = self.balance.enemy_radius;
        FrameResult {
            phase: self.phase,
            wave: self.wave.wave,
            score: self.score,
            player_hp: self.player.hp,
            live_enemy_count: self.enemies.len(),
            player: PlayerSnapshot::from(&self.player),
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemySnapshot::new(e, radius))
                .collect(),
            projectiles: self.projectiles.iter().map(ProjectileSnapshot::from).collect(),
            event,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn wave(&self) -> u32 {
        self.wave.wave
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn weapon(&self) -> WeaponKind {
        self.weapon
    }

    pub fn history(&self) -> &[Upgrade] {
        &self.history
    }

    pub fn stats(&self) -> DerivedStats {
        self.stats
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }
}
