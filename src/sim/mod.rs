//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `advance_frame` per display refresh, no wall-clock timers
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod behavior;
pub mod collision;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod upgrade;
pub mod weapon;

pub use behavior::{Behavior, BehaviorTag, FlankSide};
pub use collision::CollisionReport;
pub use session::Session;
pub use snapshot::{EnemySnapshot, FrameResult, PlayerSnapshot, ProjectileSnapshot};
pub use state::{Enemy, GameEvent, GamePhase, Player, Projectile, ProjectileOrigin};
pub use tick::FrameInput;
pub use upgrade::{DerivedStats, Upgrade};
pub use weapon::WeaponKind;
