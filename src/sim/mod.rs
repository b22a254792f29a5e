//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as explicit clock readings
//! - Seeded RNG only
//! - Stable iteration order (entity vectors, newest last)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod flash;
pub mod state;
pub mod tick;

pub use clock::{Clock, ManualClock};
pub use collision::{Rect, aim_direction, circle_rect_overlap};
pub use flash::{FlashSequence, FlashStep};
pub use state::{
    DeathMotion, GameEvent, GamePhase, GameState, Hazard, Particle, Player, PlayerLife, Projectile,
    ShootControl,
};
pub use tick::tick;
