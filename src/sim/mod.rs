//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod color;
pub mod effects;
pub mod level;
pub mod state;
pub mod sweep;
pub mod tick;

pub use camera::Camera;
pub use collision::{Aabb, lands_on};
pub use color::ColorCycle;
pub use effects::{EffectPool, Effects, Family, SpawnContext};
pub use state::{Cheats, GameEvent, GamePhase, GameState, Gem, Platform, Player, Spike, Viewport};
pub use sweep::{SweepStats, sweep};
pub use tick::{DeathCause, jump, reset_world, start_run, tick, try_die};
