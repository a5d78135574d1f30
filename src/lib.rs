//! Neon Runner - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (physics, level generation, effects, sweep)
//! - `scheduler`: Fixed-timestep accumulator driving the simulation
//! - `game`: Session glue (input queue, settings, best score, HUD events)
//! - `renderer`: CPU tessellation + WebGPU pipeline
//! - `platform`: Browser/native input abstraction
//! - `persistence`: Key-value store collaborators
//! - `settings`: Quality presets and per-effect multipliers
//! - `console`: Developer command parser

pub mod console;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{Knob, Quality, QualityPreset, Settings};

/// Game configuration constants
///
/// Velocities and accelerations are expressed per tick, positions in world
/// units (one block is 50 units).
pub mod consts {
    /// Logical simulation rate
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Largest frame delta the scheduler will accept (absorbs tab-suspend gaps)
    pub const MAX_FRAME_DELTA: f32 = 0.1;
    /// Maximum catch-up ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Side of the square block unit platforms are built from
    pub const BLOCK_SIZE: f32 = 50.0;
    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.7;
    /// Vertical velocity applied by a jump (negative is up)
    pub const JUMP_SPEED: f32 = -15.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_START_SPEED: f32 = 11.0;
    /// Horizontal speed gained every tick (unbounded difficulty ramp)
    pub const PLAYER_ACCELERATION: f32 = 0.002;
    pub const MAX_JUMPS: u8 = 2;
    /// Hazard hitbox shrink factor, applied around the sprite center
    pub const HITBOX_SCALE: f32 = 0.6;

    /// Distance below the viewport bottom that counts as falling out of the world
    pub const FALL_DEATH_MARGIN: f32 = 300.0;
    /// Incoming fall speed that makes a landing a "drop"
    pub const HARD_LANDING_SPEED: f32 = 18.0;

    /// Trailing distance behind the camera past which world objects are swept
    pub const DELETE_OFFSET: f32 = BLOCK_SIZE * 6.0;
    /// Leading platforms the sweep never removes (index 0 is the spawn ground)
    pub const PROTECTED_PREFIX: usize = 25;
    /// Platform count the world is filled to on reset
    pub const INITIAL_PLATFORMS: usize = 25;

    /// Ticks spent in the dying phase before the run stops (1.2 s)
    pub const DEATH_DELAY_TICKS: u32 = 72;

    /// Score awards
    pub const PLATFORM_CLEAR_SCORE: f64 = 1.0;
    pub const SPIKE_CLEAR_SCORE: f64 = 1.0;
    pub const GEM_SCORE: f64 = 50.0;

    /// Generator probabilities
    pub const SPIKE_CHANCE: f32 = 0.2;
    pub const GEM_CHANCE: f32 = 0.1;
    pub const GEM_SIZE: f32 = 20.0;
    /// Minimum horizontal gap between a gem and a spike of the same batch
    pub const GEM_SPIKE_CLEARANCE: f32 = BLOCK_SIZE * 2.0;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate two RGB triples channel-wise
#[inline]
pub fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}
