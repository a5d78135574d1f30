//! Game state definitions

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::Aabb;
use super::color::ColorCycle;
use super::effects::Effects;
use crate::consts::*;
use crate::settings::Quality;

/// Current game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// World built, waiting for a run to start
    Menu,
    /// Simulation active
    Running,
    /// Player destroyed; effects keep playing for `ticks_left` more ticks
    Dying { ticks_left: u32 },
    /// Run stopped, menu surfaced
    GameOver,
}

impl GamePhase {
    /// True while the run has not been stopped (running or dying)
    pub fn is_running(self) -> bool {
        matches!(self, GamePhase::Running | GamePhase::Dying { .. })
    }
}

/// Events emitted by the simulation for the HUD collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A fresh run began (hide menu)
    RunStarted,
    /// Score display should update
    ScoreChanged(f64),
    /// The run beat the stored best; value is the new best
    NewBestScore(u64),
    /// The player was destroyed
    Died,
    /// The death delay elapsed (show menu)
    GameOver { score: f64, best: u64 },
}

/// Drawable area in pixels; world units map 1:1 to pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// The player-controlled block
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Vertical velocity per tick (positive is down)
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal speed per tick; grows every tick
    pub speed: f32,
    pub jumps_left: u8,
    pub grounded: bool,
    /// False once dead
    pub visible: bool,
    pub hitbox_scale: f32,
    /// Scales horizontal motion (console `gamerule speed`)
    pub horiz_multiplier: f32,
    /// Scales vertical motion and gravity
    pub vert_multiplier: f32,
    pub color: [f32; 3],
}

impl Player {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, viewport.height / 2.0 - PLAYER_SIZE),
            vy: 0.0,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_START_SPEED,
            jumps_left: MAX_JUMPS,
            grounded: false,
            visible: true,
            hitbox_scale: HITBOX_SCALE,
            horiz_multiplier: 1.0,
            vert_multiplier: 1.0,
            color: [0.0, 1.0, 1.0],
        }
    }

    /// Full sprite rectangle
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }

    /// Shrunk rectangle used for hazard checks, centered on the sprite
    pub fn hitbox(&self) -> Aabb {
        self.bounds().scaled(self.hitbox_scale)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) * 0.5
    }

    /// Bottom-center point (where jump and landing effects anchor)
    pub fn feet(&self) -> Vec2 {
        self.pos + Vec2::new(self.width * 0.5, self.height)
    }
}

/// One block of a platform run
#[derive(Debug, Clone)]
pub struct Platform {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Cycle color captured at generation time
    pub color: [f32; 3],
    /// Set once when the player's leading edge clears the trailing edge
    pub passed: bool,
    pub pulse_phase: f32,
}

impl Platform {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }
}

/// Triangular hazard sitting on top of a platform block
#[derive(Debug, Clone)]
pub struct Spike {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Cleared after this spike kills the player
    pub hit: bool,
    pub passed: bool,
}

impl Spike {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }
}

/// Floating collectible
#[derive(Debug, Clone)]
pub struct Gem {
    pub pos: Vec2,
    pub size: f32,
    /// Terminal once set
    pub collected: bool,
    /// Idle bob phase (visual only)
    pub float_phase: f32,
}

impl Gem {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.size))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size * 0.5)
    }
}

/// Flags the developer console toggles; read every tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cheats {
    /// Halve downward velocity each tick
    pub float: bool,
    pub invincible: bool,
    pub infinite_jump: bool,
    /// Place a gem above every generated block
    pub gem_every_block: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    /// Ticks simulated since the last reset
    pub tick_count: u64,
    /// Seconds of simulated time since reset (drives idle animations)
    pub time: f32,
    pub viewport: Viewport,

    // === World ===
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub spikes: Vec<Spike>,
    pub gems: Vec<Gem>,
    /// Number of generator invocations since reset
    pub generated_runs: u32,

    // === Score ===
    pub score: f64,
    pub best_score: u64,

    // === Presentation state shared with effects ===
    pub camera: Camera,
    pub colors: ColorCycle,
    pub effects: Effects,

    pub cheats: Cheats,
    pub quality: Quality,

    /// Events for the HUD, drained by the session each frame
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
}

impl GameState {
    /// Create a state with a freshly built world, sitting in the menu
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let mut state = Self {
            phase: GamePhase::Menu,
            tick_count: 0,
            time: 0.0,
            viewport,
            player: Player::new(viewport),
            platforms: Vec::new(),
            spikes: Vec::new(),
            gems: Vec::new(),
            generated_runs: 0,
            score: 0.0,
            best_score: 0,
            camera: Camera::default(),
            colors: ColorCycle::new(),
            effects: Effects::new(),
            cheats: Cheats::default(),
            quality: Quality::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        super::tick::reset_world(&mut state);
        state
    }

    /// Award points; the only path that changes score during a run
    pub fn add_score(&mut self, points: f64) {
        if points <= 0.0 {
            return;
        }
        self.score += points;
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    /// Take pending HUD events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
