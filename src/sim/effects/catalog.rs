//! Effect family descriptors
//!
//! Every visual effect is a row in this table. The pool engine reads the
//! row to decide how many particles to emit, where, how they move, how they
//! fade, when they die and which primitive the renderer paints.

use glam::Vec2;
use rand::Rng;

use crate::consts::{BLOCK_SIZE, DELETE_OFFSET, GRAVITY};
use crate::settings::Knob;

/// Uniform range; `min == max` is a constant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const ZERO: Span = Span::fixed(0.0);

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Symmetric range around zero
    pub const fn around(half: f32) -> Self {
        Self::new(-half, half)
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn is_zero(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }
}

/// Coordinate space particles live in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    /// World units; the camera offset applies at draw time
    World,
    /// Screen pixels; drawn without camera translation
    Screen,
}

/// Draw pass a family belongs to, in back-to-front order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    ScreenDust,
    Atmosphere,
    Backdrop,
    Motion,
    Ghosts,
    Waves,
    Particles,
}

/// How many particles one spawn emits; `scale` is intensity times multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Count {
    Fixed(u32),
    /// `floor(base × scale)`, never fewer than `min`
    Scaled { base: f32, min: u32 },
    /// `fixed + floor(scale)`
    Offset { fixed: u32 },
    /// Square lattice whose side is `fixed + floor(scale)`
    Lattice { fixed: u32 },
}

/// Vertical band for spawns ahead of the player, relative to the camera top
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    /// Anywhere in the top `fraction` of the screen
    Screen(f32),
    /// Fixed distance above the top edge
    Above(f32),
}

/// Where a new particle starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// The anchor plus uniform jitter in ±jitter/2
    Anchor { jitter: Vec2 },
    /// Inside the player's rectangle (anchor is its top-left)
    Body,
    /// Cells of a square lattice centered on the anchor
    Lattice { spacing: f32 },
    /// Right of the player; `past_screen` starts at the far screen edge
    /// instead of the player's leading edge
    Ahead { dx: Span, past_screen: bool, band: Band },
    /// Offset from the player's top-left
    AroundPlayer { dx: Span, dy: Span },
    /// Below the bottom screen edge, horizontally near the player
    BelowScreen { dx: Span, dy: Span },
    /// Anywhere on screen
    Screen,
}

/// Initial velocity rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Velocity {
    Still,
    Box { x: Span, y: Span },
    /// Random heading at the given speed
    Radial { speed: Span },
    /// Horizontal component scaled by the player's current speed
    PlayerScaled { x: Span, y: Span },
    /// No motion; heading follows the player's motion with some jitter
    AlongMotion { jitter: f32 },
}

/// Per-tick integration rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// `vel += accel + gravity; pos += vel`
    Linear { gravity: f32 },
    /// `pos += vel; vel *= factor`
    Damped { factor: f32 },
    /// Radius grows toward its maximum; life is the remaining fraction
    RingExpand,
    /// Travels outward from the anchor along its heading
    Orbit,
}

/// Alpha rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fade {
    Constant,
    /// Proportional to remaining life
    Lifetime,
    /// `life / n`, capped at full
    Over(f32),
    /// Multiplied every tick; dies below 0.01
    Decay(f32),
    /// Remaining ring or orbit fraction
    Reach,
}

/// Color source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Palette {
    Fixed([f32; 3]),
    /// Color supplied by the trigger (white when none)
    Trigger,
    Player,
    Hsl { hue: Span, saturation: f32, lightness: Span },
    /// Independent random channels
    Noise,
    /// Secondary palette only: copy the primary color
    Same,
}

/// Shape painted for each particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Rotated, scaled square; trails draw as a polyline
    Square,
    /// Axis-aligned square
    Dot,
    /// Radial gradient disc
    Glow,
    Ring { width: f32 },
    WavyRing { lobes: f32, amplitude: f32, width: f32 },
    /// Half-filled arcs, one per segment
    DashedRing { width: f32 },
    /// Ring plus an inner ring, breathing with the phase
    PulseRing,
    /// Concentric breathing rings, one per segment
    Rings,
    /// Spiral arms, one per segment
    Spiral,
    /// Line from the position along the heading
    Streak,
    /// Filled polygon with one corner per segment
    Polygon,
    Ellipse,
    /// Column of pixel glyphs, one per segment
    Glyphs,
    /// Three horizontal gradient bands
    Band,
    /// Breathing core with a thin trail
    Orb,
    /// Shrinking discs along the trail
    TrailDots,
    /// Thick polyline through the trail
    Polyline,
    /// Double horizontal line
    Line,
    /// Filled and outlined rectangle of the particle's extent
    Ghost,
}

/// Width and height rule for rectangular families
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    None,
    Player,
    Box { w: Span, h: Span },
}

/// Removal rules beyond life and alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expiry {
    /// Dies once its right edge is this far behind the player
    pub behind_player: Option<f32>,
    /// Dies once this far below the bottom screen edge
    pub below_screen: Option<f32>,
    /// Distance behind the camera at which the sweep removes it
    pub sweep_margin: f32,
}

impl Expiry {
    pub const DEFAULT: Expiry = Expiry {
        behind_player: None,
        below_screen: None,
        sweep_margin: DELETE_OFFSET,
    };
}

/// One family's full configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FamilySpec {
    pub name: &'static str,
    pub knob: Knob,
    pub space: Space,
    pub layer: Layer,
    pub count: Count,
    /// Spawn gate: a spawn happens when `random < chance × multiplier`
    pub chance: f32,
    pub placement: Placement,
    pub velocity: Velocity,
    /// Per-axis constant acceleration
    pub accel: Span,
    pub motion: Motion,
    /// Sinusoidal drift added every tick, driven by the phase
    pub wobble: Vec2,
    pub phase_speed: f32,
    pub spin: Span,
    pub life: Span,
    /// Lifetime floor that grows with the multiplier
    pub life_per_mul: f32,
    pub size: Span,
    /// Size multiplied by intensity and multiplier
    pub size_scaled: bool,
    pub extent: Extent,
    pub length: Span,
    pub length_per_mul: f32,
    pub max_radius: Span,
    pub radius_scaled: bool,
    pub expand: Span,
    pub expand_per_mul: f32,
    /// Inclusive range for segment-like counts (rings, arms, facets, glyphs)
    pub segments: (u8, u8),
    pub scale_speed: Span,
    pub alpha: Span,
    pub fade: Fade,
    pub trail_len: usize,
    pub palette: Palette,
    pub palette2: Palette,
    pub primitive: Primitive,
    /// Soft halo when glow is enabled
    pub glow: bool,
    pub expiry: Expiry,
    /// Live-count guard; spawns are skipped at the cap
    pub max_live: Option<usize>,
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const CYAN: [f32; 3] = [0.0, 1.0, 1.0];

const BASE: FamilySpec = FamilySpec {
    name: "",
    knob: Knob::JumpEffect,
    space: Space::World,
    layer: Layer::Particles,
    count: Count::Fixed(1),
    chance: 1.0,
    placement: Placement::Anchor { jitter: Vec2::ZERO },
    velocity: Velocity::Still,
    accel: Span::ZERO,
    motion: Motion::Linear { gravity: 0.0 },
    wobble: Vec2::ZERO,
    phase_speed: 0.0,
    spin: Span::ZERO,
    life: Span::fixed(30.0),
    life_per_mul: 0.0,
    size: Span::fixed(4.0),
    size_scaled: false,
    extent: Extent::None,
    length: Span::ZERO,
    length_per_mul: 0.0,
    max_radius: Span::ZERO,
    radius_scaled: false,
    expand: Span::ZERO,
    expand_per_mul: 0.0,
    segments: (0, 0),
    scale_speed: Span::ZERO,
    alpha: Span::fixed(1.0),
    fade: Fade::Lifetime,
    trail_len: 0,
    palette: Palette::Fixed(WHITE),
    palette2: Palette::Same,
    primitive: Primitive::Square,
    glow: false,
    expiry: Expiry::DEFAULT,
    max_live: None,
};

/// Expanding ring template
const RING: FamilySpec = FamilySpec {
    layer: Layer::Waves,
    motion: Motion::RingExpand,
    radius_scaled: true,
    fade: Fade::Reach,
    primitive: Primitive::Ring { width: 2.0 },
    ..BASE
};

/// Ambient stream entering from the right edge
const AHEAD: Placement = Placement::Ahead {
    dx: Span::new(0.0, 100.0),
    past_screen: true,
    band: Band::Screen(1.0),
};

const JUMP_SPARK: FamilySpec = FamilySpec {
    name: "jump sparks",
    count: Count::Scaled { base: 30.0, min: 0 },
    placement: Placement::Anchor { jitter: Vec2::new(5.0, 5.0) },
    velocity: Velocity::Box { x: Span::around(2.5), y: Span::new(-7.5, -2.5) },
    spin: Span::around(0.1),
    life: Span::new(20.0, 50.0),
    size: Span::new(3.0, 7.0),
    fade: Fade::Over(50.0),
    palette: Palette::Trigger,
    ..BASE
};

const DOUBLE_SPARK: FamilySpec = FamilySpec {
    name: "double-jump sparks",
    ..JUMP_SPARK
};

const GEM_SPARK: FamilySpec = FamilySpec {
    name: "gem sparks",
    ..JUMP_SPARK
};

const LAND_DUST: FamilySpec = FamilySpec {
    name: "landing dust",
    knob: Knob::WalkEffect,
    count: Count::Scaled { base: 20.0, min: 0 },
    placement: Placement::Anchor { jitter: Vec2::new(10.0, 10.0) },
    velocity: Velocity::Box { x: Span::around(4.0), y: Span::new(-4.0, 0.0) },
    life: Span::new(15.0, 40.0),
    ..JUMP_SPARK
};

const SPARK_TRAIL: FamilySpec = FamilySpec {
    name: "spark trails",
    knob: Knob::ParticleTrails,
    chance: 0.3,
    count: Count::Scaled { base: 9.0, min: 0 },
    placement: Placement::Anchor { jitter: Vec2::new(20.0, 20.0) },
    velocity: Velocity::Box { x: Span::around(1.0), y: Span::around(1.0) },
    life: Span::fixed(60.0),
    size: Span::fixed(5.0),
    fade: Fade::Over(50.0),
    trail_len: 5,
    palette: Palette::Trigger,
    ..BASE
};

const BLOOM: FamilySpec = FamilySpec {
    name: "bloom",
    knob: Knob::BloomParticles,
    chance: 0.2,
    count: Count::Scaled { base: 3.0, min: 0 },
    size: Span::new(5.0, 20.0),
    alpha: Span::fixed(0.5),
    fade: Fade::Decay(0.95),
    palette: Palette::Trigger,
    primitive: Primitive::Glow,
    glow: true,
    ..BASE
};

const CRASH_DEBRIS: FamilySpec = FamilySpec {
    name: "crash debris",
    knob: Knob::DieEffect,
    count: Count::Scaled { base: 20.0, min: 6 },
    placement: Placement::Body,
    velocity: Velocity::Box { x: Span::around(9.0), y: Span::new(-14.4, -2.4) },
    accel: Span::around(0.025),
    motion: Motion::Linear { gravity: GRAVITY * 0.3 },
    spin: Span::around(0.15),
    life: Span::new(120.0, 180.0),
    size: Span::new(8.0, 8.0 + 50.0 / 3.0),
    scale_speed: Span::new(0.01, 0.03),
    fade: Fade::Over(60.0),
    palette: Palette::Player,
    glow: true,
    expiry: Expiry { below_screen: Some(200.0), ..Expiry::DEFAULT },
    ..BASE
};

const SHOCKWAVE: FamilySpec = FamilySpec {
    name: "shockwave",
    knob: Knob::Shockwaves,
    count: Count::Fixed(2),
    max_radius: Span::fixed(400.0),
    expand: Span::fixed(15.0),
    expand_per_mul: 5.0,
    alpha: Span::fixed(0.6),
    palette: Palette::Fixed([1.0, 0.0, 0.0]),
    primitive: Primitive::Ring { width: 3.0 },
    ..RING
};

const SCREEN_DUST: FamilySpec = FamilySpec {
    name: "screen dust",
    knob: Knob::ScreenDistortion,
    space: Space::Screen,
    layer: Layer::ScreenDust,
    count: Count::Scaled { base: 60.0, min: 0 },
    placement: Placement::Screen,
    velocity: Velocity::Box { x: Span::around(2.0), y: Span::around(2.0) },
    life: Span::new(30.0, 80.0),
    size: Span::new(1.0, 4.0),
    alpha: Span::new(0.1, 0.4),
    fade: Fade::Over(100.0),
    primitive: Primitive::Dot,
    ..BASE
};

const IMPACT_WAVE: FamilySpec = FamilySpec {
    name: "impact wave",
    knob: Knob::ImpactWaves,
    count: Count::Fixed(2),
    max_radius: Span::fixed(100.0),
    expand: Span::fixed(5.0),
    expand_per_mul: 5.0,
    alpha: Span::fixed(0.5),
    ..RING
};

const STARBURST: FamilySpec = FamilySpec {
    name: "starburst",
    knob: Knob::Starbursts,
    layer: Layer::Particles,
    count: Count::Scaled { base: 20.0, min: 0 },
    motion: Motion::Orbit,
    max_radius: Span::new(50.0, 150.0),
    radius_scaled: false,
    expand: Span::new(2.0, 7.0),
    size: Span::new(1.0, 4.0),
    palette: Palette::Hsl { hue: Span::new(300.0, 360.0), saturation: 1.0, lightness: Span::fixed(0.7) },
    primitive: Primitive::Dot,
    ..RING
};

const GRAVITY_WAVE: FamilySpec = FamilySpec {
    name: "gravity wave",
    knob: Knob::GravityWaves,
    count: Count::Fixed(2),
    max_radius: Span::fixed(150.0),
    expand: Span::fixed(2.0),
    alpha: Span::fixed(0.2),
    palette: Palette::Fixed(CYAN),
    primitive: Primitive::WavyRing { lobes: 3.0, amplitude: 10.0, width: 1.0 },
    ..RING
};

const ENERGY_RIPPLE: FamilySpec = FamilySpec {
    name: "energy ripple",
    knob: Knob::EnergyRipples,
    count: Count::Fixed(2),
    max_radius: Span::fixed(80.0),
    expand: Span::fixed(4.0),
    alpha: Span::fixed(0.5),
    segments: (4, 11),
    palette: Palette::Fixed([0.0, 1.0, 0.0]),
    primitive: Primitive::DashedRing { width: 2.0 },
    ..RING
};

const PIXEL_SHATTER: FamilySpec = FamilySpec {
    name: "pixel shatter",
    knob: Knob::PixelDisplacement,
    count: Count::Scaled { base: 40.0, min: 0 },
    placement: Placement::Anchor { jitter: Vec2::new(50.0, 50.0) },
    velocity: Velocity::Box { x: Span::around(5.0), y: Span::around(5.0) },
    motion: Motion::Linear { gravity: 0.1 },
    life: Span::new(20.0, 50.0),
    size: Span::new(1.0, 5.0),
    fade: Fade::Over(50.0),
    palette: Palette::Noise,
    primitive: Primitive::Dot,
    ..BASE
};

const LENS_FLARE: FamilySpec = FamilySpec {
    name: "lens flare",
    knob: Knob::LensFlare,
    count: Count::Fixed(2),
    size: Span::fixed(30.0),
    size_scaled: true,
    life: Span::fixed(30.0),
    alpha: Span::fixed(0.5),
    fade: Fade::Decay(0.95),
    palette: Palette::Fixed([1.0, 1.0, 0.78]),
    primitive: Primitive::Glow,
    ..BASE
};

const ENERGY_SPHERE: FamilySpec = FamilySpec {
    name: "energy sphere",
    knob: Knob::EnergySphere,
    count: Count::Scaled { base: 4.0, min: 0 },
    placement: Placement::Anchor { jitter: Vec2::new(200.0, 200.0) },
    velocity: Velocity::Box { x: Span::around(3.0), y: Span::around(3.0) },
    motion: Motion::Damped { factor: 0.98 },
    phase_speed: 0.2,
    life: Span::new(120.0, 180.0),
    size: Span::new(10.0, 30.0),
    segments: (2, 4),
    fade: Fade::Over(180.0),
    palette: Palette::Hsl { hue: Span::new(180.0, 240.0), saturation: 1.0, lightness: Span::fixed(0.6) },
    primitive: Primitive::Rings,
    ..BASE
};

const SPIRAL_FIELD: FamilySpec = FamilySpec {
    name: "spiral field",
    knob: Knob::SpiralEnergy,
    max_radius: Span::fixed(150.0),
    expand: Span::fixed(3.0),
    spin: Span::around(0.1),
    alpha: Span::fixed(0.6),
    segments: (3, 6),
    palette: Palette::Hsl { hue: Span::new(270.0, 330.0), saturation: 0.8, lightness: Span::fixed(0.6) },
    primitive: Primitive::Spiral,
    ..RING
};

const CRYSTAL_SHARD: FamilySpec = FamilySpec {
    name: "crystal shard",
    knob: Knob::CrystalStructure,
    count: Count::Lattice { fixed: 3 },
    placement: Placement::Lattice { spacing: 30.0 },
    velocity: Velocity::Box { x: Span::around(2.0), y: Span::around(2.0) },
    motion: Motion::Damped { factor: 0.95 },
    spin: Span::around(0.05),
    life: Span::new(100.0, 180.0),
    size: Span::new(8.0, 20.0),
    segments: (4, 7),
    fade: Fade::Over(180.0),
    palette: Palette::Hsl { hue: Span::new(180.0, 240.0), saturation: 0.8, lightness: Span::new(0.6, 1.0) },
    primitive: Primitive::Polygon,
    ..BASE
};

const DARK_TENDRIL: FamilySpec = FamilySpec {
    name: "dark tendril",
    knob: Knob::DarkEnergy,
    count: Count::Offset { fixed: 2 },
    velocity: Velocity::Box { x: Span::around(3.0), y: Span::around(3.0) },
    motion: Motion::Damped { factor: 0.95 },
    wobble: Vec2::new(1.5, 1.5),
    phase_speed: 0.3,
    life: Span::new(120.0, 180.0),
    size: Span::new(2.0, 5.0),
    fade: Fade::Over(180.0),
    trail_len: 12,
    palette: Palette::Hsl { hue: Span::new(270.0, 330.0), saturation: 1.0, lightness: Span::new(0.1, 0.3) },
    primitive: Primitive::Polyline,
    glow: true,
    ..BASE
};

const GRAVITY_SURGE: FamilySpec = FamilySpec {
    name: "gravity surge",
    knob: Knob::GravitySurge,
    max_radius: Span::fixed(120.0),
    expand: Span::fixed(8.0),
    phase_speed: 0.3,
    alpha: Span::fixed(0.4),
    palette: Palette::Fixed([1.0, 0.27, 0.27]),
    primitive: Primitive::PulseRing,
    ..RING
};

const SHADOW_DASH: FamilySpec = FamilySpec {
    name: "shadow dash",
    knob: Knob::ShadowDash,
    count: Count::Scaled { base: 6.0, min: 0 },
    velocity: Velocity::Box { x: Span::around(4.0), y: Span::new(4.0, 10.0) },
    motion: Motion::Damped { factor: 0.95 },
    spin: Span::around(0.1),
    life: Span::new(15.0, 35.0),
    size: Span::new(8.0, 20.0),
    alpha: Span::fixed(0.8),
    fade: Fade::Decay(0.95),
    palette: Palette::Fixed([0.0, 0.0, 0.0]),
    primitive: Primitive::Ellipse,
    ..BASE
};

const HEAT_HAZE: FamilySpec = FamilySpec {
    name: "heat haze",
    knob: Knob::HeatDistortion,
    max_radius: Span::fixed(50.0),
    expand: Span::fixed(3.0),
    alpha: Span::fixed(0.3),
    palette: Palette::Fixed([1.0, 0.67, 0.0]),
    primitive: Primitive::WavyRing { lobes: 5.0, amplitude: 5.0, width: 2.0 },
    ..RING
};

const AFTER_IMAGE: FamilySpec = FamilySpec {
    name: "after image",
    knob: Knob::AfterImages,
    layer: Layer::Ghosts,
    chance: 0.6,
    count: Count::Fixed(2),
    extent: Extent::Player,
    life: Span::fixed(20.0),
    alpha: Span::fixed(0.3),
    fade: Fade::Decay(0.9),
    palette: Palette::Player,
    primitive: Primitive::Ghost,
    ..BASE
};

const VELOCITY_STREAK: FamilySpec = FamilySpec {
    name: "velocity streak",
    knob: Knob::VelocityStreaks,
    layer: Layer::Motion,
    chance: 0.3,
    velocity: Velocity::AlongMotion { jitter: 0.5 },
    length: Span::new(0.0, 100.0),
    length_per_mul: 50.0,
    size: Span::new(1.0, 4.0),
    life: Span::fixed(30.0),
    alpha: Span::new(0.1, 0.4),
    fade: Fade::Decay(0.95),
    palette: Palette::Fixed(CYAN),
    primitive: Primitive::Streak,
    ..BASE
};

const SPEED_LINE: FamilySpec = FamilySpec {
    name: "speed line",
    knob: Knob::SpeedLines,
    layer: Layer::Motion,
    chance: 0.4,
    count: Count::Scaled { base: 6.0, min: 0 },
    velocity: Velocity::Radial { speed: Span::new(5.0, 15.0) },
    length: Span::new(0.0, 80.0),
    length_per_mul: 40.0,
    size: Span::fixed(1.0),
    life: Span::fixed(20.0),
    alpha: Span::fixed(0.4),
    fade: Fade::Decay(0.9),
    primitive: Primitive::Streak,
    ..BASE
};

const WIND_MOTE: FamilySpec = FamilySpec {
    name: "wind mote",
    knob: Knob::WindParticles,
    layer: Layer::Motion,
    chance: 0.5,
    count: Count::Scaled { base: 10.0, min: 0 },
    placement: AHEAD,
    velocity: Velocity::PlayerScaled { x: Span::new(-2.5, -1.0), y: Span::around(2.0) },
    life: Span::new(50.0, 150.0),
    size: Span::new(1.0, 5.0),
    alpha: Span::new(0.1, 0.4),
    fade: Fade::Over(150.0),
    palette: Palette::Fixed([0.78, 0.86, 1.0]),
    primitive: Primitive::Dot,
    expiry: Expiry { behind_player: Some(100.0), ..Expiry::DEFAULT },
    max_live: Some(400),
    ..BASE
};

const COSMIC_DUST: FamilySpec = FamilySpec {
    name: "cosmic dust",
    knob: Knob::CosmicDust,
    layer: Layer::Atmosphere,
    chance: 0.2,
    count: Count::Scaled { base: 3.0, min: 0 },
    placement: Placement::Ahead { dx: Span::new(0.0, 300.0), past_screen: true, band: Band::Screen(1.0) },
    velocity: Velocity::Box { x: Span::new(-3.0, -1.0), y: Span::around(0.25) },
    wobble: Vec2::new(0.0, 0.5),
    phase_speed: 0.01,
    life: Span::new(400.0, 600.0),
    size: Span::new(50.0, 150.0),
    alpha: Span::new(0.3, 0.7),
    fade: Fade::Over(600.0),
    palette: Palette::Hsl { hue: Span::new(240.0, 300.0), saturation: 0.7, lightness: Span::new(0.3, 0.7) },
    palette2: Palette::Hsl { hue: Span::new(180.0, 240.0), saturation: 0.8, lightness: Span::new(0.2, 0.5) },
    primitive: Primitive::Glow,
    expiry: Expiry { behind_player: Some(400.0), ..Expiry::DEFAULT },
    max_live: Some(60),
    ..BASE
};

const FOG_BANK: FamilySpec = FamilySpec {
    name: "fog bank",
    knob: Knob::DynamicFog,
    layer: Layer::Atmosphere,
    chance: 0.1,
    placement: Placement::Ahead { dx: Span::new(0.0, 200.0), past_screen: true, band: Band::Screen(1.0) },
    velocity: Velocity::Box { x: Span::new(-4.0, -1.0), y: Span::ZERO },
    life: Span::fixed(200.0),
    size: Span::new(50.0, 150.0),
    alpha: Span::new(0.05, 0.15),
    palette: Palette::Fixed([0.53, 0.53, 0.67]),
    primitive: Primitive::Glow,
    expiry: Expiry { behind_player: Some(200.0), ..Expiry::DEFAULT },
    max_live: Some(40),
    ..BASE
};

const LIGHT_STREAM: FamilySpec = FamilySpec {
    name: "light stream",
    knob: Knob::ColorLight,
    layer: Layer::Atmosphere,
    chance: 0.15,
    placement: Placement::Ahead { dx: Span::ZERO, past_screen: true, band: Band::Screen(0.6) },
    velocity: Velocity::Box { x: Span::new(-5.0, -3.0), y: Span::ZERO },
    phase_speed: 0.05,
    extent: Extent::Box { w: Span::new(200.0, 500.0), h: Span::new(20.0, 60.0) },
    life: Span::new(300.0, 500.0),
    alpha: Span::fixed(0.8),
    fade: Fade::Over(500.0),
    palette: Palette::Hsl { hue: Span::new(120.0, 180.0), saturation: 0.8, lightness: Span::fixed(0.6) },
    palette2: Palette::Hsl { hue: Span::new(240.0, 300.0), saturation: 0.85, lightness: Span::fixed(0.65) },
    primitive: Primitive::Band,
    expiry: Expiry { behind_player: Some(200.0), ..Expiry::DEFAULT },
    max_live: Some(20),
    ..BASE
};

const METALLIC_FLOW: FamilySpec = FamilySpec {
    name: "metallic flow",
    knob: Knob::MetallicParticle,
    chance: 0.25,
    count: Count::Scaled { base: 8.0, min: 0 },
    placement: Placement::BelowScreen { dx: Span::around(150.0), dy: Span::new(0.0, 100.0) },
    velocity: Velocity::Box { x: Span::around(2.0), y: Span::new(-8.0, -2.0) },
    motion: Motion::Linear { gravity: 0.1 },
    wobble: Vec2::new(2.0, 0.0),
    phase_speed: 0.1,
    life: Span::new(150.0, 250.0),
    size: Span::new(4.0, 12.0),
    fade: Fade::Over(250.0),
    trail_len: 6,
    palette: Palette::Hsl { hue: Span::new(180.0, 240.0), saturation: 0.9, lightness: Span::new(0.7, 1.0) },
    primitive: Primitive::TrailDots,
    expiry: Expiry { below_screen: Some(100.0), ..Expiry::DEFAULT },
    max_live: Some(200),
    ..BASE
};

const DIGITAL_RAIN: FamilySpec = FamilySpec {
    name: "digital rain",
    knob: Knob::DigitalCharacter,
    layer: Layer::Atmosphere,
    chance: 0.1,
    count: Count::Scaled { base: 5.0, min: 0 },
    placement: Placement::Ahead { dx: Span::new(0.0, 100.0), past_screen: true, band: Band::Above(50.0) },
    velocity: Velocity::Box { x: Span::new(-12.0, -8.0), y: Span::ZERO },
    life: Span::new(200.0, 300.0),
    size: Span::fixed(12.0),
    segments: (8, 19),
    fade: Fade::Over(300.0),
    palette: Palette::Fixed([0.0, 1.0, 0.0]),
    primitive: Primitive::Glyphs,
    expiry: Expiry { behind_player: Some(200.0), ..Expiry::DEFAULT },
    max_live: Some(80),
    ..BASE
};

const MYSTIC_ORB: FamilySpec = FamilySpec {
    name: "mystic orb",
    knob: Knob::MysticOrb,
    chance: 0.3,
    count: Count::Scaled { base: 6.0, min: 0 },
    placement: Placement::AroundPlayer { dx: Span::around(200.0), dy: Span::around(150.0) },
    velocity: Velocity::Box { x: Span::around(1.5), y: Span::around(1.5) },
    motion: Motion::Damped { factor: 0.99 },
    phase_speed: 0.3,
    life: Span::new(180.0, 300.0),
    size: Span::new(2.0, 8.0),
    fade: Fade::Over(300.0),
    trail_len: 5,
    palette: Palette::Hsl { hue: Span::new(300.0, 360.0), saturation: 1.0, lightness: Span::new(0.7, 1.0) },
    primitive: Primitive::Orb,
    ..BASE
};

const BACKDROP_LINE: FamilySpec = FamilySpec {
    name: "backdrop line",
    knob: Knob::HorizontalLines,
    layer: Layer::Backdrop,
    chance: 0.3,
    placement: Placement::Ahead {
        dx: Span::new(BLOCK_SIZE * 10.0, BLOCK_SIZE * 12.0),
        past_screen: false,
        band: Band::Screen(1.0),
    },
    velocity: Velocity::PlayerScaled { x: Span::fixed(-2.5), y: Span::ZERO },
    extent: Extent::Box { w: Span::new(50.0, 200.0), h: Span::ZERO },
    life: Span::fixed(f32::INFINITY),
    alpha: Span::fixed(0.6),
    fade: Fade::Constant,
    primitive: Primitive::Line,
    expiry: Expiry { sweep_margin: DELETE_OFFSET * 2.0, ..Expiry::DEFAULT },
    ..BASE
};

const PLAYER_GHOST: FamilySpec = FamilySpec {
    name: "player ghost",
    knob: Knob::Trail,
    layer: Layer::Ghosts,
    extent: Extent::Player,
    life: Span::fixed(8.0),
    life_per_mul: 25.0,
    alpha: Span::fixed(0.6),
    palette: Palette::Player,
    primitive: Primitive::Ghost,
    glow: true,
    ..BASE
};

/// Every effect family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    JumpSpark,
    DoubleSpark,
    LandDust,
    GemSpark,
    SparkTrail,
    Bloom,
    CrashDebris,
    Shockwave,
    ScreenDust,
    ImpactWave,
    Starburst,
    GravityWave,
    EnergyRipple,
    PixelShatter,
    LensFlare,
    EnergySphere,
    SpiralField,
    CrystalShard,
    DarkTendril,
    GravitySurge,
    ShadowDash,
    HeatHaze,
    AfterImage,
    VelocityStreak,
    SpeedLine,
    WindMote,
    CosmicDust,
    FogBank,
    LightStream,
    MetallicFlow,
    DigitalRain,
    MysticOrb,
    BackdropLine,
    PlayerGhost,
}

impl Family {
    pub const COUNT: usize = 34;

    pub const ALL: [Family; Family::COUNT] = [
        Family::JumpSpark,
        Family::DoubleSpark,
        Family::LandDust,
        Family::GemSpark,
        Family::SparkTrail,
        Family::Bloom,
        Family::CrashDebris,
        Family::Shockwave,
        Family::ScreenDust,
        Family::ImpactWave,
        Family::Starburst,
        Family::GravityWave,
        Family::EnergyRipple,
        Family::PixelShatter,
        Family::LensFlare,
        Family::EnergySphere,
        Family::SpiralField,
        Family::CrystalShard,
        Family::DarkTendril,
        Family::GravitySurge,
        Family::ShadowDash,
        Family::HeatHaze,
        Family::AfterImage,
        Family::VelocityStreak,
        Family::SpeedLine,
        Family::WindMote,
        Family::CosmicDust,
        Family::FogBank,
        Family::LightStream,
        Family::MetallicFlow,
        Family::DigitalRain,
        Family::MysticOrb,
        Family::BackdropLine,
        Family::PlayerGhost,
    ];

    pub fn spec(self) -> &'static FamilySpec {
        match self {
            Family::JumpSpark => &JUMP_SPARK,
            Family::DoubleSpark => &DOUBLE_SPARK,
            Family::LandDust => &LAND_DUST,
            Family::GemSpark => &GEM_SPARK,
            Family::SparkTrail => &SPARK_TRAIL,
            Family::Bloom => &BLOOM,
            Family::CrashDebris => &CRASH_DEBRIS,
            Family::Shockwave => &SHOCKWAVE,
            Family::ScreenDust => &SCREEN_DUST,
            Family::ImpactWave => &IMPACT_WAVE,
            Family::Starburst => &STARBURST,
            Family::GravityWave => &GRAVITY_WAVE,
            Family::EnergyRipple => &ENERGY_RIPPLE,
            Family::PixelShatter => &PIXEL_SHATTER,
            Family::LensFlare => &LENS_FLARE,
            Family::EnergySphere => &ENERGY_SPHERE,
            Family::SpiralField => &SPIRAL_FIELD,
            Family::CrystalShard => &CRYSTAL_SHARD,
            Family::DarkTendril => &DARK_TENDRIL,
            Family::GravitySurge => &GRAVITY_SURGE,
            Family::ShadowDash => &SHADOW_DASH,
            Family::HeatHaze => &HEAT_HAZE,
            Family::AfterImage => &AFTER_IMAGE,
            Family::VelocityStreak => &VELOCITY_STREAK,
            Family::SpeedLine => &SPEED_LINE,
            Family::WindMote => &WIND_MOTE,
            Family::CosmicDust => &COSMIC_DUST,
            Family::FogBank => &FOG_BANK,
            Family::LightStream => &LIGHT_STREAM,
            Family::MetallicFlow => &METALLIC_FLOW,
            Family::DigitalRain => &DIGITAL_RAIN,
            Family::MysticOrb => &MYSTIC_ORB,
            Family::BackdropLine => &BACKDROP_LINE,
            Family::PlayerGhost => &PLAYER_GHOST,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_table_matches_enum_order() {
        for (i, family) in Family::ALL.iter().enumerate() {
            assert_eq!(*family as usize, i);
            assert!(!family.name().is_empty(), "{family:?} has no name");
        }
    }

    #[test]
    fn test_ring_families_have_a_reach() {
        for family in Family::ALL {
            let spec = family.spec();
            if matches!(spec.motion, Motion::RingExpand | Motion::Orbit) {
                assert!(spec.max_radius.max > 0.0, "{family:?}");
                assert!(spec.expand.min > 0.0, "{family:?}");
            }
        }
    }

    #[test]
    fn test_segment_ranges_are_ordered() {
        for family in Family::ALL {
            let (lo, hi) = family.spec().segments;
            assert!(lo <= hi, "{family:?}");
        }
    }

    #[test]
    fn test_trails_fit_the_ring_buffer() {
        for family in Family::ALL {
            assert!(family.spec().trail_len <= super::super::pool::TRAIL_CAP);
        }
    }
}
