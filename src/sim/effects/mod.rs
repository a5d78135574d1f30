//! Visual effects engine
//!
//! One [`EffectPool`] per [`Family`]. Gameplay triggers (jump, landing, gem,
//! death) and the per-tick ambient pass route to the families listed below;
//! each family's row in the catalog decides the rest.

pub mod catalog;
pub mod pool;

use glam::Vec2;
use rand::Rng;

pub use catalog::{Family, FamilySpec, Layer, Primitive, Space};
pub use pool::{EffectPool, Particle};

use super::state::{GameState, Viewport};
use crate::consts::HARD_LANDING_SPEED;
use crate::settings::{Knob, Quality};

const JUMP_COLOR: [f32; 3] = [0.0, 1.0, 1.0];
const DOUBLE_JUMP_COLOR: [f32; 3] = [1.0, 1.0, 0.0];
const LAND_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const GEM_COLOR: [f32; 3] = [1.0, 1.0, 0.0];

/// Snapshot of the world values spawns and expiry rules read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnContext {
    pub player_pos: Vec2,
    pub player_size: Vec2,
    pub player_vy: f32,
    pub player_speed: f32,
    pub player_color: [f32; 3],
    pub viewport: Viewport,
    /// Camera offset (top-left of the visible world)
    pub camera: Vec2,
}

impl SpawnContext {
    pub fn of(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            player_pos: player.pos,
            player_size: Vec2::new(player.width, player.height),
            player_vy: player.vy,
            player_speed: player.speed,
            player_color: player.color,
            viewport: state.viewport,
            camera: state.camera.offset,
        }
    }

    fn center(&self) -> Vec2 {
        self.player_pos + self.player_size * 0.5
    }

    fn feet(&self) -> Vec2 {
        self.player_pos + Vec2::new(self.player_size.x * 0.5, self.player_size.y)
    }
}

/// Where and how strongly a trigger fires a family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emit {
    pub anchor: Vec2,
    pub intensity: f32,
    pub color: Option<[f32; 3]>,
}

impl Emit {
    pub fn at(anchor: Vec2) -> Self {
        Self {
            anchor,
            intensity: 1.0,
            color: None,
        }
    }

    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn color(mut self, color: [f32; 3]) -> Self {
        self.color = Some(color);
        self
    }
}

/// Screen-space background streak; scrolls left and wraps
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Fraction of the player's speed this layer scrolls at
    pub depth: f32,
    pub alpha: f32,
}

/// All effect state owned by the simulation
#[derive(Debug, Clone)]
pub struct Effects {
    pools: Vec<EffectPool>,
    pub parallax: Vec<ParallaxLayer>,
    /// Screen shake magnitude in pixels; decays every tick
    pub shake: f32,
    /// White flash strength; decays every tick
    pub flash: f32,
}

impl Default for Effects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects {
    pub fn new() -> Self {
        Self {
            pools: Family::ALL.iter().map(|&f| EffectPool::new(f)).collect(),
            parallax: Vec::new(),
            shake: 0.0,
            flash: 0.0,
        }
    }

    pub fn pool(&self, family: Family) -> &EffectPool {
        &self.pools[family as usize]
    }

    pub fn pools(&self) -> impl Iterator<Item = &EffectPool> {
        self.pools.iter()
    }

    /// Live particles across every family
    pub fn live_count(&self) -> usize {
        self.pools.iter().map(EffectPool::len).sum()
    }

    /// Drop every particle and reset shake and flash
    pub fn clear(&mut self) {
        for pool in &mut self.pools {
            pool.clear();
        }
        self.parallax.clear();
        self.shake = 0.0;
        self.flash = 0.0;
    }

    fn emit(&mut self, family: Family, ctx: &SpawnContext, emit: Emit, quality: &Quality, rng: &mut impl Rng) -> usize {
        self.pools[family as usize].spawn(ctx, emit, quality, rng)
    }

    fn kick(&mut self, magnitude: f32, quality: &Quality) {
        if quality.enabled(Knob::ScreenShake) {
            self.shake = self.shake.max(magnitude * quality.get(Knob::ScreenShake));
        }
    }

    /// Rebuild the parallax streaks for a fresh run
    pub fn reset_parallax(&mut self, viewport: Viewport, quality: &Quality, rng: &mut impl Rng) {
        self.parallax.clear();
        let count = (5.0 * quality.get(Knob::ParallaxLayers)).floor().max(0.0) as usize;
        for i in 0..count {
            self.parallax.push(ParallaxLayer {
                pos: Vec2::new(
                    rng.random::<f32>() * viewport.width * 2.0,
                    rng.random::<f32>() * viewport.height,
                ),
                width: rng.random_range(100.0..400.0),
                height: rng.random_range(1.0..4.0),
                depth: rng.random_range(0.1..0.6) * (i + 1) as f32 * 0.2,
                alpha: rng.random_range(0.05..0.15),
            });
        }
    }

    /// Jump effects; `first` is the ground jump, otherwise a double jump
    pub fn on_jump(&mut self, ctx: &SpawnContext, first: bool, quality: &Quality, rng: &mut impl Rng) {
        let feet = ctx.feet();
        let center = ctx.center();
        let (sparks, color) = if first {
            (Family::JumpSpark, JUMP_COLOR)
        } else {
            (Family::DoubleSpark, DOUBLE_JUMP_COLOR)
        };
        self.emit(sparks, ctx, Emit::at(feet).color(color), quality, rng);
        self.emit(Family::SparkTrail, ctx, Emit::at(feet).color(color), quality, rng);
        self.emit(Family::Bloom, ctx, Emit::at(feet).color(color), quality, rng);
        if first {
            self.emit(Family::Starburst, ctx, Emit::at(feet).intensity(0.5), quality, rng);
        } else {
            self.emit(Family::HeatHaze, ctx, Emit::at(feet).intensity(0.3), quality, rng);
            self.emit(Family::AfterImage, ctx, Emit::at(ctx.player_pos), quality, rng);
        }
        self.emit(Family::VelocityStreak, ctx, Emit::at(center), quality, rng);
        self.emit(Family::SpeedLine, ctx, Emit::at(center), quality, rng);
        self.emit(Family::WindMote, ctx, Emit::at(center), quality, rng);
        self.emit(Family::MysticOrb, ctx, Emit::at(center), quality, rng);
        self.emit(Family::DarkTendril, ctx, Emit::at(feet).intensity(0.5), quality, rng);
        if quality.get(Knob::ScreenShake) > 0.5 {
            self.kick(3.0, quality);
        }
    }

    /// Landing effects, fired on every landing tick. `incoming_vy` is the
    /// vertical speed before the snap.
    pub fn on_land(&mut self, ctx: &SpawnContext, incoming_vy: f32, quality: &Quality, rng: &mut impl Rng) {
        let feet = ctx.feet();
        self.emit(Family::LandDust, ctx, Emit::at(feet).color(LAND_COLOR), quality, rng);
        self.emit(Family::SparkTrail, ctx, Emit::at(feet).color(LAND_COLOR), quality, rng);
        self.emit(Family::ImpactWave, ctx, Emit::at(feet).intensity(0.5), quality, rng);
        if incoming_vy >= HARD_LANDING_SPEED && quality.enabled(Knob::DropEffect) {
            self.on_drop(ctx, quality, rng);
        }
    }

    /// Hard landing effects
    pub fn on_drop(&mut self, ctx: &SpawnContext, quality: &Quality, rng: &mut impl Rng) {
        let feet = ctx.feet();
        self.emit(Family::GravitySurge, ctx, Emit::at(feet), quality, rng);
        self.emit(Family::ShadowDash, ctx, Emit::at(feet), quality, rng);
        self.kick(6.0, quality);
    }

    /// Gem pickup effects at the gem's center
    pub fn on_gem(&mut self, ctx: &SpawnContext, gem: Vec2, quality: &Quality, rng: &mut impl Rng) {
        self.emit(Family::GemSpark, ctx, Emit::at(gem).color(GEM_COLOR), quality, rng);
        self.emit(Family::CrystalShard, ctx, Emit::at(gem).intensity(0.5), quality, rng);
        self.emit(Family::LensFlare, ctx, Emit::at(gem), quality, rng);
        self.emit(Family::EnergyRipple, ctx, Emit::at(gem), quality, rng);
        self.kick(8.0, quality);
    }

    /// Death burst around the player
    pub fn on_death(&mut self, ctx: &SpawnContext, quality: &Quality, rng: &mut impl Rng) {
        let center = ctx.center();
        self.emit(Family::CrashDebris, ctx, Emit::at(ctx.player_pos), quality, rng);
        self.emit(Family::Shockwave, ctx, Emit::at(center), quality, rng);
        self.emit(Family::ScreenDust, ctx, Emit::at(center), quality, rng);
        self.emit(Family::Starburst, ctx, Emit::at(center).intensity(2.0), quality, rng);
        self.emit(Family::GravityWave, ctx, Emit::at(center).intensity(1.5), quality, rng);
        self.emit(Family::EnergyRipple, ctx, Emit::at(center).intensity(1.5), quality, rng);
        self.emit(Family::PixelShatter, ctx, Emit::at(center).intensity(2.0), quality, rng);
        self.emit(Family::LensFlare, ctx, Emit::at(center).intensity(2.0), quality, rng);
        self.emit(Family::EnergySphere, ctx, Emit::at(center).intensity(2.0), quality, rng);
        self.emit(Family::SpiralField, ctx, Emit::at(center).intensity(2.0), quality, rng);
        self.kick(30.0, quality);
        self.flash = 20.0;
    }

    /// Per-tick ambient spawns while the player is alive
    pub fn ambient(&mut self, ctx: &SpawnContext, trail: bool, quality: &Quality, rng: &mut impl Rng) {
        let center = Emit::at(ctx.center());
        for family in [
            Family::CosmicDust,
            Family::LightStream,
            Family::DigitalRain,
            Family::MetallicFlow,
            Family::FogBank,
            Family::BackdropLine,
        ] {
            self.emit(family, ctx, center, quality, rng);
        }
        if trail {
            self.emit(Family::PlayerGhost, ctx, Emit::at(ctx.player_pos), quality, rng);
        }
    }

    /// Advance every pool and the parallax streaks by one tick
    pub fn tick(&mut self, ctx: &SpawnContext) {
        for pool in &mut self.pools {
            pool.tick(ctx);
        }
        let width = ctx.viewport.width;
        for layer in &mut self.parallax {
            layer.pos.x -= layer.depth * ctx.player_speed;
            if layer.pos.x + layer.width < 0.0 {
                layer.pos.x += width + layer.width;
            }
        }
    }

    /// Decay shake and flash
    pub fn settle(&mut self) {
        self.shake *= 0.85;
        if self.shake < 0.1 {
            self.shake = 0.0;
        }
        self.flash *= 0.9;
        if self.flash < 0.01 {
            self.flash = 0.0;
        }
    }

    /// Drop expired and far-behind particles in every pool
    pub fn sweep(&mut self, ctx: &SpawnContext) -> usize {
        self.pools.iter_mut().map(|pool| pool.sweep(ctx)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> GameState {
        GameState::new(11, Viewport::default())
    }

    #[test]
    fn test_pools_cover_every_family() {
        let effects = Effects::new();
        for family in Family::ALL {
            assert_eq!(effects.pool(family).family(), family);
        }
        assert_eq!(effects.live_count(), 0);
    }

    #[test]
    fn test_death_burst_spawns_debris_and_flash() {
        let state = state();
        let ctx = SpawnContext::of(&state);
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(1);
        effects.on_death(&ctx, &Quality::uniform(1.0), &mut rng);
        assert_eq!(effects.pool(Family::CrashDebris).len(), 20);
        assert_eq!(effects.pool(Family::Shockwave).len(), 2);
        assert_eq!(effects.flash, 20.0);
        assert_eq!(effects.shake, 30.0);
    }

    #[test]
    fn test_effects_off_still_shatters() {
        let state = state();
        let ctx = SpawnContext::of(&state);
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(1);
        effects.on_death(&ctx, &Quality::uniform(0.0), &mut rng);
        assert_eq!(effects.live_count(), 6);
        assert_eq!(effects.shake, 0.0);
    }

    #[test]
    fn test_jump_sparks_by_jump_kind() {
        let state = state();
        let ctx = SpawnContext::of(&state);
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(2);
        let quality = Quality::uniform(1.0);
        effects.on_jump(&ctx, true, &quality, &mut rng);
        assert_eq!(effects.pool(Family::JumpSpark).len(), 30);
        assert!(effects.pool(Family::DoubleSpark).is_empty());
        effects.on_jump(&ctx, false, &quality, &mut rng);
        assert_eq!(effects.pool(Family::DoubleSpark).len(), 30);
        assert_eq!(effects.pool(Family::HeatHaze).len(), 1);
        assert_eq!(effects.shake, 3.0);
    }

    #[test]
    fn test_hard_landing_adds_drop_effects() {
        let state = state();
        let ctx = SpawnContext::of(&state);
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let quality = Quality::uniform(1.0);
        effects.on_land(&ctx, 1.0, &quality, &mut rng);
        assert!(effects.pool(Family::GravitySurge).is_empty());
        effects.on_land(&ctx, HARD_LANDING_SPEED, &quality, &mut rng);
        assert_eq!(effects.pool(Family::GravitySurge).len(), 1);
        assert_eq!(effects.pool(Family::ShadowDash).len(), 6);
    }

    #[test]
    fn test_shake_and_flash_settle_to_zero() {
        let mut effects = Effects::new();
        effects.shake = 30.0;
        effects.flash = 20.0;
        for _ in 0..200 {
            effects.settle();
        }
        assert_eq!(effects.shake, 0.0);
        assert_eq!(effects.flash, 0.0);
    }

    #[test]
    fn test_parallax_wraps_on_screen() {
        let state = state();
        let ctx = SpawnContext::of(&state);
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(4);
        effects.reset_parallax(state.viewport, &Quality::uniform(1.0), &mut rng);
        assert_eq!(effects.parallax.len(), 5);
        for _ in 0..5_000 {
            effects.tick(&ctx);
        }
        for layer in &effects.parallax {
            assert!(layer.pos.x + layer.width >= 0.0);
            assert!(layer.pos.x <= state.viewport.width * 2.0);
        }
    }

    #[test]
    fn test_everything_expires_eventually() {
        let state = state();
        let ctx = SpawnContext::of(&state);
        let mut effects = Effects::new();
        let mut rng = Pcg32::seed_from_u64(6);
        let quality = Quality::uniform(1.0);
        effects.on_jump(&ctx, false, &quality, &mut rng);
        effects.on_gem(&ctx, ctx.player_pos, &quality, &mut rng);
        effects.on_death(&ctx, &quality, &mut rng);
        assert!(effects.live_count() > 0);
        for _ in 0..1_000 {
            effects.tick(&ctx);
        }
        assert_eq!(effects.live_count(), 0);
    }
}
