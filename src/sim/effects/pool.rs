//! Generic particle pool driven by a [`FamilySpec`]

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::catalog::{Band, Count, Extent, Fade, Family, FamilySpec, Motion, Palette, Placement, Space, Velocity};
use super::{Emit, SpawnContext};
use crate::settings::Quality;

/// Longest trail any family keeps
pub const TRAIL_CAP: usize = 12;

/// Fixed-capacity ring of recent positions, oldest first on iteration
#[derive(Debug, Clone, Copy, Default)]
pub struct Trail {
    points: [Vec2; TRAIL_CAP],
    len: usize,
    head: usize,
}

impl Trail {
    /// Append a point, evicting the oldest beyond `cap`
    pub fn push(&mut self, point: Vec2, cap: usize) {
        let cap = cap.clamp(1, TRAIL_CAP);
        self.points[self.head] = point;
        self.head = (self.head + 1) % TRAIL_CAP;
        self.len = (self.len + 1).min(cap);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        let start = self.head + TRAIL_CAP - self.len;
        (0..self.len).map(move |i| self.points[(start + i) % TRAIL_CAP])
    }
}

/// One live particle. Fields a family does not use stay at their defaults.
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    /// Remaining ticks
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub extent: Vec2,
    pub length: f32,
    pub color: [f32; 3],
    pub color2: [f32; 3],
    pub base_alpha: f32,
    pub alpha: f32,
    pub rotation: f32,
    pub spin: f32,
    pub scale: f32,
    pub scale_speed: f32,
    pub radius: f32,
    pub max_radius: f32,
    pub expand: f32,
    /// Heading in radians
    pub angle: f32,
    pub phase: f32,
    pub segments: u8,
    pub seed: u32,
    pub trail: Trail,
}

impl Particle {
    fn reach_based(spec: &FamilySpec) -> bool {
        matches!(spec.motion, Motion::RingExpand | Motion::Orbit)
    }

    /// Where the particle is drawn (orbiters travel out from their origin)
    pub fn head(&self, spec: &FamilySpec) -> Vec2 {
        match spec.motion {
            Motion::Orbit => self.pos + Vec2::from_angle(self.angle) * self.radius,
            _ => self.pos,
        }
    }

    /// Remaining fraction in [0, 1]: life for particles, reach for rings
    pub fn remaining(&self, spec: &FamilySpec) -> f32 {
        if Self::reach_based(spec) {
            if self.max_radius > 0.0 {
                (1.0 - self.radius / self.max_radius).clamp(0.0, 1.0)
            } else {
                0.0
            }
        } else if self.max_life > 0.0 && self.max_life.is_finite() {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    fn advance(&mut self, spec: &FamilySpec) {
        match spec.motion {
            Motion::Linear { gravity } => {
                self.vel += self.accel;
                self.vel.y += gravity;
                self.pos += self.vel;
            }
            Motion::Damped { factor } => {
                self.pos += self.vel;
                self.vel *= factor;
            }
            Motion::RingExpand | Motion::Orbit => self.radius += self.expand,
        }
        if spec.wobble != Vec2::ZERO {
            self.pos += Vec2::new(spec.wobble.x * self.phase.sin(), spec.wobble.y * self.phase.cos());
        }
        self.phase += spec.phase_speed;
        self.rotation += self.spin;
        self.scale -= self.scale_speed;
        if !Self::reach_based(spec) {
            self.life -= 1.0;
        }
        if spec.trail_len > 0 {
            self.trail.push(self.head(spec), spec.trail_len);
        }
        self.alpha = match spec.fade {
            Fade::Constant => self.base_alpha,
            Fade::Lifetime | Fade::Reach => self.base_alpha * self.remaining(spec),
            Fade::Over(n) => self.base_alpha * (self.life / n).clamp(0.0, 1.0),
            Fade::Decay(factor) => self.alpha * factor,
        };
    }

    fn expired(&self, spec: &FamilySpec, ctx: &SpawnContext) -> bool {
        let spent = if Self::reach_based(spec) {
            self.radius >= self.max_radius
        } else {
            self.life <= 0.0
        };
        spent
            || self.scale <= 0.0
            || (matches!(spec.fade, Fade::Decay(_)) && self.alpha <= 0.01)
            || (spec.space == Space::World
                && (spec
                    .expiry
                    .behind_player
                    .is_some_and(|d| self.pos.x + self.extent.x.max(self.size) < ctx.player_pos.x - d)
                    || spec
                        .expiry
                        .below_screen
                        .is_some_and(|d| self.pos.y > ctx.camera.y + ctx.viewport.height + d)))
    }

    /// Rightmost world x the particle can still cover
    fn right_reach(&self, spec: &FamilySpec) -> f32 {
        let head = self.head(spec);
        head.x + self.extent.x.max(self.size).max(self.radius).max(self.length)
    }
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

fn pick_color(palette: Palette, primary: [f32; 3], ctx: &SpawnContext, emit: &Emit, rng: &mut impl Rng) -> [f32; 3] {
    match palette {
        Palette::Fixed(color) => color,
        Palette::Trigger => emit.color.unwrap_or([1.0, 1.0, 1.0]),
        Palette::Player => ctx.player_color,
        Palette::Hsl {
            hue,
            saturation,
            lightness,
        } => hsl_to_rgb(hue.sample(rng), saturation, lightness.sample(rng)),
        Palette::Noise => [rng.random(), rng.random(), rng.random()],
        Palette::Same => primary,
    }
}

/// Live particles of one family
#[derive(Debug, Clone)]
pub struct EffectPool {
    family: Family,
    particles: Vec<Particle>,
}

impl EffectPool {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            particles: Vec::new(),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn spec(&self) -> &'static FamilySpec {
        self.family.spec()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Insert a prepared particle directly
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Emit a batch according to the family's row. Returns how many
    /// particles were created.
    ///
    /// A zero multiplier disables the family, except for counts with a
    /// guaranteed minimum.
    pub fn spawn(&mut self, ctx: &SpawnContext, emit: Emit, quality: &Quality, rng: &mut impl Rng) -> usize {
        let spec = self.spec();
        let mul = quality.get(spec.knob);
        let guaranteed = matches!(spec.count, Count::Scaled { min, .. } if min > 0);
        if mul <= 0.0 && !guaranteed {
            return 0;
        }
        if spec.max_live.is_some_and(|cap| self.particles.len() >= cap) {
            return 0;
        }
        if spec.chance < 1.0 && rng.random::<f32>() >= spec.chance * mul {
            return 0;
        }

        let scale = (emit.intensity * mul).max(0.0);
        let (count, side) = match spec.count {
            Count::Fixed(n) => (n, 0),
            Count::Scaled { base, min } => (((base * scale).floor() as u32).max(min), 0),
            Count::Offset { fixed } => (fixed + scale.floor() as u32, 0),
            Count::Lattice { fixed } => {
                let side = fixed + scale.floor() as u32;
                (side * side, side)
            }
        };

        self.particles.reserve(count as usize);
        for i in 0..count {
            let particle = Self::make(spec, ctx, &emit, scale, mul, i, side, rng);
            self.particles.push(particle);
        }
        count as usize
    }

    #[allow(clippy::too_many_arguments)]
    fn make(
        spec: &FamilySpec,
        ctx: &SpawnContext,
        emit: &Emit,
        scale: f32,
        mul: f32,
        index: u32,
        side: u32,
        rng: &mut impl Rng,
    ) -> Particle {
        let mut p = Particle {
            angle: rng.random_range(0.0..TAU),
            rotation: rng.random_range(0.0..TAU),
            phase: rng.random_range(0.0..TAU),
            scale: 1.0,
            seed: rng.random(),
            ..Default::default()
        };

        p.pos = match spec.placement {
            Placement::Anchor { jitter } => {
                emit.anchor
                    + Vec2::new(
                        (rng.random::<f32>() - 0.5) * jitter.x,
                        (rng.random::<f32>() - 0.5) * jitter.y,
                    )
            }
            Placement::Body => {
                emit.anchor + Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * ctx.player_size
            }
            Placement::Lattice { spacing } => {
                let side = side.max(1);
                let half = (side - 1) as f32 / 2.0;
                let cell = Vec2::new((index % side) as f32 - half, (index / side) as f32 - half);
                emit.anchor + cell * spacing
            }
            Placement::Ahead { dx, past_screen, band } => {
                let edge = if past_screen {
                    ctx.player_pos.x + ctx.viewport.width
                } else {
                    ctx.player_pos.x + ctx.player_size.x
                };
                let y = match band {
                    Band::Screen(fraction) => ctx.camera.y + rng.random::<f32>() * ctx.viewport.height * fraction,
                    Band::Above(distance) => ctx.camera.y - distance,
                };
                Vec2::new(edge + dx.sample(rng), y)
            }
            Placement::AroundPlayer { dx, dy } => ctx.player_pos + Vec2::new(dx.sample(rng), dy.sample(rng)),
            Placement::BelowScreen { dx, dy } => Vec2::new(
                ctx.player_pos.x + dx.sample(rng),
                ctx.camera.y + ctx.viewport.height + dy.sample(rng),
            ),
            Placement::Screen => Vec2::new(
                rng.random::<f32>() * ctx.viewport.width,
                rng.random::<f32>() * ctx.viewport.height,
            ),
        };

        p.vel = match spec.velocity {
            Velocity::Still => Vec2::ZERO,
            Velocity::Box { x, y } => Vec2::new(x.sample(rng), y.sample(rng)),
            Velocity::Radial { speed } => Vec2::from_angle(p.angle) * speed.sample(rng),
            Velocity::PlayerScaled { x, y } => Vec2::new(x.sample(rng) * ctx.player_speed, y.sample(rng)),
            Velocity::AlongMotion { jitter } => {
                p.angle = ctx.player_vy.atan2(ctx.player_speed) + (rng.random::<f32>() - 0.5) * jitter;
                Vec2::ZERO
            }
        };
        if !spec.accel.is_zero() {
            p.accel = Vec2::new(spec.accel.sample(rng), spec.accel.sample(rng));
        }

        p.life = spec.life.sample(rng).max(spec.life_per_mul * mul);
        p.max_life = p.life;
        p.size = spec.size.sample(rng) * if spec.size_scaled { scale } else { 1.0 };
        p.extent = match spec.extent {
            Extent::None => Vec2::ZERO,
            Extent::Player => ctx.player_size,
            Extent::Box { w, h } => Vec2::new(w.sample(rng), h.sample(rng)),
        };
        p.length = spec.length.sample(rng) + spec.length_per_mul * mul;
        p.color = pick_color(spec.palette, [1.0, 1.0, 1.0], ctx, emit, rng);
        p.color2 = pick_color(spec.palette2, p.color, ctx, emit, rng);
        p.base_alpha = spec.alpha.sample(rng);
        p.alpha = p.base_alpha;
        p.spin = spec.spin.sample(rng);
        p.scale_speed = spec.scale_speed.sample(rng);
        p.max_radius = spec.max_radius.sample(rng) * if spec.radius_scaled { scale } else { 1.0 };
        p.expand = spec.expand.sample(rng) + spec.expand_per_mul * mul;
        let (lo, hi) = spec.segments;
        p.segments = if hi > lo { rng.random_range(lo..=hi) } else { lo };
        p
    }

    /// Advance every particle one tick and drop those that expired
    pub fn tick(&mut self, ctx: &SpawnContext) {
        let spec = self.spec();
        self.particles.retain_mut(|p| {
            p.advance(spec);
            !p.expired(spec, ctx)
        });
    }

    /// Drop expired particles and world particles far behind the camera.
    /// Returns how many were removed.
    pub fn sweep(&mut self, ctx: &SpawnContext) -> usize {
        let spec = self.spec();
        let threshold = ctx.camera.x - spec.expiry.sweep_margin;
        let before = self.particles.len();
        self.particles.retain(|p| {
            !p.expired(spec, ctx) && (spec.space == Space::Screen || p.right_reach(spec) >= threshold)
        });
        before - self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx() -> SpawnContext {
        SpawnContext {
            player_pos: Vec2::new(100.0, 400.0),
            player_size: Vec2::splat(50.0),
            player_vy: 0.0,
            player_speed: 11.0,
            player_color: [0.0, 1.0, 1.0],
            viewport: Viewport::new(1280.0, 720.0),
            camera: Vec2::new(-50.0, 0.0),
        }
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(5)
    }

    #[test]
    fn test_trail_keeps_newest_points() {
        let mut trail = Trail::default();
        for i in 0..20 {
            trail.push(Vec2::splat(i as f32), 5);
        }
        let points: Vec<f32> = trail.iter().map(|p| p.x).collect();
        assert_eq!(points, vec![15.0, 16.0, 17.0, 18.0, 19.0]);
    }

    #[test]
    fn test_spark_count_scales_with_multiplier() {
        let mut pool = EffectPool::new(Family::JumpSpark);
        let spawned = pool.spawn(&ctx(), Emit::at(Vec2::ZERO), &Quality::uniform(0.5), &mut rng());
        assert_eq!(spawned, 15);
        assert_eq!(pool.len(), 15);
    }

    #[test]
    fn test_zero_multiplier_disables_family() {
        let mut pool = EffectPool::new(Family::JumpSpark);
        assert_eq!(pool.spawn(&ctx(), Emit::at(Vec2::ZERO), &Quality::uniform(0.0), &mut rng()), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_crash_debris_has_a_floor() {
        let mut pool = EffectPool::new(Family::CrashDebris);
        assert_eq!(pool.spawn(&ctx(), Emit::at(Vec2::ZERO), &Quality::uniform(0.0), &mut rng()), 6);
        let mut pool = EffectPool::new(Family::CrashDebris);
        assert_eq!(pool.spawn(&ctx(), Emit::at(Vec2::ZERO), &Quality::uniform(1.0), &mut rng()), 20);
    }

    #[test]
    fn test_lattice_is_square() {
        let mut pool = EffectPool::new(Family::CrystalShard);
        let spawned = pool.spawn(&ctx(), Emit::at(Vec2::ZERO), &Quality::uniform(1.0), &mut rng());
        assert_eq!(spawned, 16);
    }

    #[test]
    fn test_single_tick_particle_is_gone_after_one_tick() {
        let mut pool = EffectPool::new(Family::JumpSpark);
        pool.push(Particle {
            life: 1.0,
            max_life: 1.0,
            scale: 1.0,
            base_alpha: 1.0,
            alpha: 1.0,
            ..Default::default()
        });
        pool.tick(&ctx());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_ring_dies_at_max_radius() {
        let mut pool = EffectPool::new(Family::Shockwave);
        pool.spawn(&ctx(), Emit::at(Vec2::ZERO), &Quality::uniform(1.0), &mut rng());
        assert_eq!(pool.len(), 2);
        let mut alpha = f32::MAX;
        let mut ticks = 0;
        while !pool.is_empty() {
            let p = pool.iter().next().unwrap();
            assert!(p.radius < p.max_radius);
            assert!(p.alpha <= alpha);
            alpha = p.alpha;
            pool.tick(&ctx());
            ticks += 1;
            assert!(ticks < 100);
        }
        // 400 px at 20 px per tick
        assert_eq!(ticks, 20);
    }

    #[test]
    fn test_decay_fade_expires_when_faint() {
        let mut pool = EffectPool::new(Family::SpeedLine);
        pool.push(Particle {
            life: 1000.0,
            max_life: 1000.0,
            scale: 1.0,
            base_alpha: 0.011,
            alpha: 0.011,
            ..Default::default()
        });
        pool.tick(&ctx());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_wind_dies_behind_player() {
        let mut pool = EffectPool::new(Family::WindMote);
        pool.push(Particle {
            pos: Vec2::new(-10.0, 0.0),
            life: 100.0,
            max_life: 100.0,
            scale: 1.0,
            size: 2.0,
            base_alpha: 1.0,
            ..Default::default()
        });
        pool.tick(&ctx());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_sweep_drops_far_behind_camera() {
        let mut pool = EffectPool::new(Family::BackdropLine);
        let line = |x: f32| Particle {
            pos: Vec2::new(x, 0.0),
            life: f32::INFINITY,
            max_life: f32::INFINITY,
            scale: 1.0,
            extent: Vec2::new(100.0, 0.0),
            ..Default::default()
        };
        let mut context = ctx();
        context.camera.x = 2000.0;
        // Threshold is 2000 - 600
        pool.push(line(1000.0));
        pool.push(line(1350.0));
        assert_eq!(pool.sweep(&context), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_max_live_caps_spawns() {
        let mut pool = EffectPool::new(Family::LightStream);
        let quality = Quality::uniform(10.0);
        let mut rng = rng();
        for _ in 0..200 {
            pool.spawn(&ctx(), Emit::at(Vec2::ZERO), &quality, &mut rng);
        }
        assert_eq!(pool.len(), 20);
    }

    #[test]
    fn test_hsl_primaries() {
        let close = |a: [f32; 3], b: [f32; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4);
        assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
        assert!(close(hsl_to_rgb(120.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
        assert!(close(hsl_to_rgb(240.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
        assert!(close(hsl_to_rgb(360.0, 0.0, 1.0), [1.0, 1.0, 1.0]));
    }
}
