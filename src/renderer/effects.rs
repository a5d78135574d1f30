//! Drawing effect pools
//!
//! Each particle is painted according to its family's [`Primitive`]. World
//! families are drawn through the camera; screen families only through the
//! shake translation.

use std::f32::consts::TAU;

use glam::Vec2;

use super::scene::View;
use super::shapes::Painter;
use super::vertex::rgba;
use crate::sim::effects::{EffectPool, FamilySpec, Particle, Primitive, Space};

/// Pseudo-random 3×5 glyph for a particle seed and column row
fn glyph_bits(seed: u32, row: u32) -> u16 {
    let mut h = seed ^ row.wrapping_mul(0x9E37_79B9);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    // Never blank
    ((h & 0x7FFF) as u16) | 0b010
}

impl EffectPool {
    /// Paint every live particle of this pool
    pub fn draw(&self, painter: &mut Painter, view: &View) {
        let spec = self.spec();
        painter.set_offset(match spec.space {
            Space::World => view.camera - view.shake,
            Space::Screen => -view.shake,
        });
        for p in self.iter() {
            if p.alpha <= 0.0 {
                continue;
            }
            if view.glow && spec.glow {
                halo(painter, spec, p);
            }
            draw_particle(painter, spec, p);
        }
    }
}

fn halo(painter: &mut Painter, spec: &FamilySpec, p: &Particle) {
    let head = p.head(spec);
    let reach = p.size.max(p.extent.max_element()) * p.scale.max(0.0);
    let center = head + p.extent * 0.5;
    painter.glow(center, reach * 1.5 + 4.0, rgba(p.color, p.alpha * 0.3));
}

fn draw_particle(painter: &mut Painter, spec: &FamilySpec, p: &Particle) {
    let color = rgba(p.color, p.alpha.min(1.0));
    let head = p.head(spec);
    let size = p.size * p.scale.max(0.0);

    match spec.primitive {
        Primitive::Square => {
            if p.trail.len() > 1 {
                let points: Vec<Vec2> = p.trail.iter().collect();
                painter.polyline(&points, (size * 0.4).max(1.0), rgba(p.color, p.alpha * 0.5), 0.0);
            }
            painter.rotated_square(head, size, p.rotation, color);
        }
        Primitive::Dot => painter.rect(head, Vec2::splat(size), color),
        Primitive::Glow => {
            if p.color2 == p.color {
                painter.glow(head, size, color);
            } else {
                painter.radial(head, size, color, rgba(p.color2, 0.0));
            }
        }
        Primitive::Ring { width } => painter.ring(head, p.radius, width, color),
        Primitive::WavyRing {
            lobes,
            amplitude,
            width,
        } => {
            let (radius, phase) = (p.radius, p.phase);
            painter.ring_with(head, width, 0.0, TAU, color, |a| {
                radius + (a * lobes + phase).sin() * amplitude
            });
        }
        Primitive::DashedRing { width } => {
            let dashes = p.segments.max(1) as f32;
            let step = TAU / dashes;
            for i in 0..p.segments.max(1) {
                let start = p.rotation + i as f32 * step;
                painter.arc(head, p.radius, width, start, start + step * 0.5, color);
            }
        }
        Primitive::PulseRing => {
            let radius = p.radius * (1.0 + 0.1 * p.phase.sin());
            painter.ring(head, radius, 3.0, color);
            painter.ring(head, radius * 0.6, 1.5, rgba(p.color, p.alpha * 0.6));
        }
        Primitive::Rings => {
            let rings = p.segments.max(1);
            for i in 0..rings {
                let breathe = 1.0 + 0.2 * (p.phase + i as f32).sin();
                let radius = size * (i + 1) as f32 / rings as f32 * breathe;
                painter.ring(head, radius, 2.0, color);
            }
            painter.glow(head, size * 0.4, color);
        }
        Primitive::Spiral => {
            let arms = p.segments.max(1);
            for arm in 0..arms {
                let base = p.rotation + arm as f32 / arms as f32 * TAU;
                let points: Vec<Vec2> = (0..=16)
                    .map(|t| {
                        let t = t as f32 / 16.0;
                        head + Vec2::from_angle(base + t * 4.0) * p.radius * t
                    })
                    .collect();
                painter.polyline(&points, 2.0, color, 0.2);
            }
        }
        Primitive::Streak => {
            let dir = Vec2::from_angle(p.angle);
            painter.line_gradient(head - dir * p.length, head, p.size.max(1.0), rgba(p.color, 0.0), color);
        }
        Primitive::Polygon => {
            let sides = u32::from(p.segments.max(3));
            painter.polygon(head, size, sides, p.rotation, rgba(p.color, p.alpha * 0.6));
            painter.polygon_outline(head, size, sides, p.rotation, 1.5, color);
        }
        Primitive::Ellipse => painter.ellipse(head, Vec2::new(size, size * 0.5), p.rotation, color),
        Primitive::Glyphs => {
            let cell = p.size / 5.0;
            let rows = u32::from(p.segments.max(1));
            for row in 0..rows {
                let fade = 1.0 - row as f32 / rows as f32 * 0.8;
                let top_left = head + Vec2::new(0.0, row as f32 * p.size * 1.2);
                painter.glyph(top_left, cell, glyph_bits(p.seed, row), rgba(p.color, p.alpha * fade));
            }
        }
        Primitive::Band => {
            let band = p.extent.y / 3.0;
            for k in 0..3 {
                let sway = (p.phase + k as f32).sin() * 10.0;
                let pos = head + Vec2::new(0.0, k as f32 * band + sway);
                let alpha = p.alpha * (0.3 - k as f32 * 0.08);
                painter.rect_gradient_h(pos, Vec2::new(p.extent.x, band), rgba(p.color, alpha), rgba(p.color2, 0.0));
            }
        }
        Primitive::Orb => {
            if p.trail.len() > 1 {
                let points: Vec<Vec2> = p.trail.iter().collect();
                painter.polyline(&points, 1.0, rgba(p.color, p.alpha * 0.4), 0.0);
            }
            let breathe = 1.0 + 0.3 * p.phase.sin();
            painter.glow(head, size * 2.5 * breathe, rgba(p.color, p.alpha * 0.5));
            painter.circle(head, size * breathe, color);
        }
        Primitive::TrailDots => {
            let len = p.trail.len().max(1) as f32;
            for (i, point) in p.trail.iter().enumerate() {
                let t = (i + 1) as f32 / len;
                painter.circle(point, size * 0.5 * t, rgba(p.color, p.alpha * t * 0.6));
            }
            painter.circle(head, size * 0.5, color);
        }
        Primitive::Polyline => {
            let points: Vec<Vec2> = p.trail.iter().collect();
            painter.polyline(&points, size, color, 0.0);
        }
        Primitive::Line => {
            let width = p.extent.x;
            painter.line(head, head + Vec2::new(width, 0.0), 2.0, color);
            let twin = head + Vec2::new(-5.0, 2.0);
            painter.line(twin, twin + Vec2::new(width, 0.0), 2.0, color);
        }
        Primitive::Ghost => {
            painter.rect(head, p.extent, rgba(p.color, p.alpha * 0.5));
            painter.rect_outline(head, p.extent, 2.0, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Family;

    fn view() -> View {
        View {
            camera: Vec2::new(100.0, 0.0),
            shake: Vec2::ZERO,
            glow: false,
        }
    }

    fn particle(pos: Vec2) -> Particle {
        Particle {
            pos,
            life: 10.0,
            max_life: 10.0,
            size: 10.0,
            scale: 1.0,
            base_alpha: 1.0,
            alpha: 1.0,
            color: [1.0, 1.0, 1.0],
            color2: [1.0, 1.0, 1.0],
            ..Default::default()
        }
    }

    #[test]
    fn test_world_pool_draws_through_camera() {
        let mut pool = EffectPool::new(Family::PixelShatter);
        pool.push(particle(Vec2::new(150.0, 20.0)));
        let mut painter = Painter::new();
        pool.draw(&mut painter, &view());
        assert_eq!(painter.vertices()[0].position, [50.0, 20.0]);
    }

    #[test]
    fn test_screen_pool_ignores_camera() {
        let mut pool = EffectPool::new(Family::ScreenDust);
        pool.push(particle(Vec2::new(150.0, 20.0)));
        let mut painter = Painter::new();
        pool.draw(&mut painter, &view());
        assert_eq!(painter.vertices()[0].position, [150.0, 20.0]);
    }

    #[test]
    fn test_faded_particles_are_skipped() {
        let mut pool = EffectPool::new(Family::Bloom);
        pool.push(Particle {
            alpha: 0.0,
            ..particle(Vec2::ZERO)
        });
        let mut painter = Painter::new();
        pool.draw(&mut painter, &view());
        assert!(painter.vertices().is_empty());
    }

    #[test]
    fn test_every_family_draws_something() {
        for family in Family::ALL {
            let mut pool = EffectPool::new(family);
            let mut p = particle(Vec2::new(200.0, 200.0));
            p.radius = 20.0;
            p.max_radius = 40.0;
            p.length = 30.0;
            p.segments = 4;
            p.extent = Vec2::new(40.0, 30.0);
            p.trail.push(Vec2::new(190.0, 200.0), 5);
            p.trail.push(Vec2::new(195.0, 200.0), 5);
            pool.push(p);
            let mut painter = Painter::new();
            pool.draw(&mut painter, &view());
            assert!(!painter.vertices().is_empty(), "{family:?}");
        }
    }

    #[test]
    fn test_glyphs_are_never_blank() {
        for seed in [0, 1, 7, u32::MAX] {
            for row in 0..20 {
                assert_ne!(glyph_bits(seed, row), 0);
            }
        }
    }
}
