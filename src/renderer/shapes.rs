//! CPU tessellation of 2D primitives
//!
//! [`Painter`] collects triangles in screen pixels. Every point passed in is
//! translated by the current offset (camera plus shake), and every color's
//! alpha is multiplied by the current global alpha.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;

/// Segment count for circles of the given radius
fn segments_for(radius: f32) -> u32 {
    ((radius * 0.5) as u32).clamp(8, 48)
}

/// Triangle-list builder
#[derive(Debug)]
pub struct Painter {
    vertices: Vec<Vertex>,
    offset: Vec2,
    alpha: f32,
}

impl Default for Painter {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(64 * 1024),
            offset: Vec2::ZERO,
            alpha: 1.0,
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.offset = Vec2::ZERO;
        self.alpha = 1.0;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Subtracted from every point (camera offset minus shake)
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn color(&self, color: [f32; 4]) -> [f32; 4] {
        [color[0], color[1], color[2], (color[3] * self.alpha).clamp(0.0, 1.0)]
    }

    fn push(&mut self, p: Vec2, color: [f32; 4]) {
        let p = p - self.offset;
        self.vertices.push(Vertex::new(p.x, p.y, color));
    }

    fn tri(&mut self, a: Vec2, b: Vec2, c: Vec2, ca: [f32; 4], cb: [f32; 4], cc: [f32; 4]) {
        let (ca, cb, cc) = (self.color(ca), self.color(cb), self.color(cc));
        if ca[3] <= 0.0 && cb[3] <= 0.0 && cc[3] <= 0.0 {
            return;
        }
        self.push(a, ca);
        self.push(b, cb);
        self.push(c, cc);
    }

    fn quad(&mut self, corners: [Vec2; 4], colors: [[f32; 4]; 4]) {
        let [a, b, c, d] = corners;
        let [ca, cb, cc, cd] = colors;
        self.tri(a, b, c, ca, cb, cc);
        self.tri(a, c, d, ca, cc, cd);
    }

    pub fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        self.tri(a, b, c, color, color, color);
    }

    /// Axis-aligned filled rectangle
    pub fn rect(&mut self, pos: Vec2, size: Vec2, color: [f32; 4]) {
        self.rect_gradient(pos, size, color, color);
    }

    /// Rectangle with a vertical gradient from `top` to `bottom`
    pub fn rect_gradient(&mut self, pos: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) {
        let corners = [
            pos,
            pos + Vec2::new(size.x, 0.0),
            pos + size,
            pos + Vec2::new(0.0, size.y),
        ];
        self.quad(corners, [top, top, bottom, bottom]);
    }

    /// Rectangle with a horizontal gradient from `left` to `right`
    pub fn rect_gradient_h(&mut self, pos: Vec2, size: Vec2, left: [f32; 4], right: [f32; 4]) {
        let corners = [
            pos,
            pos + Vec2::new(size.x, 0.0),
            pos + size,
            pos + Vec2::new(0.0, size.y),
        ];
        self.quad(corners, [left, right, right, left]);
    }

    /// Rectangle outline drawn inside-out around the edge
    pub fn rect_outline(&mut self, pos: Vec2, size: Vec2, width: f32, color: [f32; 4]) {
        let half = width * 0.5;
        let min = pos - Vec2::splat(half);
        let outer = size + Vec2::splat(width);
        self.rect(min, Vec2::new(outer.x, width), color);
        self.rect(min + Vec2::new(0.0, outer.y - width), Vec2::new(outer.x, width), color);
        self.rect(min + Vec2::new(0.0, width), Vec2::new(width, outer.y - 2.0 * width), color);
        self.rect(
            min + Vec2::new(outer.x - width, width),
            Vec2::new(width, outer.y - 2.0 * width),
            color,
        );
    }

    /// Square of side `size` rotated about its center
    pub fn rotated_square(&mut self, center: Vec2, size: f32, rotation: f32, color: [f32; 4]) {
        let half = size * 0.5;
        let rot = Vec2::from_angle(rotation);
        let corners = [
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]
        .map(|c| center + rot.rotate(c));
        self.quad(corners, [color; 4]);
    }

    /// Filled circle
    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.radial(center, radius, color, color);
    }

    /// Soft disc fading from `color` at the center to transparent at `radius`
    pub fn glow(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        let edge = [color[0], color[1], color[2], 0.0];
        self.radial(center, radius, color, edge);
    }

    /// Disc with separate center and rim colors
    pub fn radial(&mut self, center: Vec2, radius: f32, inner: [f32; 4], outer: [f32; 4]) {
        if radius <= 0.0 {
            return;
        }
        let segments = segments_for(radius);
        for i in 0..segments {
            let a1 = i as f32 / segments as f32 * TAU;
            let a2 = (i + 1) as f32 / segments as f32 * TAU;
            self.tri(
                center,
                center + Vec2::from_angle(a1) * radius,
                center + Vec2::from_angle(a2) * radius,
                inner,
                outer,
                outer,
            );
        }
    }

    /// Ellipse rotated about its center
    pub fn ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: [f32; 4]) {
        let rot = Vec2::from_angle(rotation);
        let segments = segments_for(radii.max_element());
        for i in 0..segments {
            let a1 = i as f32 / segments as f32 * TAU;
            let a2 = (i + 1) as f32 / segments as f32 * TAU;
            let p1 = center + rot.rotate(Vec2::from_angle(a1) * radii);
            let p2 = center + rot.rotate(Vec2::from_angle(a2) * radii);
            self.tri(center, p1, p2, color, color, color);
        }
    }

    /// Thick arc band between two angles, centered on `radius`
    pub fn arc(&mut self, center: Vec2, radius: f32, width: f32, start: f32, end: f32, color: [f32; 4]) {
        self.ring_with(center, width, start, end, color, |_| radius);
    }

    /// Full ring of the given stroke width
    pub fn ring(&mut self, center: Vec2, radius: f32, width: f32, color: [f32; 4]) {
        self.arc(center, radius, width, 0.0, TAU, color);
    }

    /// Ring whose radius varies with the angle
    pub fn ring_with(
        &mut self,
        center: Vec2,
        width: f32,
        start: f32,
        end: f32,
        color: [f32; 4],
        radius_at: impl Fn(f32) -> f32,
    ) {
        let span = end - start;
        let segments = ((span.abs() / TAU) * segments_for(radius_at(start).max(1.0)) as f32 * 1.5)
            .ceil()
            .max(2.0) as u32;
        let half = width * 0.5;
        for i in 0..segments {
            let a1 = start + span * i as f32 / segments as f32;
            let a2 = start + span * (i + 1) as f32 / segments as f32;
            let (d1, d2) = (Vec2::from_angle(a1), Vec2::from_angle(a2));
            let (r1, r2) = (radius_at(a1), radius_at(a2));
            let inner1 = center + d1 * (r1 - half).max(0.0);
            let outer1 = center + d1 * (r1 + half);
            let inner2 = center + d2 * (r2 - half).max(0.0);
            let outer2 = center + d2 * (r2 + half);
            self.quad([inner1, outer1, outer2, inner2], [color; 4]);
        }
    }

    /// Straight segment of the given width
    pub fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
        self.line_gradient(a, b, width, color, color);
    }

    /// Segment whose color blends from `ca` at `a` to `cb` at `b`
    pub fn line_gradient(&mut self, a: Vec2, b: Vec2, width: f32, ca: [f32; 4], cb: [f32; 4]) {
        let dir = (b - a).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        let perp = dir.perp() * (width * 0.5);
        self.quad([a + perp, b + perp, b - perp, a - perp], [ca, cb, cb, ca]);
    }

    /// Open polyline; alpha ramps from `tail_alpha` × color at the first
    /// point to full at the last
    pub fn polyline(&mut self, points: &[Vec2], width: f32, color: [f32; 4], tail_alpha: f32) {
        if points.len() < 2 {
            return;
        }
        let last = (points.len() - 1) as f32;
        for (i, pair) in points.windows(2).enumerate() {
            let t1 = tail_alpha + (1.0 - tail_alpha) * i as f32 / last;
            let t2 = tail_alpha + (1.0 - tail_alpha) * (i + 1) as f32 / last;
            let c1 = [color[0], color[1], color[2], color[3] * t1];
            let c2 = [color[0], color[1], color[2], color[3] * t2];
            self.line_gradient(pair[0], pair[1], width, c1, c2);
        }
    }

    /// Regular polygon with `sides` corners
    pub fn polygon(&mut self, center: Vec2, radius: f32, sides: u32, rotation: f32, color: [f32; 4]) {
        let sides = sides.max(3);
        for i in 0..sides {
            let a1 = rotation + i as f32 / sides as f32 * TAU;
            let a2 = rotation + (i + 1) as f32 / sides as f32 * TAU;
            self.tri(
                center,
                center + Vec2::from_angle(a1) * radius,
                center + Vec2::from_angle(a2) * radius,
                color,
                color,
                color,
            );
        }
    }

    /// Regular polygon outline
    pub fn polygon_outline(
        &mut self,
        center: Vec2,
        radius: f32,
        sides: u32,
        rotation: f32,
        width: f32,
        color: [f32; 4],
    ) {
        let sides = sides.max(3);
        for i in 0..sides {
            let a1 = rotation + i as f32 / sides as f32 * TAU;
            let a2 = rotation + (i + 1) as f32 / sides as f32 * TAU;
            self.line(
                center + Vec2::from_angle(a1) * radius,
                center + Vec2::from_angle(a2) * radius,
                width,
                color,
            );
        }
    }

    /// Diamond (square rotated a quarter turn) centered at `center`
    pub fn diamond(&mut self, center: Vec2, size: f32, color: [f32; 4]) {
        self.rotated_square(center, size, PI / 4.0, color);
    }

    /// 3×5 pixel glyph; bit `row * 3 + col` of `bits` lights a cell
    pub fn glyph(&mut self, top_left: Vec2, cell: f32, bits: u16, color: [f32; 4]) {
        for row in 0..5 {
            for col in 0..3 {
                if bits & (1 << (row * 3 + col)) != 0 {
                    self.rect(
                        top_left + Vec2::new(col as f32 * cell, row as f32 * cell),
                        Vec2::splat(cell * 0.9),
                        color,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_rect_is_two_triangles_in_screen_space() {
        let mut painter = Painter::new();
        painter.set_offset(Vec2::new(100.0, 50.0));
        painter.rect(Vec2::new(100.0, 50.0), Vec2::new(10.0, 20.0), WHITE);
        let v = painter.vertices();
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [0.0, 0.0]);
        assert_eq!(v[2].position, [10.0, 20.0]);
    }

    #[test]
    fn test_invisible_shapes_emit_nothing() {
        let mut painter = Painter::new();
        painter.rect(Vec2::ZERO, Vec2::ONE, [1.0, 1.0, 1.0, 0.0]);
        painter.set_alpha(0.0);
        painter.circle(Vec2::ZERO, 10.0, WHITE);
        assert!(painter.vertices().is_empty());
    }

    #[test]
    fn test_global_alpha_scales_colors() {
        let mut painter = Painter::new();
        painter.set_alpha(0.5);
        painter.triangle(Vec2::ZERO, Vec2::X, Vec2::Y, [1.0, 0.0, 0.0, 0.8]);
        assert!((painter.vertices()[0].color[3] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_glow_fades_to_transparent_rim() {
        let mut painter = Painter::new();
        painter.glow(Vec2::ZERO, 20.0, WHITE);
        let v = painter.vertices();
        assert!(!v.is_empty());
        assert_eq!(v[0].color[3], 1.0);
        assert_eq!(v[1].color[3], 0.0);
    }

    #[test]
    fn test_glyph_lights_set_bits() {
        let mut painter = Painter::new();
        painter.glyph(Vec2::ZERO, 2.0, 0b101, WHITE);
        assert_eq!(painter.vertices().len(), 12);
    }

    #[test]
    fn test_degenerate_line_is_skipped() {
        let mut painter = Painter::new();
        painter.line(Vec2::ONE, Vec2::ONE, 3.0, WHITE);
        painter.polyline(&[Vec2::ZERO], 3.0, WHITE, 0.0);
        assert!(painter.vertices().is_empty());
    }
}
