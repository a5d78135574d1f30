//! Frame composition
//!
//! Builds the whole frame as one vertex list, back to front. Everything but
//! the flash overlay is translated by the screen shake.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shapes::Painter;
use super::vertex::{Vertex, colors, rgba, shade};
use crate::consts::BLOCK_SIZE;
use crate::settings::Knob;
use crate::sim::effects::Layer;
use crate::sim::{GameState, Platform};

/// Per-frame drawing parameters shared by every layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// Camera offset (top-left of the visible world)
    pub camera: Vec2,
    /// Screen shake translation for this frame
    pub shake: Vec2,
    /// Soft halos enabled
    pub glow: bool,
}

impl View {
    fn world(&self) -> Vec2 {
        self.camera - self.shake
    }

    fn screen(&self) -> Vec2 {
        -self.shake
    }
}

/// Margin beyond the screen edges inside which world objects are drawn
const CULL_MARGIN: f32 = 50.0;
/// Upper bound on blocks drawn under one platform
const MAX_COLUMN_ROWS: f32 = 64.0;

/// Reusable frame builder
pub struct Scene {
    painter: Painter,
    /// Shake jitter source; kept apart from the simulation's RNG
    rng: Pcg32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(0x5eed)
    }
}

impl Scene {
    pub fn new(seed: u64) -> Self {
        Self {
            painter: Painter::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Build the vertex list for the current state
    pub fn build(&mut self, state: &GameState) -> &[Vertex] {
        self.painter.clear();

        let shake = state.effects.shake;
        let shake = if shake > 0.0 {
            Vec2::new(
                (self.rng.random::<f32>() - 0.5) * shake,
                (self.rng.random::<f32>() - 0.5) * shake,
            )
        } else {
            Vec2::ZERO
        };
        let view = View {
            camera: state.camera.offset,
            shake,
            glow: state.quality.glow,
        };

        self.draw_layer(state, &view, Layer::ScreenDust);
        self.draw_parallax(state, &view);
        self.draw_layer(state, &view, Layer::Atmosphere);
        self.draw_layer(state, &view, Layer::Backdrop);
        self.draw_layer(state, &view, Layer::Motion);
        self.draw_platforms(state, &view);
        self.draw_spikes(state, &view);
        self.draw_gems(state, &view);
        self.draw_layer(state, &view, Layer::Ghosts);
        self.draw_layer(state, &view, Layer::Waves);
        self.draw_layer(state, &view, Layer::Particles);
        self.draw_player(state, &view);
        self.draw_radial_blur(state, &view);
        self.draw_flash(state);

        self.painter.vertices()
    }

    fn draw_layer(&mut self, state: &GameState, view: &View, layer: Layer) {
        for pool in state.effects.pools().filter(|pool| pool.spec().layer == layer) {
            pool.draw(&mut self.painter, view);
        }
    }

    fn draw_parallax(&mut self, state: &GameState, view: &View) {
        self.painter.set_offset(view.screen());
        for layer in &state.effects.parallax {
            self.painter.rect(
                layer.pos,
                Vec2::new(layer.width, layer.height),
                rgba(colors::PARALLAX, layer.alpha),
            );
        }
    }

    fn visible(state: &GameState, view: &View, x: f32, width: f32) -> bool {
        x + width >= view.camera.x - CULL_MARGIN && x <= view.camera.x + state.viewport.width + CULL_MARGIN
    }

    fn draw_platforms(&mut self, state: &GameState, view: &View) {
        self.painter.set_offset(view.world());
        let textured = state.quality.enabled(Knob::BlockTexture);
        let top = view.camera.y;
        let bottom = view.camera.y + state.viewport.height;

        for (index, platform) in state.platforms.iter().enumerate() {
            if !Self::visible(state, view, platform.pos.x, platform.width) {
                continue;
            }
            if textured {
                if index == 0 && view.glow {
                    self.ground_glow(platform);
                }
                self.textured_column(platform, top, bottom);
            } else {
                let brightness = platform.pulse_phase.sin() * 0.2 + 0.8;
                self.painter.rect(
                    platform.pos,
                    Vec2::new(platform.width, platform.height),
                    rgba(shade(platform.color, brightness), 1.0),
                );
            }
        }
    }

    fn ground_glow(&mut self, platform: &Platform) {
        let halo = 12.0;
        self.painter.rect_gradient(
            platform.pos - Vec2::new(0.0, halo),
            Vec2::new(platform.width, halo),
            rgba(platform.color, 0.0),
            rgba(platform.color, 0.9),
        );
    }

    /// Blocks from the platform top down past the bottom edge; the top block
    /// is full brightness, the rest darkened. Only rows between `top` and
    /// `bottom` are emitted.
    fn textured_column(&mut self, platform: &Platform, top: f32, bottom: f32) {
        let first = ((top - platform.pos.y) / BLOCK_SIZE).floor().max(0.0);
        let last = ((bottom - platform.pos.y) / BLOCK_SIZE).ceil();
        if last <= first {
            return;
        }
        let rows = (last - first).min(MAX_COLUMN_ROWS) as u32;
        for row in 0..rows {
            let index = first + row as f32;
            let dark = if index == 0.0 { 1.0 } else { 0.3 };
            self.painter.rect_gradient(
                Vec2::new(platform.pos.x, platform.pos.y + index * BLOCK_SIZE),
                Vec2::new(platform.width, BLOCK_SIZE),
                rgba(shade(platform.color, dark), 1.0),
                colors::BACKGROUND,
            );
        }
    }

    fn draw_spikes(&mut self, state: &GameState, view: &View) {
        self.painter.set_offset(view.world());
        for spike in &state.spikes {
            if !Self::visible(state, view, spike.pos.x, spike.width) {
                continue;
            }
            let bob = (state.time * 5.0 + spike.pos.x).sin() * 5.0;
            let base = spike.pos.y + spike.height + bob;
            self.painter.triangle(
                Vec2::new(spike.pos.x, base),
                Vec2::new(spike.pos.x + spike.width / 2.0, spike.pos.y + bob),
                Vec2::new(spike.pos.x + spike.width, base),
                rgba(colors::SPIKE, 1.0),
            );
        }
    }

    fn draw_gems(&mut self, state: &GameState, view: &View) {
        self.painter.set_offset(view.world());
        for gem in state.gems.iter().filter(|g| !g.collected) {
            if !Self::visible(state, view, gem.pos.x, gem.size) {
                continue;
            }
            let float = (state.time * 3.0 + gem.float_phase).sin() * 5.0;
            let center = gem.center() + Vec2::new(0.0, float);
            if view.glow {
                let radius = gem.size + 10.0 + 5.0 * (state.time * 5.0).sin();
                self.painter.glow(center, radius, rgba(colors::GEM, 0.5));
            }
            self.painter.diamond(center, gem.size, rgba(colors::GEM, 1.0));
        }
    }

    fn draw_player(&mut self, state: &GameState, view: &View) {
        let player = &state.player;
        if !player.visible {
            return;
        }
        self.painter.set_offset(view.world());
        let size = Vec2::new(player.width, player.height);
        if view.glow {
            self.painter
                .glow(player.center(), player.width.max(player.height), rgba(colors::PLAYER_STROKE, 0.5));
        }
        self.painter.rect(player.pos, size, rgba(player.color, 1.0));
        self.painter
            .rect_outline(player.pos, size, 6.0, rgba(colors::PLAYER_STROKE, 1.0));
    }

    /// Faint offset copies of the player, each shifted further right
    fn draw_radial_blur(&mut self, state: &GameState, view: &View) {
        let player = &state.player;
        let mul = state.quality.get(Knob::RadialBlur);
        if !player.visible || mul < 0.1 {
            return;
        }
        let intensity = mul * 0.1;
        let mut shift = 0.0;
        for i in 0..3 {
            shift += (i + 1) as f32 * intensity * 2.0;
            self.painter.set_alpha((i + 1) as f32 / 12.0 * intensity);
            self.painter.set_offset(view.world() - Vec2::new(shift, 0.0));
            self.painter.rect(
                player.pos,
                Vec2::new(player.width, player.height),
                rgba(player.color, 1.0),
            );
        }
        self.painter.set_alpha(1.0);
    }

    fn draw_flash(&mut self, state: &GameState) {
        let flash = state.effects.flash;
        if flash <= 0.0 {
            return;
        }
        self.painter.set_offset(Vec2::ZERO);
        self.painter.rect(
            Vec2::ZERO,
            state.viewport.size(),
            rgba(colors::FLASH, (flash * 0.05).min(1.0)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{self, Viewport};

    fn state() -> GameState {
        GameState::new(3, Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_menu_frame_has_world_geometry() {
        let state = state();
        let mut scene = Scene::default();
        assert!(!scene.build(&state).is_empty());
    }

    #[test]
    fn test_flash_is_last_and_unshaken() {
        let mut state = state();
        state.effects.flash = 10.0;
        state.effects.shake = 20.0;
        let mut scene = Scene::default();
        let vertices = scene.build(&state);
        let last = vertices[vertices.len() - 1];
        assert_eq!(last.position, [0.0, 600.0]);
        assert!((last.color[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hidden_player_is_not_drawn() {
        let mut state = state();
        let mut scene = Scene::default();
        let with_player = scene.build(&state).len();
        state.player.visible = false;
        let without = scene.build(&state).len();
        assert!(without < with_player);
    }

    #[test]
    fn test_texture_off_draws_one_quad_per_platform() {
        let mut state = state();
        state.quality.set(Knob::BlockTexture, 0.0);
        state.quality.set(Knob::RadialBlur, 0.0);
        state.quality.glow = false;
        state.spikes.clear();
        state.gems.clear();
        state.effects.clear();
        state.player.visible = false;
        let visible = state
            .platforms
            .iter()
            .filter(|p| {
                p.pos.x + p.width >= state.camera.offset.x - CULL_MARGIN
                    && p.pos.x <= state.camera.offset.x + 800.0 + CULL_MARGIN
            })
            .count();
        let mut scene = Scene::default();
        assert_eq!(scene.build(&state).len(), visible * 6);
    }

    #[test]
    fn test_column_under_deep_camera_stays_small() {
        let mut state = state();
        state.spikes.clear();
        state.gems.clear();
        state.effects.clear();
        state.player.visible = false;
        state.quality.glow = false;
        state.camera.offset.y = 1e9;
        let mut scene = Scene::default();
        let rows = MAX_COLUMN_ROWS as usize;
        assert!(scene.build(&state).len() <= state.platforms.len() * rows * 6);
    }

    #[test]
    fn test_running_frames_build() {
        let mut state = state();
        sim::start_run(&mut state);
        let mut scene = Scene::default();
        for _ in 0..120 {
            sim::tick(&mut state);
            assert!(!scene.build(&state).is_empty());
        }
    }
}
