//! Smoothed follow camera
//!
//! The camera is a world-space offset subtracted from every position at draw
//! time. It eases toward a target derived from the player using the real frame
//! delta, so motion stays smooth regardless of how many ticks ran.

use glam::Vec2;

use super::state::{Player, Viewport};
use crate::consts::SIM_DT;

/// How far the player sits from the left edge of the screen
pub const LEAD_X: f32 = 150.0;
/// Fraction of the remaining distance covered per 60 Hz frame
pub const SMOOTHING: f32 = 0.1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    /// Top-left of the visible world region
    pub offset: Vec2,
    /// Last player position observed while alive; the death freeze anchors here
    pub last_player_x: f32,
    pub last_player_y: f32,
}

impl Camera {
    /// Snap directly onto the follow target (used on world reset)
    pub fn snap_to(&mut self, player: &Player, viewport: Viewport) {
        self.remember(player);
        self.offset = Self::follow_target(player.pos, player.height, viewport);
    }

    fn remember(&mut self, player: &Player) {
        self.last_player_x = player.pos.x;
        self.last_player_y = player.pos.y;
    }

    fn follow_target(pos: Vec2, height: f32, viewport: Viewport) -> Vec2 {
        Vec2::new(pos.x - LEAD_X, pos.y - viewport.height / 2.0 + height * 1.5)
    }

    /// Where the camera wants to be this frame
    pub fn target(&mut self, player: &Player, viewport: Viewport) -> Vec2 {
        if player.visible {
            self.remember(player);
        }
        // After death this stays on the last living position
        let anchor = Vec2::new(self.last_player_x, self.last_player_y);
        Self::follow_target(anchor, player.height, viewport)
    }

    /// Ease toward the target using the actual frame delta in seconds
    pub fn update(&mut self, player: &Player, viewport: Viewport, frame_dt: f32) {
        let target = self.target(player, viewport);
        let factor = (SMOOTHING * frame_dt / SIM_DT).clamp(0.0, 1.0);
        self.offset = self.offset * (1.0 - factor) + target * factor;
    }

    /// Convert a world point to screen space
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> Player {
        let mut p = Player::new(Viewport::default());
        p.pos = Vec2::new(x, y);
        p
    }

    #[test]
    fn test_moves_ten_percent_per_frame_at_60hz() {
        let viewport = Viewport::new(800.0, 600.0);
        let player = player_at(1150.0, 300.0);
        let mut camera = Camera::default();
        camera.update(&player, viewport, SIM_DT);
        // target x = 1000, one frame covers 10%
        assert!((camera.offset.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_slower_frames_cover_more_distance() {
        let viewport = Viewport::new(800.0, 600.0);
        let player = player_at(1150.0, 300.0);
        let mut fast = Camera::default();
        let mut slow = Camera::default();
        fast.update(&player, viewport, SIM_DT);
        slow.update(&player, viewport, SIM_DT * 2.0);
        assert!(slow.offset.x > fast.offset.x);
    }

    #[test]
    fn test_factor_is_clamped() {
        let viewport = Viewport::new(800.0, 600.0);
        let player = player_at(1150.0, 300.0);
        let mut camera = Camera::default();
        camera.update(&player, viewport, 10.0);
        let expected = Camera::default().target(&player, viewport);
        assert_eq!(camera.offset, expected);
    }

    #[test]
    fn test_freezes_on_death() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut player = player_at(500.0, 300.0);
        let mut camera = Camera::default();
        camera.update(&player, viewport, SIM_DT);

        player.visible = false;
        player.pos = Vec2::new(5000.0, 2000.0);
        let target = camera.target(&player, viewport);
        let expected = Vec2::new(500.0 - LEAD_X, 300.0 - 300.0 + player.height * 1.5);
        assert_eq!(target, expected);
    }

    #[test]
    fn test_fall_death_keeps_camera_low() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut player = player_at(500.0, 900.0);
        let mut camera = Camera::default();
        camera.snap_to(&player, viewport);
        let at_death = camera.offset;

        player.visible = false;
        player.pos.y = 0.0;
        for _ in 0..60 {
            camera.update(&player, viewport, SIM_DT);
        }
        assert!((camera.offset - at_death).length() < 1e-3);
    }
}
