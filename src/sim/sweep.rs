//! Memory sweep
//!
//! Runs once per tick after the effect pass. Trims every bounded collection
//! against a threshold trailing the camera. The first platforms are never
//! removed, so the spawn ground always exists.

use super::effects::SpawnContext;
use super::state::GameState;
use crate::consts::{DELETE_OFFSET, PROTECTED_PREFIX};

/// Objects removed by one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub platforms: usize,
    pub spikes: usize,
    pub gems: usize,
    pub particles: usize,
}

impl SweepStats {
    pub fn total(&self) -> usize {
        self.platforms + self.spikes + self.gems + self.particles
    }
}

/// Remove world objects and particles that fell behind the camera
pub fn sweep(state: &mut GameState) -> SweepStats {
    let threshold = state.camera.offset.x - DELETE_OFFSET;
    let mut stats = SweepStats::default();

    let before = state.platforms.len();
    let mut index = 0;
    state.platforms.retain(|p| {
        let keep = index < PROTECTED_PREFIX || p.right() >= threshold;
        index += 1;
        keep
    });
    stats.platforms = before - state.platforms.len();

    let before = state.spikes.len();
    state.spikes.retain(|s| s.right() >= threshold);
    stats.spikes = before - state.spikes.len();

    let before = state.gems.len();
    state.gems.retain(|g| g.pos.x + g.size >= threshold);
    stats.gems = before - state.gems.len();

    let ctx = SpawnContext::of(state);
    stats.particles = state.effects.sweep(&ctx);

    if stats.total() > 0 {
        log::trace!("sweep removed {stats:?}");
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use proptest::prelude::*;

    #[test]
    fn test_protected_prefix_survives_far_camera() {
        let mut state = GameState::new(1, Viewport::default());
        let ground = state.platforms[0].pos;
        state.camera.offset.x = 10_000.0;
        sweep(&mut state);
        assert_eq!(state.platforms[0].pos, ground);
        assert_eq!(state.platforms.len(), PROTECTED_PREFIX);
        assert!(state.spikes.is_empty());
        assert!(state.gems.is_empty());
    }

    #[test]
    fn test_nothing_removed_near_spawn() {
        let mut state = GameState::new(2, Viewport::default());
        let counts = (state.platforms.len(), state.spikes.len(), state.gems.len());
        let stats = sweep(&mut state);
        assert_eq!(stats.total(), 0);
        assert_eq!(counts, (state.platforms.len(), state.spikes.len(), state.gems.len()));
    }

    proptest! {
        #[test]
        fn prop_prefix_never_swept(seed in any::<u64>(), camera_x in 0.0f32..1_000_000.0) {
            let mut state = GameState::new(seed, Viewport::default());
            let prefix: Vec<_> = state.platforms[..PROTECTED_PREFIX].iter().map(|p| p.pos).collect();
            state.camera.offset.x = camera_x;
            sweep(&mut state);
            let after: Vec<_> = state.platforms[..PROTECTED_PREFIX].iter().map(|p| p.pos).collect();
            prop_assert_eq!(prefix, after);
        }
    }
}
