//! Procedural level generation
//!
//! Platforms come in runs of contiguous one-block platforms. Each call emits
//! one run after a random gap and returns the run's trailing corner so calls
//! can be chained.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Gem, Platform, Spike};
use crate::consts::*;

/// Spike footprint as a fraction of one block
const SPIKE_SCALE: f32 = 0.6;
/// Height of a gem's top edge above its run
const GEM_LIFT: f32 = BLOCK_SIZE * 1.5;
/// Runs a single `extend` call may emit
const MAX_RUNS_PER_EXTEND: usize = 8;

/// Counts produced by one generator call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub blocks: usize,
    pub spikes: usize,
    pub gems: usize,
}

/// Build the spawn ground: wider than a run, hazard free
pub fn ground_platform(state: &GameState) -> Platform {
    let viewport = state.viewport;
    Platform {
        pos: Vec2::new(0.0, (viewport.height - 100.0).max(100.0)),
        width: viewport.width.max(500.0),
        height: BLOCK_SIZE,
        color: state.colors.current,
        passed: false,
        pulse_phase: 0.0,
    }
}

/// Pick how many blocks the next run gets (1..=8, biased short)
fn roll_block_count(rng: &mut impl Rng) -> usize {
    let count = (rng.random::<f32>() * 8.0).floor() as usize + 1;
    if rng.random::<f32>() < 0.7 {
        count.min((rng.random::<f32>() * 3.0).floor() as usize + 1)
    } else {
        count
    }
}

/// Emit the run that follows `trailing`, returning the new run's trailing corner.
pub fn generate_run(state: &mut GameState, trailing: Vec2) -> (Vec2, RunSummary) {
    let count = roll_block_count(&mut state.rng);
    let gap = (state.rng.random::<f32>() * 5.0 + 3.0).floor() * BLOCK_SIZE;
    let step = (state.rng.random::<f32>() * 3.0).floor() - 1.0;

    let x = trailing.x + gap;
    let y = (trailing.y + step * BLOCK_SIZE)
        .min(state.viewport.height - BLOCK_SIZE * 3.0)
        .max(BLOCK_SIZE);

    let color = state.colors.current;
    let first_spike = state.spikes.len();
    let mut summary = RunSummary {
        blocks: count,
        ..Default::default()
    };

    for i in 0..count {
        let block_x = x + i as f32 * BLOCK_SIZE;
        let pulse_phase = state.rng.random_range(0.0..std::f32::consts::TAU);
        state.platforms.push(Platform {
            pos: Vec2::new(block_x, y),
            width: BLOCK_SIZE,
            height: BLOCK_SIZE,
            color,
            passed: false,
            pulse_phase,
        });

        if state.rng.random::<f32>() < SPIKE_CHANCE {
            let inset = BLOCK_SIZE * (1.0 - SPIKE_SCALE) / 2.0;
            state.spikes.push(Spike {
                pos: Vec2::new(block_x + inset, y - BLOCK_SIZE + inset),
                width: BLOCK_SIZE * SPIKE_SCALE,
                height: BLOCK_SIZE * SPIKE_SCALE,
                hit: true,
                passed: false,
            });
            summary.spikes += 1;
        }
    }

    // Gems go in after every spike of the run exists; only this batch's
    // spikes are considered
    for i in 0..count {
        let roll = state.rng.random::<f32>();
        if !(state.cheats.gem_every_block || roll < GEM_CHANCE) {
            continue;
        }
        let gem_x = x + i as f32 * BLOCK_SIZE + BLOCK_SIZE / 4.0;
        let clear = state.spikes[first_spike..]
            .iter()
            .all(|s| (gem_x - s.pos.x).abs() >= GEM_SPIKE_CLEARANCE);
        if clear {
            let float_phase = state.rng.random_range(0.0..std::f32::consts::TAU);
            state.gems.push(Gem {
                pos: Vec2::new(gem_x, y - GEM_LIFT),
                size: GEM_SIZE,
                collected: false,
                float_phase,
            });
            summary.gems += 1;
        }
    }

    state.generated_runs += 1;
    log::debug!(
        "generated run {}: {} blocks, {} spikes, {} gems at ({x:.0}, {y:.0})",
        state.generated_runs,
        summary.blocks,
        summary.spikes,
        summary.gems
    );
    (Vec2::new(x + count as f32 * BLOCK_SIZE, y), summary)
}

/// Extend the world while the last platform's trailing edge is within one
/// screen width of the player. Emits at most `MAX_RUNS_PER_EXTEND` runs and
/// stops early once runs no longer advance the trailing edge (far out, where
/// `f32` spacing exceeds a run's width).
pub fn extend(state: &mut GameState) {
    for _ in 0..MAX_RUNS_PER_EXTEND {
        let Some(last) = state.platforms.last() else {
            return;
        };
        if last.right() >= state.player.pos.x + state.viewport.width {
            return;
        }
        let trailing = Vec2::new(last.right(), last.pos.y);
        let (next, _) = generate_run(state, trailing);
        if next.x <= trailing.x {
            log::warn!("level generation stalled at x = {:.0}", trailing.x);
            return;
        }
    }
}

/// Rebuild the level from scratch: ground first, then runs until the
/// initial platform count is reached.
pub fn build_initial(state: &mut GameState) {
    state.platforms.clear();
    state.spikes.clear();
    state.gems.clear();
    state.generated_runs = 0;

    let ground = ground_platform(state);
    let mut trailing = Vec2::new(ground.right(), ground.pos.y);
    state.platforms.push(ground);

    while state.platforms.len() < INITIAL_PLATFORMS {
        trailing = generate_run(state, trailing).0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn empty_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Viewport::new(1280.0, 720.0));
        state.platforms.clear();
        state.spikes.clear();
        state.gems.clear();
        state
    }

    #[test]
    fn test_ground_is_hazard_free_and_wide() {
        let state = GameState::new(1, Viewport::new(1280.0, 720.0));
        let ground = &state.platforms[0];
        assert_eq!(ground.pos, Vec2::new(0.0, 620.0));
        assert_eq!(ground.width, 1280.0);
        assert!(state.spikes.iter().all(|s| s.pos.x >= ground.right()));
    }

    #[test]
    fn test_ground_minimums_on_small_viewport() {
        let state = GameState::new(1, Viewport::new(300.0, 150.0));
        let ground = &state.platforms[0];
        assert_eq!(ground.pos.y, 100.0);
        assert_eq!(ground.width, 500.0);
    }

    #[test]
    fn test_initial_fill_reaches_target() {
        let state = GameState::new(7, Viewport::default());
        assert!(state.platforms.len() >= INITIAL_PLATFORMS);
        assert!(state.generated_runs >= 3);
    }

    #[test]
    fn test_gem_every_block_respects_batch_spikes() {
        let mut state = empty_state(99);
        state.cheats.gem_every_block = true;
        for _ in 0..50 {
            let first_spike = state.spikes.len();
            let first_gem = state.gems.len();
            generate_run(&mut state, Vec2::new(0.0, 400.0));
            for gem in &state.gems[first_gem..] {
                for spike in &state.spikes[first_spike..] {
                    assert!((gem.pos.x - spike.pos.x).abs() >= GEM_SPIKE_CLEARANCE);
                }
            }
        }
        assert!(!state.gems.is_empty());
    }

    #[test]
    fn test_spike_sits_on_its_block() {
        let mut state = empty_state(3);
        let mut trailing = Vec2::new(0.0, 400.0);
        for _ in 0..100 {
            trailing = generate_run(&mut state, trailing).0;
        }
        assert!(!state.spikes.is_empty());
        for spike in &state.spikes {
            assert!(spike.hit);
            let owner = state.platforms.iter().find(|p| {
                spike.pos.x >= p.pos.x && spike.right() <= p.right()
            });
            let owner = owner.expect("spike without platform");
            assert!((spike.pos.y + spike.height - (owner.pos.y - 10.0)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_block_count_favours_short_runs() {
        let mut rng = rand_pcg::Pcg32::seed_from_u64(21);
        let rolls = 20_000;
        let mut hist = [0usize; 9];
        for _ in 0..rolls {
            hist[roll_block_count(&mut rng)] += 1;
        }
        let share = |n: usize| hist[n] as f64 / rolls as f64;
        assert_eq!(hist[0], 0);
        // Shares of the clamped roll: 1 ~ 0.329, 2 ~ 0.271, 3 ~ 0.2125, 4..=8 ~ 0.0375
        assert!((share(1) - 0.329).abs() < 0.02, "{hist:?}");
        assert!((share(2) - 0.271).abs() < 0.02, "{hist:?}");
        assert!((share(3) - 0.2125).abs() < 0.02, "{hist:?}");
        for n in 4..=8 {
            assert!((share(n) - 0.0375).abs() < 0.01, "{hist:?}");
        }
    }

    #[test]
    fn test_extend_fills_one_screen_ahead() {
        let mut state = GameState::new(5, Viewport::new(1280.0, 720.0));
        state.player.pos.x = 3_000.0;
        extend(&mut state);
        let last = state.platforms.last().map(|p| p.right()).unwrap_or(0.0);
        assert!(last >= state.player.pos.x + state.viewport.width);
    }

    #[test]
    fn test_extend_returns_far_from_origin() {
        let mut state = GameState::new(6, Viewport::new(1280.0, 720.0));
        let before = state.platforms.len();
        state.player.pos.x = 1e12;
        extend(&mut state);
        assert!(state.platforms.len() - before <= MAX_RUNS_PER_EXTEND * 8);
    }

    proptest! {
        #[test]
        fn prop_run_shape(seed in any::<u64>(), lx in 0.0f32..10_000.0, ly in 50.0f32..570.0) {
            let mut state = empty_state(seed);
            let (trailing, summary) = generate_run(&mut state, Vec2::new(lx, ly));

            prop_assert!((1..=8).contains(&summary.blocks));
            prop_assert_eq!(state.platforms.len(), summary.blocks);
            let y = state.platforms[0].pos.y;
            prop_assert!(y >= BLOCK_SIZE && y <= 720.0 - BLOCK_SIZE * 3.0);
            prop_assert!((y - ly).abs() <= BLOCK_SIZE + 1e-3 || y == BLOCK_SIZE || y == 720.0 - BLOCK_SIZE * 3.0);

            let gap = state.platforms[0].pos.x - lx;
            prop_assert!(gap >= BLOCK_SIZE * 3.0 - 1e-2 && gap <= BLOCK_SIZE * 7.0 + 1e-2);

            for (i, p) in state.platforms.iter().enumerate() {
                prop_assert_eq!(p.width, BLOCK_SIZE);
                prop_assert_eq!(p.pos.y, y);
                if i > 0 {
                    prop_assert!((p.pos.x - state.platforms[i - 1].right()).abs() < 1e-2);
                }
            }
            let last = state.platforms.last().map(|p| p.right()).unwrap_or(lx);
            prop_assert!((trailing.x - last).abs() < 1e-2);
            prop_assert_eq!(trailing.y, y);
        }
    }
}
