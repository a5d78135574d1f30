//! Fixed-timestep scheduling
//!
//! Decouples the logical tick rate from the display rate. Each animation
//! frame feeds its wall-clock delta in; zero or more ticks run out of the
//! accumulated time, bounded so a long stall never turns into a runaway loop.

use crate::consts::{MAX_FRAME_DELTA, MAX_SUBSTEPS, SIM_DT};

/// Accumulator that converts frame deltas into fixed ticks
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTickScheduler {
    accumulator: f32,
    step: f32,
    max_delta: f32,
    max_ticks: u32,
}

impl Default for FixedTickScheduler {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_FRAME_DELTA, MAX_SUBSTEPS)
    }
}

impl FixedTickScheduler {
    pub fn new(step: f32, max_delta: f32, max_ticks: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_delta,
            max_ticks,
        }
    }

    /// Time carried over to the next frame
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Drop any carried time (new run)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Feed one frame's delta in seconds and run the ticks it pays for.
    /// Returns the number of ticks executed.
    ///
    /// The delta is clamped to the maximum frame delta. When the catch-up
    /// cap is reached, whole leftover ticks are dropped.
    pub fn advance(&mut self, frame_dt: f32, mut tick: impl FnMut()) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.max_delta)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks {
            tick();
            self.accumulator -= self.step;
            ticks += 1;
        }

        if self.accumulator >= self.step {
            let dropped = (self.accumulator / self.step).floor() as u32;
            log::debug!("scheduler dropped {dropped} tick(s) after hitting the catch-up cap");
            self.accumulator %= self.step;
        }
        ticks
    }
}

/// Optional frame-rate cap. Skipped frames carry their elapsed time into
/// the next rendered frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameLimiter {
    min_frame_time: Option<f32>,
    pending: f32,
}

impl FrameLimiter {
    pub fn new(min_frame_time: Option<f32>) -> Self {
        Self {
            min_frame_time,
            pending: 0.0,
        }
    }

    pub fn set_min_frame_time(&mut self, min_frame_time: Option<f32>) {
        self.min_frame_time = min_frame_time;
    }

    /// Returns the delta to simulate this frame, or `None` to skip it
    pub fn admit(&mut self, frame_dt: f32) -> Option<f32> {
        self.pending += frame_dt.max(0.0);
        match self.min_frame_time {
            // Small tolerance so a 60 fps cap does not drop vsync frames
            Some(min) if self.pending < min * 0.95 => None,
            _ => Some(std::mem::take(&mut self.pending)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(scheduler: &mut FixedTickScheduler, dt: f32) -> u32 {
        let mut count = 0;
        let ticks = scheduler.advance(dt, || count += 1);
        assert_eq!(ticks, count);
        ticks
    }

    #[test]
    fn test_one_tick_per_60hz_frame() {
        let mut scheduler = FixedTickScheduler::default();
        let total: u32 = (0..60).map(|_| run(&mut scheduler, SIM_DT)).sum();
        assert!((59..=60).contains(&total));
    }

    #[test]
    fn test_high_refresh_runs_zero_ticks_some_frames() {
        let mut scheduler = FixedTickScheduler::default();
        let frames: Vec<u32> = (0..12).map(|_| run(&mut scheduler, 1.0 / 240.0)).collect();
        assert!(frames.contains(&0));
        assert!(frames.iter().sum::<u32>() >= 2);
    }

    #[test]
    fn test_low_refresh_runs_several_ticks() {
        let mut scheduler = FixedTickScheduler::default();
        assert_eq!(run(&mut scheduler, 1.0 / 20.0 + 1e-4), 3);
    }

    #[test]
    fn test_tab_suspend_is_capped() {
        let mut scheduler = FixedTickScheduler::default();
        assert_eq!(run(&mut scheduler, 10.0), MAX_SUBSTEPS);
        assert!(scheduler.accumulator() < SIM_DT);
    }

    #[test]
    fn test_garbage_delta_runs_nothing() {
        let mut scheduler = FixedTickScheduler::default();
        assert_eq!(run(&mut scheduler, f32::NAN), 0);
        assert_eq!(run(&mut scheduler, -1.0), 0);
        assert_eq!(scheduler.accumulator(), 0.0);
    }

    #[test]
    fn test_limiter_carries_skipped_time() {
        let mut limiter = FrameLimiter::new(Some(1.0 / 30.0));
        assert_eq!(limiter.admit(1.0 / 120.0), None);
        assert_eq!(limiter.admit(1.0 / 120.0), None);
        let admitted = limiter.admit(1.0 / 60.0).unwrap();
        assert!((admitted - 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_unlimited_admits_everything() {
        let mut limiter = FrameLimiter::default();
        assert_eq!(limiter.admit(0.001), Some(0.001));
    }

    proptest! {
        #[test]
        fn prop_scheduler_bound(deltas in proptest::collection::vec(0.0f32..20.0, 1..50)) {
            let mut scheduler = FixedTickScheduler::default();
            for dt in deltas {
                let ticks = run(&mut scheduler, dt);
                prop_assert!(ticks <= MAX_SUBSTEPS);
                prop_assert!(scheduler.accumulator() < SIM_DT * MAX_SUBSTEPS as f32);
                prop_assert!(scheduler.accumulator() >= 0.0);
            }
        }
    }
}
