//! Platform color cycling
//!
//! Walks a fixed rainbow palette, blending from the current entry to the next
//! over 25 seconds of simulated time.

use crate::consts::TICKS_PER_SECOND;
use crate::lerp_rgb;

/// Rainbow palette, normalized RGB
pub const PALETTE: [[f32; 3]; 7] = [
    [1.0, 0.0, 0.0],
    [1.0, 0.6, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [0.0, 0.0, 1.0],
    [0.6, 0.0, 1.0],
];

/// Seconds spent blending between two palette entries
pub const SECONDS_PER_COLOR: f32 = 25.0;

/// Interpolation state between two palette entries
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCycle {
    /// Index of the entry being blended away from
    pub index: usize,
    /// Blend fraction in [0, 1)
    pub t: f32,
    /// Current blended color
    pub current: [f32; 3],
}

impl ColorCycle {
    pub fn new() -> Self {
        Self {
            index: 0,
            t: 0.0,
            current: PALETTE[0],
        }
    }

    /// The palette entry being blended toward
    pub fn next(&self) -> [f32; 3] {
        PALETTE[(self.index + 1) % PALETTE.len()]
    }

    /// Advance one tick
    pub fn advance(&mut self) {
        self.t += 1.0 / SECONDS_PER_COLOR / TICKS_PER_SECOND as f32;
        if self.t >= 1.0 {
            self.index = (self.index + 1) % PALETTE.len();
            self.t = 0.0;
        }
        self.current = lerp_rgb(PALETTE[self.index], self.next(), self.t);
    }
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_first_entry() {
        let cycle = ColorCycle::new();
        assert_eq!(cycle.current, PALETTE[0]);
        assert_eq!(cycle.next(), PALETTE[1]);
    }

    #[test]
    fn test_wraps_to_next_entry() {
        let mut cycle = ColorCycle::new();
        let ticks = (SECONDS_PER_COLOR * TICKS_PER_SECOND as f32) as usize + 1;
        for _ in 0..ticks {
            cycle.advance();
        }
        assert_eq!(cycle.index, 1);
        assert!(cycle.t < 0.01);
    }

    #[test]
    fn test_blends_halfway() {
        let mut cycle = ColorCycle::new();
        let ticks = (SECONDS_PER_COLOR * TICKS_PER_SECOND as f32 / 2.0) as usize;
        for _ in 0..ticks {
            cycle.advance();
        }
        // red -> orange: green channel ramps 0 -> 0.6
        assert!((cycle.current[1] - 0.3).abs() < 0.01);
        assert_eq!(cycle.current[0], 1.0);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let mut cycle = ColorCycle::new();
        let per_color = (SECONDS_PER_COLOR * TICKS_PER_SECOND as f32) as usize + 1;
        for _ in 0..per_color * PALETTE.len() {
            cycle.advance();
        }
        assert_eq!(cycle.index, 0);
    }
}
