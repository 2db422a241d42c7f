use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Wall clock for the frame loop - just tracks delta time
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Get delta time since last tick and advance clock
    /// Returns delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// How the `time` uniform grows from frame to frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    /// `time` is the wall time elapsed since the loop started
    #[default]
    Elapsed,
    /// Every frame adds the total elapsed time to `time`, so it grows
    /// faster than real time
    Accumulating,
}

/// Animation time fed by frame deltas
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    mode: TimeMode,
    elapsed: f32,
    time: f32,
}

impl AnimationClock {
    pub fn new(mode: TimeMode) -> Self {
        Self {
            mode,
            elapsed: 0.0,
            time: 0.0,
        }
    }

    /// Fold in one frame's delta (seconds) and return the new animation time
    pub fn advance(&mut self, delta: f32) -> f32 {
        self.elapsed += delta.max(0.0);
        self.time = match self.mode {
            TimeMode::Elapsed => self.elapsed,
            TimeMode::Accumulating => self.time + self.elapsed,
        };
        self.time
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_measures_delta() {
        let mut clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();

        // Should be at least 10ms = 0.01s
        assert!(delta >= 0.009);
    }

    #[test]
    fn clock_resets() {
        let mut clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        clock.reset();

        let delta = clock.tick();
        assert!(delta < 0.009);
    }

    #[test]
    fn elapsed_mode_tracks_wall_time() {
        let mut clock = AnimationClock::new(TimeMode::Elapsed);
        clock.advance(0.5);
        clock.advance(0.5);
        assert_eq!(clock.advance(0.5), 1.5);
    }

    #[test]
    fn accumulating_mode_sums_elapsed() {
        let mut clock = AnimationClock::new(TimeMode::Accumulating);
        assert_eq!(clock.advance(1.0), 1.0);
        assert_eq!(clock.advance(1.0), 3.0);
        assert_eq!(clock.advance(1.0), 6.0);
        assert_eq!(clock.elapsed(), 3.0);
    }

    #[test]
    fn negative_delta_ignored() {
        let mut clock = AnimationClock::new(TimeMode::Elapsed);
        clock.advance(1.0);
        assert_eq!(clock.advance(-5.0), 1.0);
    }
}
