//! Wall-clock timing for the frame loop.

use std::time::Instant;

/// A clock measuring elapsed and per-frame delta time.
pub struct Clock {
    running: bool,
    instant: Option<Instant>,
    old_time: f64,
    elapsed_time: f64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a new clock (not started).
    pub fn new() -> Self {
        Self {
            running: false,
            instant: None,
            old_time: 0.0,
            elapsed_time: 0.0,
        }
    }

    /// Create and start a new clock.
    pub fn start_new() -> Self {
        let mut clock = Self::new();
        clock.start();
        clock
    }

    fn now(&self) -> f64 {
        self.instant
            .map(|i| i.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Start the clock.
    pub fn start(&mut self) {
        self.instant = Some(Instant::now());
        self.old_time = 0.0;
        self.elapsed_time = 0.0;
        self.running = true;
    }

    /// Get the time since the last call to `get_delta`, in seconds.
    /// Starts the clock on first use.
    pub fn get_delta(&mut self) -> f64 {
        if !self.running {
            self.start();
            return 0.0;
        }

        let new_time = self.now();
        let diff = new_time - self.old_time;
        self.old_time = new_time;
        self.elapsed_time += diff;

        diff
    }

    /// Total elapsed time while running, in seconds.
    pub fn get_elapsed_time(&mut self) -> f64 {
        self.get_delta();
        self.elapsed_time
    }

    /// Check if the clock is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }
}
