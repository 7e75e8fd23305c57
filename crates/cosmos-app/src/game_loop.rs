//! Fixed-timestep loop with an accumulator.
//!
//! Frame time is fed in, whole simulation ticks are run at the fixed rate,
//! and the leftover fraction is kept for the next frame.

use std::time::Instant;

use tracing::warn;

/// Default fixed timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Frames longer than this are clamped, accepting slowdown instead of
/// running dozens of catch-up ticks.
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct GameLoop {
    fixed_dt: f64,
    previous_time: Instant,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    pub fn new(fixed_dt: f64) -> Self {
        Self {
            fixed_dt,
            previous_time: Instant::now(),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Measure wall-clock time since the last call and [`advance`](Self::advance) by it.
    pub fn tick<E>(
        &mut self,
        update_fn: impl FnMut(f64, f64) -> Result<(), E>,
    ) -> Result<u32, E> {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time, update_fn)
    }

    /// Run as many fixed ticks as `frame_time` pays for.
    ///
    /// `update_fn(fixed_dt, total_sim_time)` runs once per tick. The first
    /// error stops the frame and is returned. Returns the number of ticks run.
    pub fn advance<E>(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, f64) -> Result<(), E>,
    ) -> Result<u32, E> {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }
        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= self.fixed_dt {
            update_fn(self.fixed_dt, self.total_sim_time)?;
            self.total_sim_time += self.fixed_dt;
            self.accumulator -= self.fixed_dt;
            self.update_count += 1;
            ticks += 1;
        }
        self.frame_count += 1;
        Ok(ticks)
    }

    /// Fraction of a tick left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / self.fixed_dt
        } else {
            0.0
        }
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(FIXED_DT)
    }
}
