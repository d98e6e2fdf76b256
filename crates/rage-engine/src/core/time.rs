/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    /// Maximum number of ticks a single frame may run.
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        // Hidden tabs report huge or negative deltas.
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death
        self.accumulator = self.accumulator.min(self.dt * Self::MAX_STEPS as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop any partial tick (used when a session restarts).
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// One-shot countdown measured in whole ticks.
///
/// Durations are converted to ticks once, so a 3 second lockout at 60 Hz
/// is exactly 180 ticks with no float drift. A game cancels a timer by
/// dropping it (`Option<TickTimer>` set to `None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTimer {
    remaining: u32,
}

impl TickTimer {
    /// Timer that fires after `ticks` calls to [`TickTimer::tick`] (minimum 1).
    pub fn from_ticks(ticks: u32) -> Self {
        Self {
            remaining: ticks.max(1),
        }
    }

    /// Timer that fires after `secs` seconds of fixed ticks of length `dt`.
    pub fn from_secs(secs: f32, dt: f32) -> Self {
        let ticks = if dt > 0.0 { (secs / dt).round() } else { 1.0 };
        Self::from_ticks(ticks.max(1.0) as u32)
    }

    /// Advance one tick. Returns `true` on the tick the timer fires.
    /// A fired timer keeps returning `false`.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

/// Tick an optional timer and clear it when it fires.
pub fn tick_timer(timer: &mut Option<TickTimer>) -> bool {
    let fired = timer.as_mut().map(|t| t.tick()).unwrap_or(false);
    if fired {
        *timer = None;
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);
    }

    #[test]
    fn ignores_bad_frame_deltas() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(-1.0), 0);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert!(ts.alpha() >= 0.0);
    }

    #[test]
    fn three_seconds_is_180_ticks() {
        let timer = TickTimer::from_secs(3.0, 1.0 / 60.0);
        assert_eq!(timer.remaining(), 180);
    }

    #[test]
    fn timer_fires_exactly_once() {
        let mut timer = TickTimer::from_ticks(3);
        let fired: Vec<bool> = (0..5).map(|_| timer.tick()).collect();
        assert_eq!(fired, vec![false, false, true, false, false]);
        assert!(timer.is_done());
    }

    #[test]
    fn optional_timer_clears_on_fire() {
        let mut slot = Some(TickTimer::from_ticks(2));
        assert!(!tick_timer(&mut slot));
        assert!(tick_timer(&mut slot));
        assert!(slot.is_none());
        assert!(!tick_timer(&mut slot));
    }
}
