use serde::{Deserialize, Serialize};

/// Simulation time in seconds, advanced only by the frames that are stepped.
///
/// Cooldowns read this instead of the wall clock so a paused or replayed
/// simulation behaves identically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    elapsed: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn now(&self) -> f32 {
        self.elapsed
    }
}

/// Whether an action last performed at `last` may run again at `now`.
/// `None` means it never ran and is always ready.
pub fn cooldown_elapsed(last: Option<f32>, cooldown: f32, now: f32) -> bool {
    match last {
        Some(t) => now - t >= cooldown,
        None => true,
    }
}

/// Convert a frame duration in seconds to the number of 60 Hz tuning steps it covers.
pub fn frame_factor(dt: f32) -> f32 {
    dt * 60.0
}
