pub mod events;
pub mod geometry;
pub mod input;
pub mod platform;
pub mod sim_trait;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::sim_trait::FrameSimulation;

    /// Viewport width used by the contract checks.
    pub const TEST_VIEWPORT: f32 = 800.0;

    /// Run `n` frames of `dt` seconds, returning all accumulated events.
    pub fn run_frames<S: FrameSimulation>(sim: &mut S, n: usize, dt: f32) -> Vec<S::Event> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(sim.update(TEST_VIEWPORT, dt));
        }
        all_events
    }

    // ================================================================
    // Frame Simulation Contract Tests
    // ================================================================
    // Every FrameSimulation implementation must pass these. Game crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// A non-finite or negative delta must not change state or emit events.
    pub fn contract_invalid_delta_is_noop<S: FrameSimulation>(sim: &mut S) {
        for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -0.5] {
            let before = sim.snapshot();
            let elapsed = sim.elapsed();
            let events = sim.update(TEST_VIEWPORT, dt);
            assert!(events.is_empty(), "dt={dt} must not emit events");
            assert_eq!(before, sim.snapshot(), "dt={dt} must not change state");
            assert_eq!(elapsed, sim.elapsed(), "dt={dt} must not advance time");
        }
    }

    /// A positive delta must advance the simulation clock.
    pub fn contract_update_advances_time<S: FrameSimulation>(sim: &mut S) {
        let before = sim.elapsed();
        sim.update(TEST_VIEWPORT, 1.0 / 60.0);
        assert!(
            sim.elapsed() > before,
            "update(dt>0) must advance the clock"
        );
    }

    /// An oversized delta must behave exactly like one of `max_delta` seconds.
    pub fn contract_delta_is_clamped<S: FrameSimulation>(
        make: impl Fn() -> S,
        max_delta: f32,
    ) {
        let mut clamped = make();
        let mut oversized = make();
        clamped.update(TEST_VIEWPORT, max_delta);
        oversized.update(TEST_VIEWPORT, max_delta * 50.0);
        assert_eq!(
            clamped.snapshot(),
            oversized.snapshot(),
            "dt above {max_delta} must be clamped"
        );
        assert!((oversized.elapsed() - max_delta).abs() < 1e-6);
    }

    /// Resetting twice must give the same state as resetting once, and the
    /// camera must return to the origin.
    pub fn contract_reset_is_idempotent<S: FrameSimulation>(sim: &mut S, warmup_frames: usize) {
        run_frames(sim, warmup_frames, 1.0 / 60.0);
        sim.reset();
        let once = sim.snapshot();
        assert_eq!(sim.camera_offset(), 0.0, "reset must zero the camera");
        sim.reset();
        assert_eq!(once, sim.snapshot(), "reset must be idempotent");
    }

    /// Two instances built the same way must stay identical frame for frame.
    pub fn contract_deterministic<S: FrameSimulation>(make: impl Fn() -> S, frames: usize) {
        let mut a = make();
        let mut b = make();
        for _ in 0..frames {
            a.update(TEST_VIEWPORT, 1.0 / 60.0);
            b.update(TEST_VIEWPORT, 1.0 / 60.0);
        }
        assert_eq!(a.snapshot(), b.snapshot(), "same inputs must give same state");
    }
}
