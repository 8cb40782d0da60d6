/// A simulation advanced one rendered frame at a time by an external loop.
///
/// The driver owns the clock: it calls [`FrameSimulation::update`] once per
/// frame with the elapsed seconds and the current viewport width, and reads
/// state back for drawing. Implementations never block and never read the
/// wall clock.
pub trait FrameSimulation: Send {
    /// Discrete notification emitted by a frame.
    type Event;
    /// Comparable copy of everything a frame can mutate.
    type Snapshot: PartialEq + std::fmt::Debug;

    /// Advance by `dt` seconds. Non-finite or negative `dt` is treated as zero
    /// and oversized `dt` is clamped by the implementation.
    fn update(&mut self, viewport_width: f32, dt: f32) -> Vec<Self::Event>;

    /// Put every dynamic entity back into its starting state.
    fn reset(&mut self);

    /// Horizontal scroll offset the renderer should apply.
    fn camera_offset(&self) -> f32;

    /// Simulation seconds advanced so far.
    fn elapsed(&self) -> f32;

    fn snapshot(&self) -> Self::Snapshot;
}
