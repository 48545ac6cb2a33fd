/// Simulation clock counting elapsed days and completed steps.
///
/// Time only moves forward: negative or non-finite increments are ignored.
///
/// # Examples
///
/// ```
/// use hazard_twin::twin::clock::SimClock;
///
/// let mut clock = SimClock::new();
/// clock.advance(1.0);
/// clock.advance(0.5);
/// assert_eq!(clock.elapsed_days(), 1.5);
/// assert_eq!(clock.steps(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimClock {
    /// Elapsed simulation time in days
    elapsed_days: f64,
    /// Number of completed steps
    steps: usize,
}

impl SimClock {
    /// Creates a clock at day zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by one step of `dt_days`.
    ///
    /// # Returns
    ///
    /// The index of the step that just completed (starting from 0).
    pub fn advance(&mut self, dt_days: f64) -> usize {
        if dt_days.is_finite() && dt_days > 0.0 {
            self.elapsed_days += dt_days;
        }
        let step = self.steps;
        self.steps += 1;
        step
    }

    /// Elapsed time in days.
    pub fn elapsed_days(&self) -> f64 {
        self.elapsed_days
    }

    /// Number of steps taken so far.
    pub fn steps(&self) -> usize {
        self.steps
    }
}
