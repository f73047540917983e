//! Transient pulses travelling from a processed layer toward the next.

use serde::{Deserialize, Serialize};

/// A pulse moving vertically from `origin` to `dest_y`.
///
/// Progress is derived from an integer age so that expiry lands on exactly
/// `ceil(1 / step)` advances instead of drifting with repeated addition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub origin: (f64, f64),
    pub dest_y: f64,
    age: u32,
    step: f64,
}

impl Pulse {
    pub fn new(origin: (f64, f64), dest_y: f64, step: f64) -> Self {
        Self {
            origin,
            dest_y,
            age: 0,
            step,
        }
    }

    /// Fraction of the journey completed, clamped to [0, 1].
    pub fn progress(&self) -> f64 {
        (self.age as f64 * self.step).min(1.0)
    }

    /// True once the pulse has reached its destination.
    pub fn is_expired(&self) -> bool {
        self.age as f64 * self.step >= 1.0
    }

    /// Linear interpolation between origin and destination.
    pub fn position(&self) -> (f64, f64) {
        let (x, y) = self.origin;
        (x, y + (self.dest_y - y) * self.progress())
    }

    /// 0 at either end of the journey, 1 halfway.
    pub fn intensity(&self) -> f64 {
        1.0 - (self.progress() - 0.5).abs() * 2.0
    }

    fn advance(&mut self) {
        self.age += 1;
    }
}

/// Live pulses in insertion order.
#[derive(Clone, Debug, Default)]
pub struct PulseTracker {
    pulses: Vec<Pulse>,
}

impl PulseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, pulse: Pulse) {
        self.pulses.push(pulse);
    }

    /// Advance every pulse one step, then drop the ones that arrived.
    /// Returns how many expired.
    pub fn advance(&mut self) -> usize {
        for pulse in &mut self.pulses {
            pulse.advance();
        }
        let before = self.pulses.len();
        self.pulses.retain(|p| !p.is_expired());
        before - self.pulses.len()
    }

    pub fn live(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }
}
