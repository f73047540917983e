use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smoothed scalar activation chasing a randomly re-drawn target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub level: f64,
    pub target: f64,
}

impl Activation {
    pub fn new(level: f64, target: f64) -> Self {
        Self { level, target }
    }

    /// Both level and target drawn independently from uniform(0,1).
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(rng.random(), rng.random())
    }

    /// Close `rate` of the gap to the target, then with probability
    /// `jitter_probability` redraw the target.
    pub fn step(&mut self, rate: f64, jitter_probability: f64, rng: &mut impl Rng) {
        self.level += (self.target - self.level) * rate;
        if rng.random_bool(jitter_probability) {
            self.target = rng.random();
        }
    }
}
