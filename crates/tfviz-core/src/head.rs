use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::generator;
use crate::matrix::AttentionMatrix;

/// Per-tick head parameters, borrowed from the driver's config.
#[derive(Clone, Copy, Debug)]
pub struct HeadParams {
    pub regeneration_probability: f64,
    pub jitter_probability: f64,
    pub smoothing_rate: f64,
    pub blend_ratio: f64,
}

/// What a head did during one tick. Regeneration starts and finishes
/// within the tick, so a head is always observed `Stable` from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadTick {
    Stable,
    Regenerated,
}

/// Screen placement of a head's matrix (top-left corner and side length).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadGeometry {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl HeadGeometry {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

/// One attention head: a row-stochastic matrix that drifts by occasional
/// biased regeneration, plus a smoothed activation level.
#[derive(Clone, Debug)]
pub struct AttentionHead {
    matrix: AttentionMatrix,
    pub activation: Activation,
    pub geometry: HeadGeometry,
}

impl AttentionHead {
    /// Fresh bias-free matrix, activation at rest (0, 0).
    ///
    /// # Panics
    /// If `token_count == 0`.
    pub fn new(token_count: usize, geometry: HeadGeometry, rng: &mut impl Rng) -> Self {
        Self {
            matrix: generator::generate(token_count, rng),
            activation: Activation::new(0.0, 0.0),
            geometry,
        }
    }

    pub fn matrix(&self) -> &AttentionMatrix {
        &self.matrix
    }

    /// Replace the matrix with `blend_ratio * old + (1 - blend_ratio) * incoming`.
    pub fn blend_in(&mut self, incoming: &AttentionMatrix, blend_ratio: f64) {
        self.matrix = self.matrix.blend(incoming, blend_ratio);
    }

    pub fn tick(&mut self, params: &HeadParams, rng: &mut impl Rng) -> HeadTick {
        let outcome = if rng.random_bool(params.regeneration_probability) {
            let incoming = generator::generate_biased(self.matrix.size(), rng);
            self.blend_in(&incoming, params.blend_ratio);
            HeadTick::Regenerated
        } else {
            HeadTick::Stable
        };

        self.activation
            .step(params.smoothing_rate, params.jitter_probability, rng);
        outcome
    }
}
