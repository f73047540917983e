use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;

/// An input token: label, opaque embedding, smoothed activation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub label: String,
    /// Uniform in [-1, 1). Carried for renderers; the simulation never reads it.
    pub embedding: Vec<f64>,
    pub activation: Activation,
}

impl Token {
    pub fn new(index: usize, label: &str, embedding_dim: usize, rng: &mut impl Rng) -> Self {
        let embedding = (0..embedding_dim)
            .map(|_| rng.random::<f64>() * 2.0 - 1.0)
            .collect();
        Self {
            index,
            label: label.to_string(),
            embedding,
            activation: Activation::random(rng),
        }
    }

    pub fn tick(&mut self, rate: f64, jitter_probability: f64, rng: &mut impl Rng) {
        self.activation.step(rate, jitter_probability, rng);
    }
}
