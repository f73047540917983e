//! Tunable parameters for the simulation and the reading demo.
//!
//! All probabilities and rates are visual-taste defaults, not invariants.
//! Every struct deserializes with `#[serde(default)]` so a partial config
//! file only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Result, SimError, check_probability, check_step, check_tick_rate};

/// Screen-space geometry for heads and pulses. Opaque to the simulation;
/// only used to place pulse endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub head_origin_x: f64,
    pub head_size: f64,
    pub head_gap: f64,
    pub layer_origin_y: f64,
    pub layer_spacing: f64,
    pub pulse_offset: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            head_origin_x: 200.0,
            head_size: 150.0,
            head_gap: 20.0,
            layer_origin_y: 250.0,
            layer_spacing: 200.0,
            pulse_offset: 150.0,
        }
    }
}

impl Layout {
    /// Top edge of layer `layer`.
    pub fn layer_y(&self, layer: usize) -> f64 {
        self.layer_origin_y + layer as f64 * self.layer_spacing
    }

    /// Left edge of head `head` within any layer.
    pub fn head_x(&self, head: usize) -> f64 {
        self.head_origin_x + head as f64 * (self.head_size + self.head_gap)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub tokens: Vec<String>,
    pub layers: usize,
    pub heads_per_layer: usize,
    pub embedding_dim: usize,
    pub regeneration_probability: f64,
    pub head_jitter_probability: f64,
    pub token_jitter_probability: f64,
    pub smoothing_rate: f64,
    pub pulse_spawn_probability: f64,
    pub pulse_step: f64,
    pub warmup_ticks: u32,
    pub blend_ratio: f64,
    pub tick_rate_hz: f64,
    pub layout: Layout,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tokens: DEFAULT_TOKENS.iter().map(|s| s.to_string()).collect(),
            layers: 3,
            heads_per_layer: 4,
            embedding_dim: EMBEDDING_DIM,
            regeneration_probability: REGENERATION_PROBABILITY,
            head_jitter_probability: HEAD_JITTER_PROBABILITY,
            token_jitter_probability: TOKEN_JITTER_PROBABILITY,
            smoothing_rate: SMOOTHING_RATE,
            pulse_spawn_probability: PULSE_SPAWN_PROBABILITY,
            pulse_step: PULSE_STEP,
            warmup_ticks: WARMUP_TICKS,
            blend_ratio: BLEND_RATIO,
            tick_rate_hz: TICK_RATE_HZ,
            layout: Layout::default(),
        }
    }
}

impl SimConfig {
    /// Defaults with the given topology.
    pub fn new<S: AsRef<str>>(tokens: &[S], layers: usize, heads_per_layer: usize) -> Self {
        Self {
            tokens: tokens.iter().map(|s| s.as_ref().to_string()).collect(),
            layers,
            heads_per_layer,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tokens.is_empty() {
            return Err(SimError::EmptyTokens);
        }
        if self.layers == 0 {
            return Err(SimError::ZeroLayers);
        }
        if self.heads_per_layer == 0 {
            return Err(SimError::ZeroHeads);
        }
        check_probability("regeneration_probability", self.regeneration_probability)?;
        check_probability("head_jitter_probability", self.head_jitter_probability)?;
        check_probability("token_jitter_probability", self.token_jitter_probability)?;
        check_probability("smoothing_rate", self.smoothing_rate)?;
        check_probability("pulse_spawn_probability", self.pulse_spawn_probability)?;
        check_probability("blend_ratio", self.blend_ratio)?;
        check_step("pulse_step", self.pulse_step)?;
        check_tick_rate(self.tick_rate_hz)?;
        Ok(())
    }
}

/// Companion token-reading demo parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub seed: Option<u64>,
    pub tokens: Vec<String>,
    pub vocabulary: Vec<String>,
    pub reading_dwell: u32,
    pub generation_dwell: u32,
    pub related_pairs: Vec<(usize, usize)>,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tokens: DEFAULT_READING_TOKENS.iter().map(|s| s.to_string()).collect(),
            vocabulary: DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect(),
            reading_dwell: READING_DWELL,
            generation_dwell: GENERATION_DWELL,
            related_pairs: DEFAULT_RELATED_PAIRS.to_vec(),
        }
    }
}

impl ReadingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tokens.is_empty() {
            return Err(SimError::EmptyTokens);
        }
        if self.vocabulary.is_empty() {
            return Err(SimError::EmptyVocabulary);
        }
        if self.reading_dwell == 0 {
            return Err(SimError::ZeroDwell {
                name: "reading_dwell",
            });
        }
        if self.generation_dwell == 0 {
            return Err(SimError::ZeroDwell {
                name: "generation_dwell",
            });
        }
        let n = self.tokens.len();
        if let Some(&pair) = self.related_pairs.iter().find(|(a, b)| *a >= n || *b >= n) {
            return Err(SimError::PairOutOfRange {
                pair,
                token_count: n,
            });
        }
        Ok(())
    }
}
