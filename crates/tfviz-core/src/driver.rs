use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::SimConfig;
use crate::error::Result;
use crate::head::HeadParams;
use crate::layer::{LayerParams, TransformerLayer};
use crate::snapshot::{HeadView, LayerView, PulseView, Snapshot, TokenView};
use crate::token::Token;

/// Summary of one `tick()`, for hosts that log or count events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub regenerations: usize,
    /// Indexes of layers that finished warming up on this tick.
    pub layers_processed: Vec<usize>,
    pub pulses_spawned: usize,
    pub pulses_expired: usize,
}

/// Owns the tokens, the layers and the RNG; the only way to mutate them.
///
/// Each tick advances tokens first, then layers in construction order.
pub struct SimulationDriver {
    config: SimConfig,
    tokens: Vec<Token>,
    layers: Vec<TransformerLayer>,
    rng: SmallRng,
    tick: u64,
}

impl SimulationDriver {
    /// Validate `config` and build the token row and layer stack.
    pub fn initialize(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let tokens = config
            .tokens
            .iter()
            .enumerate()
            .map(|(i, label)| Token::new(i, label, config.embedding_dim, &mut rng))
            .collect();

        let token_count = config.tokens.len();
        let layers = (0..config.layers)
            .map(|l| {
                TransformerLayer::new(
                    l,
                    config.heads_per_layer,
                    token_count,
                    &config.layout,
                    &mut rng,
                )
            })
            .collect();

        Ok(Self {
            config,
            tokens,
            layers,
            rng,
            tick: 0,
        })
    }

    fn layer_params(&self) -> LayerParams {
        let c = &self.config;
        LayerParams {
            head: HeadParams {
                regeneration_probability: c.regeneration_probability,
                jitter_probability: c.head_jitter_probability,
                smoothing_rate: c.smoothing_rate,
                blend_ratio: c.blend_ratio,
            },
            warmup_ticks: c.warmup_ticks,
            pulse_spawn_probability: c.pulse_spawn_probability,
            pulse_step: c.pulse_step,
        }
    }

    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        let rate = self.config.smoothing_rate;
        let jitter = self.config.token_jitter_probability;
        for token in &mut self.tokens {
            token.tick(rate, jitter, &mut self.rng);
        }

        let params = self.layer_params();
        for layer in &mut self.layers {
            let outcome = layer.tick(&params, &mut self.rng);
            report.regenerations += outcome.regenerations;
            report.pulses_expired += outcome.pulses_expired;
            if outcome.pulse_spawned {
                report.pulses_spawned += 1;
            }
            if outcome.became_processed {
                report.layers_processed.push(layer.index);
            }
        }

        report
    }

    /// Deep copy of everything a renderer needs.
    pub fn snapshot(&self) -> Snapshot {
        let tokens = self
            .tokens
            .iter()
            .map(|t| TokenView {
                index: t.index,
                label: t.label.clone(),
                activation: t.activation.level,
            })
            .collect();

        let layers = self
            .layers
            .iter()
            .map(|layer| LayerView {
                index: layer.index,
                processed: layer.is_processed(),
                elapsed: layer.elapsed(),
                heads: layer
                    .head_states()
                    .iter()
                    .map(|h| HeadView {
                        geometry: h.geometry,
                        activation: h.activation.level,
                        matrix: h.matrix().to_rows(),
                    })
                    .collect(),
                pulses: layer
                    .live_pulses()
                    .iter()
                    .map(|p| {
                        let (x, y) = p.position();
                        PulseView {
                            x,
                            y,
                            progress: p.progress(),
                            intensity: p.intensity(),
                        }
                    })
                    .collect(),
            })
            .collect();

        Snapshot {
            tick: self.tick,
            tokens,
            layers,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn layers(&self) -> &[TransformerLayer] {
        &self.layers
    }
}
