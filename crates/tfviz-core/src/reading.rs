//! Companion token-reading demo.
//!
//! A fixed row of input tokens with a static score table, and a two-phase
//! timer: while reading, each token takes a turn as the active one; after a
//! full pass the machine generates a fixed vocabulary one word at a time,
//! then starts reading again.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::ReadingConfig;
use crate::constants::{EDGE_VISIBILITY_FLOOR, LOCAL_CONTEXT_RADIUS, RELATED_PAIR_BONUS};
use crate::error::Result;

/// Static raw attention scores between input tokens. Not normalized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    n: usize,
    scores: Vec<f64>,
}

impl ScoreTable {
    /// Self scores in [0.8, 1.0), neighbours within two positions in
    /// [0.4, 0.8), everything else in [0, 0.3). Related pairs get a bonus
    /// in the listed direction only.
    pub fn generate(n: usize, related_pairs: &[(usize, usize)], rng: &mut impl Rng) -> Self {
        let mut scores = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let dist = i.abs_diff(j);
                let mut score = if dist == 0 {
                    0.8 + rng.random::<f64>() * 0.2
                } else if dist <= LOCAL_CONTEXT_RADIUS {
                    0.4 + rng.random::<f64>() * 0.4
                } else {
                    rng.random::<f64>() * 0.3
                };
                if related_pairs.contains(&(i, j)) {
                    score += RELATED_PAIR_BONUS;
                }
                scores.push(score);
            }
        }
        Self { n, scores }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn score(&self, from: usize, to: usize) -> f64 {
        self.scores[from * self.n + to]
    }

    /// Visible edges out of `from`: every other token scoring above the floor.
    pub fn edges_from(&self, from: usize) -> Vec<(usize, f64)> {
        (0..self.n)
            .filter(|&to| to != from)
            .map(|to| (to, self.score(from, to)))
            .filter(|&(_, s)| s > EDGE_VISIBILITY_FLOOR)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "phase")]
pub enum Phase {
    Reading { cursor: usize, dwell: u32 },
    Generating { countdown: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEvent {
    CursorAdvanced { cursor: usize },
    GenerationStarted,
    /// `completed` holds the full sentence when this was the last word;
    /// the machine is already back in `Reading(0)` by then.
    TokenEmitted {
        token: String,
        source: usize,
        completed: Option<Vec<String>>,
    },
}

/// The Reading/Generating timer. Has no terminal state.
#[derive(Clone, Debug)]
pub struct PhaseMachine {
    phase: Phase,
    token_count: usize,
    vocabulary: Vec<String>,
    generated: Vec<String>,
    active: Option<usize>,
    reading_dwell: u32,
    generation_dwell: u32,
}

impl PhaseMachine {
    /// Callers validate inputs; see [`ReadingConfig::validate`].
    ///
    /// # Panics
    ///
    /// Panics if `token_count` is zero or `vocabulary` is empty.
    pub fn new(
        token_count: usize,
        vocabulary: Vec<String>,
        reading_dwell: u32,
        generation_dwell: u32,
    ) -> Self {
        assert!(token_count > 0, "phase machine needs at least one token");
        assert!(!vocabulary.is_empty(), "phase machine needs a vocabulary");
        Self {
            phase: Phase::Reading {
                cursor: 0,
                dwell: 0,
            },
            token_count,
            vocabulary,
            generated: Vec::new(),
            active: Some(0),
            reading_dwell,
            generation_dwell,
        }
    }

    pub fn tick(&mut self, rng: &mut impl Rng) -> Option<PhaseEvent> {
        match self.phase {
            Phase::Reading { cursor, dwell } => {
                let dwell = dwell + 1;
                if dwell < self.reading_dwell {
                    self.phase = Phase::Reading { cursor, dwell };
                    return None;
                }
                let cursor = (cursor + 1) % self.token_count;
                if cursor == 0 && self.generated.is_empty() {
                    self.phase = Phase::Generating {
                        countdown: self.generation_dwell,
                    };
                    self.active = None;
                    return Some(PhaseEvent::GenerationStarted);
                }
                self.phase = Phase::Reading { cursor, dwell: 0 };
                self.active = Some(cursor);
                Some(PhaseEvent::CursorAdvanced { cursor })
            }
            Phase::Generating { countdown } => {
                let countdown = countdown.saturating_sub(1);
                if countdown > 0 {
                    self.phase = Phase::Generating { countdown };
                    return None;
                }
                Some(self.emit(rng))
            }
        }
    }

    fn emit(&mut self, rng: &mut impl Rng) -> PhaseEvent {
        let token = self.vocabulary[self.generated.len()].clone();
        self.generated.push(token.clone());
        let source = rng.random_range(0..self.token_count);

        if self.generated.len() == self.vocabulary.len() {
            let sentence = std::mem::take(&mut self.generated);
            self.phase = Phase::Reading {
                cursor: 0,
                dwell: 0,
            };
            self.active = Some(0);
            return PhaseEvent::TokenEmitted {
                token,
                source,
                completed: Some(sentence),
            };
        }

        self.phase = Phase::Generating {
            countdown: self.generation_dwell,
        };
        self.active = Some(source);
        PhaseEvent::TokenEmitted {
            token,
            source,
            completed: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating { .. })
    }

    /// Token currently highlighted, if any.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn generated(&self) -> &[String] {
        &self.generated
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadingSnapshot {
    pub tick: u64,
    pub phase: Phase,
    pub tokens: Vec<String>,
    pub active: Option<usize>,
    pub generated: Vec<String>,
    /// Edges out of the active token, `(to, raw score)`.
    pub edges: Vec<(usize, f64)>,
}

/// Labels, score table and phase machine driven by one seeded RNG.
pub struct ReadingDemo {
    tokens: Vec<String>,
    scores: ScoreTable,
    machine: PhaseMachine,
    rng: SmallRng,
    tick: u64,
}

impl ReadingDemo {
    pub fn new(config: ReadingConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let n = config.tokens.len();
        let scores = ScoreTable::generate(n, &config.related_pairs, &mut rng);
        let machine = PhaseMachine::new(
            n,
            config.vocabulary,
            config.reading_dwell,
            config.generation_dwell,
        );
        Ok(Self {
            tokens: config.tokens,
            scores,
            machine,
            rng,
            tick: 0,
        })
    }

    pub fn tick(&mut self) -> Option<PhaseEvent> {
        self.tick += 1;
        self.machine.tick(&mut self.rng)
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn machine(&self) -> &PhaseMachine {
        &self.machine
    }

    pub fn label(&self, index: usize) -> &str {
        &self.tokens[index]
    }

    pub fn snapshot(&self) -> ReadingSnapshot {
        let active = self.machine.active();
        ReadingSnapshot {
            tick: self.tick,
            phase: self.machine.phase(),
            tokens: self.tokens.clone(),
            active,
            generated: self.machine.generated().to_vec(),
            edges: active.map(|a| self.scores.edges_from(a)).unwrap_or_default(),
        }
    }
}
