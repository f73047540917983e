use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Layout;
use crate::head::{AttentionHead, HeadGeometry, HeadParams, HeadTick};
use crate::pulse::{Pulse, PulseTracker};

/// Warm-up state of a layer. `Processed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "elapsed")]
pub enum LayerPhase {
    Warming(u32),
    Processed,
}

/// Per-tick layer parameters.
#[derive(Clone, Copy, Debug)]
pub struct LayerParams {
    pub head: HeadParams,
    pub warmup_ticks: u32,
    pub pulse_spawn_probability: f64,
    pub pulse_step: f64,
}

/// What happened in a layer during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerTick {
    pub regenerations: usize,
    pub became_processed: bool,
    pub pulse_spawned: bool,
    pub pulses_expired: usize,
}

/// A row of attention heads that warms up, then emits pulses downward.
#[derive(Clone, Debug)]
pub struct TransformerLayer {
    pub index: usize,
    heads: Vec<AttentionHead>,
    phase: LayerPhase,
    elapsed: u32,
    pulses: PulseTracker,
    y: f64,
    pulse_dest_y: f64,
}

impl TransformerLayer {
    /// # Panics
    /// If `token_count == 0`.
    pub fn new(
        index: usize,
        head_count: usize,
        token_count: usize,
        layout: &Layout,
        rng: &mut impl Rng,
    ) -> Self {
        let y = layout.layer_y(index);
        let heads = (0..head_count)
            .map(|h| {
                let geometry = HeadGeometry {
                    x: layout.head_x(h),
                    y,
                    size: layout.head_size,
                };
                AttentionHead::new(token_count, geometry, rng)
            })
            .collect();

        Self {
            index,
            heads,
            phase: LayerPhase::Warming(0),
            elapsed: 0,
            pulses: PulseTracker::new(),
            y,
            pulse_dest_y: y + layout.pulse_offset,
        }
    }

    pub fn tick(&mut self, params: &LayerParams, rng: &mut impl Rng) -> LayerTick {
        let mut report = LayerTick::default();

        for head in &mut self.heads {
            if head.tick(&params.head, rng) == HeadTick::Regenerated {
                report.regenerations += 1;
            }
        }

        self.elapsed = self.elapsed.saturating_add(1);
        if let LayerPhase::Warming(_) = self.phase {
            if self.elapsed >= params.warmup_ticks {
                self.phase = LayerPhase::Processed;
                report.became_processed = true;
            } else {
                self.phase = LayerPhase::Warming(self.elapsed);
            }
        }

        report.pulses_expired = self.pulses.advance();

        if self.is_processed() && rng.random_bool(params.pulse_spawn_probability) {
            let source = rng.random_range(0..self.heads.len());
            let origin = self.heads[source].geometry.center();
            self.pulses
                .spawn(Pulse::new(origin, self.pulse_dest_y, params.pulse_step));
            report.pulse_spawned = true;
        }

        report
    }

    pub fn head_states(&self) -> &[AttentionHead] {
        &self.heads
    }

    pub fn is_processed(&self) -> bool {
        self.phase == LayerPhase::Processed
    }

    pub fn phase(&self) -> LayerPhase {
        self.phase
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn live_pulses(&self) -> &[Pulse] {
        self.pulses.live()
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn params(pulse_spawn_probability: f64) -> LayerParams {
        LayerParams {
            head: HeadParams {
                regeneration_probability: 0.03,
                jitter_probability: 0.02,
                smoothing_rate: 0.1,
                blend_ratio: 0.7,
            },
            warmup_ticks: 60,
            pulse_spawn_probability,
            pulse_step: 0.02,
        }
    }

    fn layer(rng: &mut SmallRng) -> TransformerLayer {
        TransformerLayer::new(0, 4, 8, &Layout::default(), rng)
    }

    #[test]
    fn test_heads_laid_out_in_a_row() {
        let mut rng = rng();
        let layer = TransformerLayer::new(1, 3, 8, &Layout::default(), &mut rng);
        let xs: Vec<f64> = layer.head_states().iter().map(|h| h.geometry.x).collect();
        assert_eq!(xs, vec![200.0, 370.0, 540.0]);
        assert!(layer.head_states().iter().all(|h| h.geometry.y == 450.0));
    }

    #[test]
    fn test_phase_monotonic() {
        let mut rng = rng();
        let mut layer = layer(&mut rng);
        let p = params(0.05);
        assert!(!layer.is_processed());
        for t in 1..=59 {
            let report = layer.tick(&p, &mut rng);
            assert!(!report.became_processed);
            assert_eq!(layer.phase(), LayerPhase::Warming(t));
        }
        let report = layer.tick(&p, &mut rng);
        assert!(report.became_processed);
        assert!(layer.is_processed());
        for _ in 0..500 {
            let report = layer.tick(&p, &mut rng);
            assert!(!report.became_processed);
            assert!(layer.is_processed());
        }
    }

    #[test]
    fn test_no_pulses_while_warming() {
        let mut rng = rng();
        let mut layer = layer(&mut rng);
        let p = params(1.0);
        for _ in 0..59 {
            let report = layer.tick(&p, &mut rng);
            assert!(!report.pulse_spawned);
            assert!(layer.live_pulses().is_empty());
        }
        assert!(layer.tick(&p, &mut rng).pulse_spawned);
        assert_eq!(layer.live_pulses().len(), 1);
    }

    #[test]
    fn test_pulse_geometry() {
        let mut rng = rng();
        let mut layer = layer(&mut rng);
        let p = params(1.0);
        for _ in 0..60 {
            layer.tick(&p, &mut rng);
        }
        let pulse = &layer.live_pulses()[0];
        assert_eq!(pulse.progress(), 0.0);
        assert_eq!(pulse.origin.1, 250.0 + 75.0);
        assert_eq!(pulse.dest_y, 400.0);
        let centers: Vec<f64> = layer
            .head_states()
            .iter()
            .map(|h| h.geometry.center().0)
            .collect();
        assert!(centers.contains(&pulse.origin.0));
    }

    #[test]
    fn test_pulse_population_bounded_by_lifetime() {
        let mut rng = rng();
        let mut layer = layer(&mut rng);
        let p = params(1.0);
        for _ in 0..1000 {
            layer.tick(&p, &mut rng);
            // one spawn per tick, each lives 50 ticks
            assert!(layer.live_pulses().len() <= 50);
            assert!(layer.live_pulses().iter().all(|p| p.progress() < 1.0));
        }
        assert_eq!(layer.live_pulses().len(), 50);
    }
}
