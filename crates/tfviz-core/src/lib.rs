//! Attention-matrix simulation behind the transformer visualizer.
//!
//! Layers of attention heads hold row-stochastic score matrices that drift
//! through occasional self/local-context-biased regeneration and linear
//! blending. Layers warm up for a fixed number of ticks, then emit pulses
//! toward the next layer. A companion demo runs a Reading/Generating phase
//! timer over a static score table.
//!
//! Zero I/O: the host calls `tick()` at a fixed rate and reads `snapshot()`.

pub mod activation;
pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod generator;
pub mod head;
pub mod layer;
pub mod matrix;
pub mod pulse;
pub mod reading;
pub mod snapshot;
pub mod token;

pub use activation::Activation;
pub use config::{Layout, ReadingConfig, SimConfig};
pub use driver::{SimulationDriver, TickReport};
pub use error::{Result, SimError};
pub use generator::{apply_structural_bias, generate, generate_biased};
pub use head::{AttentionHead, HeadGeometry, HeadTick};
pub use layer::{LayerPhase, TransformerLayer};
pub use matrix::AttentionMatrix;
pub use pulse::{Pulse, PulseTracker};
pub use reading::{Phase, PhaseEvent, PhaseMachine, ReadingDemo, ReadingSnapshot, ScoreTable};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot, export_json, export_json_line, import_json};
pub use token::Token;
