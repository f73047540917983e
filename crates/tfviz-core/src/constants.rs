/// Probability that a head regenerates its matrix on a given tick (p₁).
pub const REGENERATION_PROBABILITY: f64 = 0.03;

/// Probability that a head redraws its activation target on a given tick (p₂).
pub const HEAD_JITTER_PROBABILITY: f64 = 0.02;

/// Probability that a token redraws its activation target on a given tick.
pub const TOKEN_JITTER_PROBABILITY: f64 = 0.05;

/// Probability that a processed layer spawns a pulse on a given tick (p₃).
pub const PULSE_SPAWN_PROBABILITY: f64 = 0.05;

/// Progress added to every live pulse per tick (Δ).
pub const PULSE_STEP: f64 = 0.02;

/// Ticks a layer spends warming up before it counts as processed.
pub const WARMUP_TICKS: u32 = 60;

/// Weight kept by the old matrix when blending in a regenerated one.
pub const BLEND_RATIO: f64 = 0.7;

/// Fraction of the remaining distance an activation closes per tick.
pub const SMOOTHING_RATE: f64 = 0.1;

/// Self-attention bonus added to every diagonal cell.
pub const DIAGONAL_BIAS: f64 = 1.0;

/// Cells within this many positions of the diagonal get a local-context bonus.
pub const LOCAL_CONTEXT_RADIUS: usize = 2;

/// Token embedding dimension.
pub const EMBEDDING_DIM: usize = 64;

/// Host loop rate.
pub const TICK_RATE_HZ: f64 = 60.0;

/// Fastest host loop; the tick period must stay representable in whole nanoseconds.
pub const MAX_TICK_RATE_HZ: f64 = 1e6;

/// Ticks each input token stays active while reading.
pub const READING_DWELL: u32 = 60;

/// Ticks between generated tokens.
pub const GENERATION_DWELL: u32 = 100;

/// Raw scores at or below this are not drawn as attention edges.
pub const EDGE_VISIBILITY_FLOOR: f64 = 0.05;

/// Bonus for configured related token pairs in the reading score table.
pub const RELATED_PAIR_BONUS: f64 = 0.3;

/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-9;

pub const DEFAULT_TOKENS: [&str; 8] = ["Attention", "is", "all", "you", "need", "for", "AGI", "!"];

pub const DEFAULT_READING_TOKENS: [&str; 10] = [
    "[START]", "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "[END]",
];

pub const DEFAULT_VOCABULARY: [&str; 10] = [
    "a", "smart", "computer", "learns", "to", "write", "text", "using", "attention", ".",
];

pub const DEFAULT_RELATED_PAIRS: [(usize, usize); 4] = [(1, 4), (4, 5), (5, 6), (6, 8)];
