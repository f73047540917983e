use std::fmt;

use crate::constants::MAX_TICK_RATE_HZ;

/// Construction-time contract violations.
///
/// The simulation itself never fails once built; everything here is caught
/// while validating a configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    EmptyTokens,
    ZeroLayers,
    ZeroHeads,
    InvalidProbability { name: &'static str, value: f64 },
    InvalidStep { name: &'static str, value: f64 },
    RateTooHigh { value: f64, max: f64 },
    EmptyVocabulary,
    ZeroDwell { name: &'static str },
    PairOutOfRange {
        pair: (usize, usize),
        token_count: usize,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::EmptyTokens => write!(f, "token label list is empty"),
            SimError::ZeroLayers => write!(f, "layer count must be at least 1"),
            SimError::ZeroHeads => write!(f, "heads per layer must be at least 1"),
            SimError::InvalidProbability { name, value } => {
                write!(f, "{name} must be within [0, 1], got {value}")
            }
            SimError::InvalidStep { name, value } => {
                write!(f, "{name} must be positive and finite, got {value}")
            }
            SimError::RateTooHigh { value, max } => {
                write!(f, "tick_rate_hz must be at most {max} Hz, got {value}")
            }
            SimError::EmptyVocabulary => write!(f, "generation vocabulary is empty"),
            SimError::ZeroDwell { name } => write!(f, "{name} must be at least 1 tick"),
            SimError::PairOutOfRange { pair, token_count } => write!(
                f,
                "related pair ({}, {}) out of range for {token_count} tokens",
                pair.0, pair.1
            ),
        }
    }
}

impl std::error::Error for SimError {}

pub type Result<T> = std::result::Result<T, SimError>;

pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidProbability { name, value })
    }
}

pub(crate) fn check_step(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidStep { name, value })
    }
}

pub(crate) fn check_tick_rate(value: f64) -> Result<()> {
    check_step("tick_rate_hz", value)?;
    if value > MAX_TICK_RATE_HZ {
        return Err(SimError::RateTooHigh {
            value,
            max: MAX_TICK_RATE_HZ,
        });
    }
    Ok(())
}
